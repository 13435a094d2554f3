mod api;
mod config;
mod endpoints;
mod error;
mod logging;
mod recording;
pub mod testing;
mod transport;
pub use api::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use recording::*;
pub use transport::*;
