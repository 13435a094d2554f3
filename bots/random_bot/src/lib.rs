mod config;
mod orchestrator;
pub use config::*;
pub use orchestrator::*;
