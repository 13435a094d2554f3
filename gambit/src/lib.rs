pub use board::*;
pub use errors::*;
pub use moves::*;
pub use pieces::*;
pub use protocol_types::*;
pub use setup::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod errors;
mod moves;
mod pieces;
mod protocol_types;
mod setup;
mod visualization;
