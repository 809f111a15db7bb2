//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::SweepArgs;
pub use types::{LevelList, TrackerKind};
