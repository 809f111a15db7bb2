//! Sweep-wide value types.
pub mod run;

pub use run::{ConcurrencyLevels, RunConfig, RunConfigParts, SweepSettings};
