//! Configuration loading and resolution into sweep settings.
mod apply;
mod loader;
mod parse;
pub mod types;


pub use apply::{ResolvedConfig, TrackerSettings, resolve_config};
pub use loader::load_config;

#[cfg(test)]
pub(crate) use loader::load_config_file;
pub(crate) use parse::parse_duration_value;
