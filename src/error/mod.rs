mod app;
mod config;
mod process;
mod tracker;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use process::ProcessError;
pub use tracker::TrackerError;
pub use validation::ValidationError;
