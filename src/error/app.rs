use thiserror::Error;

use super::{ConfigError, ProcessError, TrackerError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),
    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn process<E>(error: E) -> Self
    where
        E: Into<ProcessError>,
    {
        error.into().into()
    }

    pub fn tracker<E>(error: E) -> Self
    where
        E: Into<TrackerError>,
    {
        error.into().into()
    }
}
