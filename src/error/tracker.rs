use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Tracker session has not been initialized.")]
    NotInitialized,
    #[error("Tracker session is already initialized.")]
    AlreadyInitialized,
    #[error("Tracker session is already finished.")]
    AlreadyFinished,
    #[error("Failed writing tracker file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize tracker event: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
    #[error("Tracker request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Tracker request to '{url}' returned status {status}.")]
    Status { url: String, status: u16 },
    #[error("Tracker response from '{url}' is missing the run id.")]
    MissingRunId { url: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
