use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("At least one concurrency level is required.")]
    LevelsEmpty,
    #[error("Concurrency levels must be >= 1.")]
    LevelZero,
    #[error("Concurrency level {level} is listed more than once.")]
    DuplicateLevel { level: u32 },
    #[error("Sweep duration must be > 0.")]
    DurationZero,
    #[error("Host must not be empty.")]
    HostEmpty,
    #[error("Workload identifier must not be empty.")]
    WorkloadEmpty,
    #[error("Metric marker must not be empty.")]
    InvalidMarker,
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
