use super::{AppError, ConfigError, ProcessError, TrackerError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ProcessError {
    fn from(message: &'static str) -> Self {
        ProcessError::TestExpectation { message }
    }
}

impl From<String> for ProcessError {
    fn from(value: String) -> Self {
        ProcessError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for TrackerError {
    fn from(message: &'static str) -> Self {
        TrackerError::TestExpectation { message }
    }
}

impl From<String> for TrackerError {
    fn from(value: String) -> Self {
        TrackerError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for AppError {
    fn from(message: &'static str) -> Self {
        AppError::validation(ValidationError::TestExpectation { message })
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::validation(ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        })
    }
}
