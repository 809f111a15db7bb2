use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Could not find a running '{name}' process.")]
    ServerNotFound { name: String },
    #[error("Server process {pid} is no longer running.")]
    ServerGone { pid: u32 },
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to set up the child output pipe: {source}")]
    Pipe {
        #[source]
        source: std::io::Error,
    },
    #[error("Child process did not expose its {stream} pipe.")]
    MissingPipe { stream: &'static str },
    #[error("Failed reading child {stream}: {source}")]
    Read {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed waiting for child process: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
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
