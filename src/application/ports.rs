use std::time::Duration;

use async_trait::async_trait;

use crate::domain::RunConfig;
use crate::error::{AppResult, ProcessError};
use crate::metrics::LevelAggregate;

/// Located server process the sweep correlates CPU against.
pub trait ServerHandle: Send {
    fn pid(&self) -> u32;

    /// CPU percent used since the previous query. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns an error when the process vanished or cannot be queried.
    fn cpu_percent(&mut self) -> Result<f64, ProcessError>;
}

pub trait ProcessLocator {
    type Handle: ServerHandle;

    /// Finds a live process whose name matches `name` exactly.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ServerNotFound` when nothing matches.
    fn find(&self, name: &str) -> Result<Self::Handle, ProcessError>;
}

/// Lazy, finite, non-restartable line sequence from one child run.
#[async_trait]
pub trait LineStream: Send {
    /// Next line in emission order; `None` once the child exited and its
    /// buffered output is drained.
    ///
    /// # Errors
    ///
    /// Returns an error when the child output cannot be read.
    async fn next_line(&mut self) -> AppResult<Option<String>>;
}

pub trait ChildProcessRunner {
    type Stream: LineStream;

    /// Starts the load generator for one concurrency level.
    ///
    /// # Errors
    ///
    /// Returns an error when the child cannot be spawned.
    fn start(&mut self, level: u32, config: &RunConfig) -> AppResult<Self::Stream>;
}

/// Export session for one sweep. Not reentrant.
#[async_trait]
pub trait ExperimentLogger: Send {
    /// # Errors
    ///
    /// Returns an error when the session cannot be opened or is already open.
    async fn init(&mut self, project: &str, run_name: &str) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns an error when the session is not open or the backend rejects it.
    async fn declare_step_metric(&mut self, step_key: &str, dependent_keys: &[&str])
    -> AppResult<()>;

    /// # Errors
    ///
    /// Returns an error when the session is not open or the backend rejects it.
    async fn log(&mut self, aggregate: &LevelAggregate) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns an error when the session is not open or cannot be closed.
    async fn finish(&mut self) -> AppResult<()>;
}

#[async_trait]
impl<T> ExperimentLogger for Box<T>
where
    T: ExperimentLogger + ?Sized,
{
    async fn init(&mut self, project: &str, run_name: &str) -> AppResult<()> {
        (**self).init(project, run_name).await
    }

    async fn declare_step_metric(
        &mut self,
        step_key: &str,
        dependent_keys: &[&str],
    ) -> AppResult<()> {
        (**self).declare_step_metric(step_key, dependent_keys).await
    }

    async fn log(&mut self, aggregate: &LevelAggregate) -> AppResult<()> {
        (**self).log(aggregate).await
    }

    async fn finish(&mut self) -> AppResult<()> {
        (**self).finish().await
    }
}

/// Cooldown wait between levels.
#[async_trait]
pub trait Pause: Send {
    async fn pause(&mut self, duration: Duration);
}

pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
