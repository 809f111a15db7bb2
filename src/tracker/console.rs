use async_trait::async_trait;
use tracing::info;

use super::payload::level_payload;
use super::session::SessionState;
use crate::application::ports::ExperimentLogger;
use crate::error::{AppError, AppResult};
use crate::metrics::LevelAggregate;

/// Backend that only reports through the log; used with `--tracker console`.
#[derive(Debug, Default)]
pub struct ConsoleTracker {
    state: SessionState<String>,
}

#[async_trait]
impl ExperimentLogger for ConsoleTracker {
    async fn init(&mut self, project: &str, run_name: &str) -> AppResult<()> {
        self.state.ensure_idle().map_err(AppError::tracker)?;
        info!(project, run = run_name, "Tracking session opened (console only)");
        self.state = SessionState::Open(run_name.to_owned());
        Ok(())
    }

    async fn declare_step_metric(
        &mut self,
        step_key: &str,
        dependent_keys: &[&str],
    ) -> AppResult<()> {
        self.state.open_mut().map_err(AppError::tracker)?;
        info!(step = step_key, metrics = ?dependent_keys, "Declared step metric");
        Ok(())
    }

    async fn log(&mut self, aggregate: &LevelAggregate) -> AppResult<()> {
        let run = self.state.open_mut().map_err(AppError::tracker)?;
        let payload = serde_json::Value::Object(level_payload(aggregate));
        info!(run = run.as_str(), %payload, "Logged level");
        Ok(())
    }

    async fn finish(&mut self) -> AppResult<()> {
        let run = self.state.close().map_err(AppError::tracker)?;
        info!(run = run.as_str(), "Tracking session finished");
        Ok(())
    }
}
