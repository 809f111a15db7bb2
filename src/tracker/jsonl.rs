use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use super::payload::level_payload;
use super::session::SessionState;
use crate::application::ports::ExperimentLogger;
use crate::error::{AppError, AppResult, TrackerError};
use crate::metrics::LevelAggregate;

struct JsonlSession {
    path: PathBuf,
    writer: BufWriter<tokio::fs::File>,
}

/// Appends tracking events as JSON lines under `<dir>/<project>/`.
///
/// Every event is flushed on write so an aborted sweep keeps the levels it
/// already exported.
pub struct JsonlTracker {
    dir: PathBuf,
    run_path: Option<PathBuf>,
    state: SessionState<JsonlSession>,
}

impl JsonlTracker {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            run_path: None,
            state: SessionState::Idle,
        }
    }

    /// File the current (or last) session writes to.
    #[must_use]
    pub fn run_path(&self) -> Option<&Path> {
        self.run_path.as_deref()
    }

    async fn append(&mut self, event: &Value) -> AppResult<()> {
        let session = self.state.open_mut().map_err(AppError::tracker)?;
        write_event(session, event).await
    }
}

async fn write_event(session: &mut JsonlSession, event: &Value) -> AppResult<()> {
    let mut line = serde_json::to_vec(event)
        .map_err(|err| AppError::tracker(TrackerError::Serialize { source: err }))?;
    line.push(b'\n');
    let result = async {
        session.writer.write_all(&line).await?;
        session.writer.flush().await
    }
    .await;
    result.map_err(|err| {
        AppError::tracker(TrackerError::Write {
            path: session.path.clone(),
            source: err,
        })
    })
}

#[async_trait]
impl ExperimentLogger for JsonlTracker {
    async fn init(&mut self, project: &str, run_name: &str) -> AppResult<()> {
        self.state.ensure_idle().map_err(AppError::tracker)?;
        let now = Utc::now();
        let project_dir = self.dir.join(file_component(project));
        let path = project_dir.join(format!(
            "{}-{}.jsonl",
            file_component(run_name),
            now.format("%Y%m%dT%H%M%SZ")
        ));
        let write_error = |err| {
            AppError::tracker(TrackerError::Write {
                path: path.clone(),
                source: err,
            })
        };
        tokio::fs::create_dir_all(&project_dir)
            .await
            .map_err(write_error)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(write_error)?;

        info!("Tracking run '{}' in {}", run_name, path.display());
        self.run_path = Some(path.clone());
        self.state = SessionState::Open(JsonlSession {
            path,
            writer: BufWriter::new(file),
        });
        self.append(&json!({
            "event": "init",
            "project": project,
            "run": run_name,
            "started_at": now.to_rfc3339(),
        }))
        .await
    }

    async fn declare_step_metric(
        &mut self,
        step_key: &str,
        dependent_keys: &[&str],
    ) -> AppResult<()> {
        self.append(&json!({
            "event": "define_metric",
            "step": step_key,
            "metrics": dependent_keys,
        }))
        .await
    }

    async fn log(&mut self, aggregate: &LevelAggregate) -> AppResult<()> {
        self.append(&json!({
            "event": "log",
            "step": aggregate.threads,
            "data": level_payload(aggregate),
        }))
        .await
    }

    async fn finish(&mut self) -> AppResult<()> {
        let mut session = self.state.close().map_err(AppError::tracker)?;
        write_event(
            &mut session,
            &json!({
                "event": "finish",
                "finished_at": Utc::now().to_rfc3339(),
            }),
        )
        .await
    }
}

/// Keeps project and run names usable as a single path component.
fn file_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|ch| ch == '.') {
        "run".to_owned()
    } else {
        cleaned
    }
}
