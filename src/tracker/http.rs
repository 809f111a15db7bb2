use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::payload::level_payload;
use super::session::SessionState;
use crate::application::ports::ExperimentLogger;
use crate::error::{AppError, AppResult, TrackerError};
use crate::metrics::LevelAggregate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-over-HTTP tracking backend.
///
/// `POST {base}/runs` opens a run and must answer with `{"id": ...}`; the
/// step declaration, per-level logs and the finish call go to
/// `{base}/runs/{id}/metrics`, `/log` and `/finish`.
pub struct HttpTracker {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    state: SessionState<String>,
}

impl HttpTracker {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(base_url: &str, token: Option<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| {
                AppError::tracker(TrackerError::Request {
                    url: base_url.to_owned(),
                    source: err,
                })
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
            state: SessionState::Idle,
        })
    }

    async fn post(&self, url: String, body: &Value) -> AppResult<Value> {
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|err| {
            AppError::tracker(TrackerError::Request {
                url: url.clone(),
                source: err,
            })
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::tracker(TrackerError::Status {
                url,
                status: status.as_u16(),
            }));
        }
        let bytes = response.bytes().await.map_err(|err| {
            AppError::tracker(TrackerError::Request {
                url: url.clone(),
                source: err,
            })
        })?;
        debug!(url = url.as_str(), status = status.as_u16(), "Tracker request ok");
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn run_url(&mut self, suffix: &str) -> AppResult<String> {
        let run_id = self.state.open_mut().map_err(AppError::tracker)?;
        Ok(format!("{}/runs/{}/{}", self.base_url, run_id, suffix))
    }
}

#[async_trait]
impl ExperimentLogger for HttpTracker {
    async fn init(&mut self, project: &str, run_name: &str) -> AppResult<()> {
        self.state.ensure_idle().map_err(AppError::tracker)?;
        let url = format!("{}/runs", self.base_url);
        let response = self
            .post(url.clone(), &json!({ "project": project, "name": run_name }))
            .await?;
        let run_id = match response.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(AppError::tracker(TrackerError::MissingRunId { url })),
        };
        info!(project, run = run_name, run_id = run_id.as_str(), "Tracking run opened");
        self.state = SessionState::Open(run_id);
        Ok(())
    }

    async fn declare_step_metric(
        &mut self,
        step_key: &str,
        dependent_keys: &[&str],
    ) -> AppResult<()> {
        let url = self.run_url("metrics")?;
        self.post(url, &json!({ "step": step_key, "metrics": dependent_keys }))
            .await?;
        Ok(())
    }

    async fn log(&mut self, aggregate: &LevelAggregate) -> AppResult<()> {
        let url = self.run_url("log")?;
        self.post(
            url,
            &json!({ "step": aggregate.threads, "data": level_payload(aggregate) }),
        )
        .await?;
        Ok(())
    }

    async fn finish(&mut self) -> AppResult<()> {
        let url = self.run_url("finish")?;
        let run_id = self.state.close().map_err(AppError::tracker)?;
        self.post(url, &json!({})).await?;
        info!(run_id = run_id.as_str(), "Tracking run finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::tracker::{DEPENDENT_KEYS, STEP_KEY};

    #[derive(Debug, Clone)]
    struct Recorded {
        request_line: String,
        authorization: Option<String>,
        body: Value,
    }

    type Requests = Arc<Mutex<Vec<Recorded>>>;

    async fn spawn_tracking_server(status_line: &'static str) -> AppResult<(String, Requests)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                if handle_request(stream, status_line, &seen).await.is_err() {
                    break;
                }
            }
        });
        Ok((format!("http://{}/api/", addr), requests))
    }

    async fn handle_request(
        mut stream: TcpStream,
        status_line: &str,
        seen: &Requests,
    ) -> std::io::Result<()> {
        let mut raw = Vec::new();
        let mut chunk = [0_u8; 1024];
        let header_end = loop {
            let read = stream.read(&mut chunk).await?;
            if read == 0 {
                return Ok(());
            }
            raw.extend_from_slice(chunk.get(..read).unwrap_or_default());
            if let Some(pos) = raw.windows(4).position(|window| window == b"\r\n\r\n") {
                break pos.saturating_add(4);
            }
        };
        let head = String::from_utf8_lossy(raw.get(..header_end).unwrap_or_default()).into_owned();
        let header = |name: &str| {
            head.lines().find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case(name)
                    .then(|| value.trim().to_owned())
            })
        };
        let content_length = header("content-length")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(0);
        while raw.len() < header_end.saturating_add(content_length) {
            let read = stream.read(&mut chunk).await?;
            if read == 0 {
                break;
            }
            raw.extend_from_slice(chunk.get(..read).unwrap_or_default());
        }
        let body = raw
            .get(header_end..)
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
            .unwrap_or(Value::Null);
        let request_line = head.lines().next().unwrap_or_default().to_owned();
        if let Ok(mut recorded) = seen.lock() {
            recorded.push(Recorded {
                request_line,
                authorization: header("authorization"),
                body,
            });
        }
        let reply = r#"{"id":"run-42"}"#;
        let response = format!(
            "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            reply.len(),
            reply
        );
        stream.write_all(response.as_bytes()).await?;
        stream.shutdown().await
    }

    fn recorded(requests: &Requests) -> Vec<Recorded> {
        requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn session_maps_to_run_endpoints() -> AppResult<()> {
        let (base_url, requests) = spawn_tracking_server("HTTP/1.1 200 OK").await?;
        let mut tracker = HttpTracker::new(&base_url, Some("secret".to_owned()))?;
        tracker.init("kv-store", "sweep_a").await?;
        tracker
            .declare_step_metric(STEP_KEY, &DEPENDENT_KEYS)
            .await?;
        tracker
            .log(&LevelAggregate {
                threads: 10,
                avg_throughput: 900.0,
                avg_latency: 4.5,
                avg_cpu: 61.0,
                samples: 12,
                cpu_unsampled: 0,
            })
            .await?;
        tracker.finish().await?;

        let seen = recorded(&requests);
        let lines: Vec<&str> = seen.iter().map(|req| req.request_line.as_str()).collect();
        assert_eq!(
            lines,
            [
                "POST /api/runs HTTP/1.1",
                "POST /api/runs/run-42/metrics HTTP/1.1",
                "POST /api/runs/run-42/log HTTP/1.1",
                "POST /api/runs/run-42/finish HTTP/1.1",
            ]
        );
        assert!(
            seen.iter()
                .all(|req| req.authorization.as_deref() == Some("Bearer secret"))
        );
        assert_eq!(
            seen.first().map(|req| &req.body),
            Some(&json!({ "project": "kv-store", "name": "sweep_a" }))
        );
        assert_eq!(
            seen.get(2)
                .and_then(|req| req.body.get("data"))
                .and_then(|data| data.get("Threads")),
            Some(&json!(10))
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejected_init_reports_status() -> AppResult<()> {
        let (base_url, _requests) =
            spawn_tracking_server("HTTP/1.1 503 Service Unavailable").await?;
        let mut tracker = HttpTracker::new(&base_url, None)?;
        match tracker.init("p", "r").await {
            Err(AppError::Tracker(TrackerError::Status { status: 503, .. })) => Ok(()),
            other => Err(format!("unexpected: {:?}", other.err()).into()),
        }
    }
}
