//! Experiment-tracking backends for per-level aggregates.
mod console;
mod http;
mod jsonl;
mod payload;
mod session;

pub use console::ConsoleTracker;
pub use http::HttpTracker;
pub use jsonl::JsonlTracker;
pub use payload::{
    CPU_KEY, CPU_UNSAMPLED_KEY, DEPENDENT_KEYS, LATENCY_KEY, SAMPLES_KEY, STEP_KEY, THROUGHPUT_KEY,
    level_payload,
};
pub(crate) use session::SessionState;
