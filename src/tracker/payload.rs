use serde_json::{Map, Value, json};

use crate::metrics::LevelAggregate;

pub const STEP_KEY: &str = "Threads";
pub const THROUGHPUT_KEY: &str = "Throughput";
pub const LATENCY_KEY: &str = "Latency";
pub const CPU_KEY: &str = "Server CPU %";
pub const SAMPLES_KEY: &str = "Steady Samples";
pub const CPU_UNSAMPLED_KEY: &str = "CPU Unsampled";

/// Series plotted against [`STEP_KEY`].
pub const DEPENDENT_KEYS: [&str; 3] = [THROUGHPUT_KEY, LATENCY_KEY, CPU_KEY];

/// Keyed mapping exported for one level.
#[must_use]
pub fn level_payload(aggregate: &LevelAggregate) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert(STEP_KEY.to_owned(), json!(aggregate.threads));
    payload.insert(THROUGHPUT_KEY.to_owned(), json!(aggregate.avg_throughput));
    payload.insert(LATENCY_KEY.to_owned(), json!(aggregate.avg_latency));
    payload.insert(CPU_KEY.to_owned(), json!(aggregate.avg_cpu));
    payload.insert(SAMPLES_KEY.to_owned(), json!(aggregate.samples));
    payload.insert(CPU_UNSAMPLED_KEY.to_owned(), json!(aggregate.cpu_unsampled));
    payload
}
