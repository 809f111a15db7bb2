use std::time::Duration;

use serde::Deserialize;

use crate::args::TrackerKind;
use crate::error::ConfigError;

/// On-disk config; every field is optional and overridden by the CLI.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub duration: Option<DurationValue>,
    pub warmup: Option<DurationValue>,
    pub cooldown: Option<DurationValue>,
    #[serde(alias = "thread_levels")]
    pub levels: Option<Vec<u32>>,
    #[serde(alias = "server_process_name")]
    pub server_name: Option<String>,
    pub generator: Option<String>,
    pub generator_args: Option<Vec<String>>,
    pub cpu_affinity: Option<String>,
    pub no_affinity: Option<bool>,
    pub marker: Option<String>,
    pub project: Option<String>,
    pub run_name: Option<String>,
    pub run_name_prefix: Option<String>,
    pub progress_interval: Option<DurationValue>,
    pub tracker: Option<TrackerKind>,
    pub tracker_dir: Option<String>,
    pub tracker_url: Option<String>,
    pub tracker_token: Option<String>,
    pub quiet_generator: Option<bool>,
}

/// Integer seconds or text with an `ms|s|m|h` unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
