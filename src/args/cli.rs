use clap::Parser;
use std::time::Duration;

use super::parsers::parse_duration_arg;
use super::types::{LevelList, TrackerKind};

/// Every option except `WORKLOAD` overrides the config file, which in turn
/// overrides the built-in defaults.
#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Sweeps a load generator across concurrency levels, correlating client throughput and latency with server CPU, and exports one aggregate per level to an experiment tracker."
)]
pub struct SweepArgs {
    /// Workload identifier forwarded verbatim to the load generator
    pub workload: String,

    /// Path to a .toml or .json config file (defaults to ./scalesweep.toml or ./scalesweep.json)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Host the load generator targets
    #[arg(long)]
    pub host: Option<String>,

    /// Port the load generator targets
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Run length of each level (supports ms/s/m/h)
    #[arg(long, short = 'd', value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Initial part of each level excluded from aggregation (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_arg)]
    pub warmup: Option<Duration>,

    /// Pause between consecutive levels (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_arg)]
    pub cooldown: Option<Duration>,

    /// Comma-separated concurrency levels, run in the given order (e.g. 1,5,10)
    #[arg(long, short = 'l')]
    pub levels: Option<LevelList>,

    /// Exact name of the running server process to sample CPU from
    #[arg(long = "server-name")]
    pub server_name: Option<String>,

    /// Load generator executable
    #[arg(long)]
    pub generator: Option<String>,

    /// Extra argument placed right after the generator executable (repeatable)
    #[arg(long = "generator-arg", allow_hyphen_values = true)]
    pub generator_args: Vec<String>,

    /// CPU cores the generator is pinned to through taskset (e.g. 2-4)
    #[arg(long = "cpu-affinity", conflicts_with = "no_affinity")]
    pub cpu_affinity: Option<String>,

    /// Run the generator without CPU pinning
    #[arg(long = "no-affinity")]
    pub no_affinity: bool,

    /// Token that marks metric lines in generator output
    #[arg(long)]
    pub marker: Option<String>,

    /// Experiment-tracking project name
    #[arg(long)]
    pub project: Option<String>,

    /// Run name (defaults to '<prefix>_<WORKLOAD>')
    #[arg(long = "run-name")]
    pub run_name: Option<String>,

    /// How often progress is reported while a level runs (supports ms/s/m/h)
    #[arg(long = "progress-interval", value_parser = parse_duration_arg)]
    pub progress_interval: Option<Duration>,

    /// Experiment-tracking backend
    #[arg(long, value_enum)]
    pub tracker: Option<TrackerKind>,

    /// Output directory for the jsonl tracker
    #[arg(long = "tracker-dir")]
    pub tracker_dir: Option<String>,

    /// Base URL for the http tracker
    #[arg(long = "tracker-url")]
    pub tracker_url: Option<String>,

    /// Bearer token for the http tracker
    #[arg(
        long = "tracker-token",
        env = "SCALESWEEP_TRACKER_TOKEN",
        hide_env_values = true
    )]
    pub tracker_token: Option<String>,

    /// Do not echo load generator output
    #[arg(long = "quiet-generator")]
    pub quiet_generator: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
