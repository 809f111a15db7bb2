use std::path::PathBuf;

use crate::args::defaults::{
    DEFAULT_COOLDOWN, DEFAULT_CPU_AFFINITY, DEFAULT_DURATION, DEFAULT_GENERATOR, DEFAULT_HOST,
    DEFAULT_LEVELS, DEFAULT_PORT, DEFAULT_PROGRESS_INTERVAL, DEFAULT_PROJECT,
    DEFAULT_RUN_NAME_PREFIX, DEFAULT_SERVER_NAME, DEFAULT_TRACKER_DIR, DEFAULT_WARMUP,
};
use crate::args::{SweepArgs, TrackerKind};
use crate::domain::{RunConfig, RunConfigParts, SweepSettings};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::metrics::DEFAULT_METRIC_MARKER;
use crate::process::GeneratorSettings;

use super::types::{ConfigFile, DurationValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSettings {
    pub kind: TrackerKind,
    pub dir: PathBuf,
    pub url: Option<String>,
    pub token: Option<String>,
}

/// Everything the sweep needs, after defaults, config file and CLI are merged.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub run: RunConfig,
    pub sweep: SweepSettings,
    pub generator: GeneratorSettings,
    pub tracker: TrackerSettings,
}

/// Merges CLI arguments over the config file over built-in defaults.
///
/// # Errors
///
/// Returns an error when a config duration is invalid, the http tracker has
/// no URL, or the merged run parameters fail validation.
pub fn resolve_config(args: &SweepArgs, file: Option<&ConfigFile>) -> AppResult<ResolvedConfig> {
    let fallback = ConfigFile::default();
    let file = file.unwrap_or(&fallback);

    let run = RunConfig::new(RunConfigParts {
        host: pick_string(args.host.as_ref(), file.host.as_ref(), DEFAULT_HOST),
        port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
        duration: pick_duration(args.duration, file.duration.as_ref(), DEFAULT_DURATION)?,
        warmup: pick_duration(args.warmup, file.warmup.as_ref(), DEFAULT_WARMUP)?,
        levels: args
            .levels
            .as_ref()
            .map(|levels| levels.0.clone())
            .or_else(|| file.levels.clone())
            .unwrap_or_else(|| DEFAULT_LEVELS.to_vec()),
        workload: args.workload.clone(),
        cooldown: pick_duration(args.cooldown, file.cooldown.as_ref(), DEFAULT_COOLDOWN)?,
    })?;

    let marker = pick_string(args.marker.as_ref(), file.marker.as_ref(), DEFAULT_METRIC_MARKER);
    if marker.is_empty() {
        return Err(AppError::validation(ValidationError::InvalidMarker));
    }
    let run_name = match args.run_name.as_ref().or(file.run_name.as_ref()) {
        Some(name) => name.clone(),
        None => format!(
            "{}_{}",
            file.run_name_prefix
                .as_deref()
                .unwrap_or(DEFAULT_RUN_NAME_PREFIX),
            run.workload()
        ),
    };
    let sweep = SweepSettings {
        server_name: pick_string(
            args.server_name.as_ref(),
            file.server_name.as_ref(),
            DEFAULT_SERVER_NAME,
        ),
        marker,
        project: pick_string(args.project.as_ref(), file.project.as_ref(), DEFAULT_PROJECT),
        run_name,
        progress_interval: pick_duration(
            args.progress_interval,
            file.progress_interval.as_ref(),
            DEFAULT_PROGRESS_INTERVAL,
        )?,
    };

    let generator = GeneratorSettings {
        program: pick_string(args.generator.as_ref(), file.generator.as_ref(), DEFAULT_GENERATOR),
        program_args: if args.generator_args.is_empty() {
            file.generator_args.clone().unwrap_or_default()
        } else {
            args.generator_args.clone()
        },
        cpu_affinity: resolve_affinity(args, file),
        echo_output: !(args.quiet_generator || file.quiet_generator.unwrap_or(false)),
    };

    let kind = args.tracker.or(file.tracker).unwrap_or(TrackerKind::Jsonl);
    let url = args.tracker_url.clone().or_else(|| file.tracker_url.clone());
    if kind == TrackerKind::Http && url.is_none() {
        return Err(AppError::config(ConfigError::MissingTrackerUrl));
    }
    let tracker = TrackerSettings {
        kind,
        dir: PathBuf::from(pick_string(
            args.tracker_dir.as_ref(),
            file.tracker_dir.as_ref(),
            DEFAULT_TRACKER_DIR,
        )),
        url,
        token: args
            .tracker_token
            .clone()
            .or_else(|| file.tracker_token.clone()),
    };

    Ok(ResolvedConfig {
        run,
        sweep,
        generator,
        tracker,
    })
}

fn pick_string(cli: Option<&String>, file: Option<&String>, default: &str) -> String {
    cli.or(file)
        .map_or_else(|| default.to_owned(), ToOwned::to_owned)
}

fn pick_duration(
    cli: Option<std::time::Duration>,
    file: Option<&DurationValue>,
    default: std::time::Duration,
) -> Result<std::time::Duration, ConfigError> {
    if let Some(value) = cli {
        return Ok(value);
    }
    file.map_or(Ok(default), DurationValue::to_duration)
}

/// CLI `--cpu-affinity` wins, then `--no-affinity`, then the file, then the
/// default core range. An empty core list disables pinning.
fn resolve_affinity(args: &SweepArgs, file: &ConfigFile) -> Option<String> {
    let cores = if let Some(cores) = args.cpu_affinity.as_ref() {
        Some(cores.clone())
    } else if args.no_affinity || file.no_affinity.unwrap_or(false) {
        None
    } else {
        Some(
            file.cpu_affinity
                .clone()
                .unwrap_or_else(|| DEFAULT_CPU_AFFINITY.to_owned()),
        )
    };
    cores.filter(|cores| !cores.trim().is_empty())
}
