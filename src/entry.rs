use std::ffi::OsString;

use clap::{CommandFactory, FromArgMatches};
use tracing::info;

use scalesweep::application::{ExperimentLogger, SweepController, TokioPause};
use scalesweep::args::{SweepArgs, TrackerKind};
use scalesweep::config::{ResolvedConfig, TrackerSettings, load_config, resolve_config};
use scalesweep::error::{AppError, AppResult, ConfigError};
use scalesweep::process::{LoadGeneratorRunner, SysinfoLocator};
use scalesweep::tracker::{ConsoleTracker, HttpTracker, JsonlTracker};

pub(crate) fn run() -> AppResult<()> {
    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(AppError::Clap { source }) => source.exit(),
        Err(err) => return Err(err),
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let file = load_config(args.config.as_deref())?;
    let resolved = resolve_config(&args, file.as_ref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_sweep(resolved))
}

fn parse_args<I>(raw_args: I) -> AppResult<SweepArgs>
where
    I: IntoIterator<Item = OsString>,
{
    let matches = SweepArgs::command().try_get_matches_from(raw_args)?;
    Ok(SweepArgs::from_arg_matches(&matches)?)
}

async fn run_sweep(resolved: ResolvedConfig) -> AppResult<()> {
    let ResolvedConfig {
        run,
        sweep,
        generator,
        tracker,
    } = resolved;

    let tracker = build_tracker(&tracker)?;
    let runner = LoadGeneratorRunner::new(generator);
    let mut controller =
        SweepController::new(run, sweep, SysinfoLocator, runner, tracker, TokioPause);
    let report = controller.run().await?;
    info!(
        run = report.run_name.as_str(),
        server_pid = report.server_pid,
        levels = report.levels_completed.len(),
        "Sweep finished"
    );
    Ok(())
}

fn build_tracker(settings: &TrackerSettings) -> AppResult<Box<dyn ExperimentLogger>> {
    let tracker: Box<dyn ExperimentLogger> = match settings.kind {
        TrackerKind::Jsonl => Box::new(JsonlTracker::new(settings.dir.clone())),
        TrackerKind::Http => {
            let url = settings
                .url
                .as_deref()
                .ok_or_else(|| AppError::config(ConfigError::MissingTrackerUrl))?;
            Box::new(HttpTracker::new(url, settings.token.clone())?)
        }
        TrackerKind::Console => Box::new(ConsoleTracker::default()),
    };
    info!(tracker = settings.kind.as_str(), "Experiment tracker ready");
    Ok(tracker)
}
