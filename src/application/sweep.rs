use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use super::ports::{
    ChildProcessRunner, ExperimentLogger, LineStream, Pause, ProcessLocator, ServerHandle,
};
use super::progress::ProgressTicker;
use super::state::SweepState;
use crate::domain::{RunConfig, SweepSettings};
use crate::error::{AppError, AppResult};
use crate::metrics::{
    CpuReading, LevelAggregate, MetricSample, ParsedLine, SteadyStateAggregator,
    parse_metric_line,
};
use crate::tracker::{DEPENDENT_KEYS, STEP_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub run_name: String,
    pub server_pid: u32,
    pub levels_completed: Vec<u32>,
}

/// Runs one sweep: locate the server, then spawn, stream, aggregate and
/// export each concurrency level strictly in order.
pub struct SweepController<L, R, T, P> {
    config: RunConfig,
    settings: SweepSettings,
    locator: L,
    runner: R,
    tracker: T,
    pause: P,
    state: SweepState,
}

impl<L, R, T, P> SweepController<L, R, T, P>
where
    L: ProcessLocator,
    R: ChildProcessRunner,
    T: ExperimentLogger,
    P: Pause,
{
    pub const fn new(
        config: RunConfig,
        settings: SweepSettings,
        locator: L,
        runner: R,
        tracker: T,
        pause: P,
    ) -> Self {
        Self {
            config,
            settings,
            locator,
            runner,
            tracker,
            pause,
            state: SweepState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SweepState {
        self.state
    }

    /// # Errors
    ///
    /// Returns an error when the server process is not running, a load
    /// generator cannot be spawned or read, or the tracker rejects a call.
    /// No export session is opened when the server is missing.
    pub async fn run(&mut self) -> AppResult<SweepReport> {
        self.enter(SweepState::Locating);
        let mut server = match self.locator.find(&self.settings.server_name) {
            Ok(server) => server,
            Err(err) => {
                self.enter(SweepState::Aborted);
                error!("{}", err);
                error!("Start the server in a separate terminal before running the sweep.");
                return Err(AppError::process(err));
            }
        };
        self.enter(SweepState::Located);
        info!(
            pid = server.pid(),
            "Found server process '{}'", self.settings.server_name
        );
        if self.config.warmup_covers_duration() {
            warn!(
                warmup_secs = self.config.warmup().as_secs(),
                duration_secs = self.config.duration().as_secs(),
                "Warmup covers the whole run; every level will aggregate to zero"
            );
        }

        let run_name = self.settings.run_name.clone();
        info!("=== STARTING SWEEP: {} ===", run_name);
        self.tracker.init(&self.settings.project, &run_name).await?;

        let levels_completed = match self.export_levels(&mut server).await {
            Ok(levels) => levels,
            Err(err) => {
                self.enter(SweepState::Aborted);
                self.abandon_session().await;
                return Err(err);
            }
        };

        self.enter(SweepState::Finishing);
        self.tracker.finish().await?;
        self.enter(SweepState::Done);
        info!("=== SWEEP COMPLETE ===");
        Ok(SweepReport {
            run_name,
            server_pid: server.pid(),
            levels_completed,
        })
    }

    async fn export_levels(&mut self, server: &mut L::Handle) -> AppResult<Vec<u32>> {
        self.tracker
            .declare_step_metric(STEP_KEY, &DEPENDENT_KEYS)
            .await?;

        let levels = self.config.levels().as_slice().to_vec();
        let mut completed = Vec::with_capacity(levels.len());
        for (idx, level) in levels.iter().copied().enumerate() {
            let aggregate = self.run_level(level, server).await?;

            self.enter(SweepState::Exporting { level });
            info!(
                "Sending: threads={} throughput={:.0} latency={:.2} cpu={:.1}%",
                aggregate.threads, aggregate.avg_throughput, aggregate.avg_latency, aggregate.avg_cpu
            );
            self.tracker.log(&aggregate).await?;
            completed.push(level);

            if levels.get(idx.saturating_add(1)).is_some() {
                self.enter(SweepState::Cooldown { after_level: level });
                self.pause.pause(self.config.cooldown()).await;
            }
        }
        Ok(completed)
    }

    async fn run_level(&mut self, level: u32, server: &mut L::Handle) -> AppResult<LevelAggregate> {
        let duration_secs = self.config.duration().as_secs();
        info!("RUNNING: {} threads | {} seconds", level, duration_secs);

        self.enter(SweepState::Spawning { level });
        let mut stream = self.runner.start(level, &self.config)?;
        let started = Instant::now();

        self.enter(SweepState::Streaming { level });
        let mut aggregator = SteadyStateAggregator::new(level, self.config.warmup());
        let mut progress = ProgressTicker::new(self.settings.progress_interval);
        while let Some(line) = stream.next_line().await? {
            let values = match parse_metric_line(&line, &self.settings.marker) {
                ParsedLine::Metric(values) => values,
                ParsedLine::Malformed => {
                    trace!(line = line.as_str(), "Dropped malformed metric line");
                    continue;
                }
                ParsedLine::NotAMetricLine => continue,
            };
            let cpu = match server.cpu_percent() {
                Ok(percent) => CpuReading::Sampled(percent),
                Err(err) => {
                    debug!("CPU sample failed, recording as unsampled: {}", err);
                    CpuReading::Unsampled
                }
            };
            let elapsed = started.elapsed();
            if let Some(elapsed_secs) = progress.observe(elapsed) {
                info!("[Progress] {}s / {}s", elapsed_secs, duration_secs);
            }
            aggregator.observe(MetricSample::new(values, cpu), elapsed);
        }

        self.enter(SweepState::LevelAggregating { level });
        let aggregate = aggregator.finalize();
        info!(level, samples = aggregate.samples, "Level complete");
        if aggregate.is_empty() {
            warn!(level, "No samples past the warmup period; exporting zeros");
        }
        if aggregate.cpu_unsampled > 0 {
            warn!(
                level,
                unsampled = aggregate.cpu_unsampled,
                "Some CPU samples failed and were counted as 0"
            );
        }
        Ok(aggregate)
    }

    /// Best-effort close so a failed sweep does not leave the session dangling.
    async fn abandon_session(&mut self) {
        if let Err(err) = self.tracker.finish().await {
            warn!("Failed to close tracking session after sweep failure: {}", err);
        }
    }

    fn enter(&mut self, next: SweepState) {
        debug!(from = %self.state, to = %next, "Sweep state");
        self.state = next;
    }
}
