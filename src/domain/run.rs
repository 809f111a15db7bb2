use std::time::Duration;

use crate::error::ValidationError;

/// Immutable parameters of one sweep.
///
/// Built once from defaults, the config file and the command line, then
/// handed to the controller by reference for the lifetime of the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    host: String,
    port: u16,
    duration: Duration,
    warmup: Duration,
    levels: ConcurrencyLevels,
    workload: String,
    cooldown: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfigParts {
    pub host: String,
    pub port: u16,
    pub duration: Duration,
    pub warmup: Duration,
    pub levels: Vec<u32>,
    pub workload: String,
    pub cooldown: Duration,
}

impl RunConfig {
    /// Validates and freezes the sweep parameters.
    ///
    /// # Errors
    ///
    /// Returns an error when the host or workload is empty, the duration is
    /// zero, or the level list is empty, contains zero, or repeats a level.
    pub fn new(parts: RunConfigParts) -> Result<Self, ValidationError> {
        if parts.host.trim().is_empty() {
            return Err(ValidationError::HostEmpty);
        }
        if parts.workload.trim().is_empty() {
            return Err(ValidationError::WorkloadEmpty);
        }
        if parts.duration.is_zero() {
            return Err(ValidationError::DurationZero);
        }
        let levels = ConcurrencyLevels::new(parts.levels)?;
        Ok(Self {
            host: parts.host,
            port: parts.port,
            duration: parts.duration,
            warmup: parts.warmup,
            levels,
            workload: parts.workload,
            cooldown: parts.cooldown,
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn warmup(&self) -> Duration {
        self.warmup
    }

    #[must_use]
    pub const fn levels(&self) -> &ConcurrencyLevels {
        &self.levels
    }

    #[must_use]
    pub fn workload(&self) -> &str {
        &self.workload
    }

    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// True when no sample of any level can land past the warmup cutoff.
    #[must_use]
    pub fn warmup_covers_duration(&self) -> bool {
        self.warmup >= self.duration
    }
}

/// Ordered, distinct, non-zero concurrency levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyLevels(Vec<u32>);

impl ConcurrencyLevels {
    /// # Errors
    ///
    /// Returns an error when the list is empty, holds a zero, or repeats a level.
    pub fn new(levels: Vec<u32>) -> Result<Self, ValidationError> {
        if levels.is_empty() {
            return Err(ValidationError::LevelsEmpty);
        }
        for (idx, level) in levels.iter().enumerate() {
            if *level == 0 {
                return Err(ValidationError::LevelZero);
            }
            if levels.iter().take(idx).any(|seen| seen == level) {
                return Err(ValidationError::DuplicateLevel { level: *level });
            }
        }
        Ok(Self(levels))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Controller-side settings that are not forwarded to the load generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSettings {
    pub server_name: String,
    pub marker: String,
    pub project: String,
    pub run_name: String,
    pub progress_interval: Duration,
}
