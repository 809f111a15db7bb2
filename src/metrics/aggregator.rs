use std::time::Duration;

use super::types::{LevelAggregate, MetricSample};

/// Buffers the post-warmup samples of one concurrency level.
#[derive(Debug)]
pub struct SteadyStateAggregator {
    threads: u32,
    warmup: Duration,
    throughput: Vec<f64>,
    latency: Vec<f64>,
    cpu: Vec<f64>,
    cpu_unsampled: usize,
}

impl SteadyStateAggregator {
    #[must_use]
    pub const fn new(threads: u32, warmup: Duration) -> Self {
        Self {
            threads,
            warmup,
            throughput: Vec::new(),
            latency: Vec::new(),
            cpu: Vec::new(),
            cpu_unsampled: 0,
        }
    }

    /// Admits `sample` only when `elapsed` is strictly past the warmup period.
    /// Returns whether the sample was admitted.
    pub fn observe(&mut self, sample: MetricSample, elapsed: Duration) -> bool {
        if elapsed <= self.warmup {
            return false;
        }
        self.throughput.push(sample.throughput);
        self.latency.push(sample.latency);
        self.cpu.push(sample.cpu.value_or_zero());
        if !sample.cpu.is_sampled() {
            self.cpu_unsampled = self.cpu_unsampled.saturating_add(1);
        }
        true
    }

    /// Means of every admitted series; each is 0 when nothing was admitted.
    #[must_use]
    pub fn finalize(self) -> LevelAggregate {
        LevelAggregate {
            threads: self.threads,
            avg_throughput: mean(&self.throughput),
            avg_latency: mean(&self.latency),
            avg_cpu: mean(&self.cpu),
            samples: self.throughput.len(),
            cpu_unsampled: self.cpu_unsampled,
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "Level aggregates are float means of float samples."
)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = u32::try_from(values.len()).map_or(f64::from(u32::MAX), f64::from);
    values.iter().sum::<f64>() / count
}
