/// Server CPU reading taken when a metric line arrived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CpuReading {
    Sampled(f64),
    /// The probe failed; aggregates count this as 0 but keep it distinguishable.
    Unsampled,
}

impl CpuReading {
    #[must_use]
    pub const fn value_or_zero(self) -> f64 {
        match self {
            CpuReading::Sampled(value) => value,
            CpuReading::Unsampled => 0.0,
        }
    }

    #[must_use]
    pub const fn is_sampled(self) -> bool {
        matches!(self, CpuReading::Sampled(_))
    }
}

/// Throughput and latency carried by one metric line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricValues {
    pub throughput: f64,
    pub latency: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricSample {
    pub throughput: f64,
    pub latency: f64,
    pub cpu: CpuReading,
}

impl MetricSample {
    #[must_use]
    pub const fn new(values: MetricValues, cpu: CpuReading) -> Self {
        Self {
            throughput: values.throughput,
            latency: values.latency,
            cpu,
        }
    }
}

/// Steady-state means for one concurrency level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelAggregate {
    pub threads: u32,
    pub avg_throughput: f64,
    pub avg_latency: f64,
    pub avg_cpu: f64,
    /// Samples admitted past the warmup cutoff.
    pub samples: usize,
    /// Admitted samples whose CPU probe failed.
    pub cpu_unsampled: usize,
}

impl LevelAggregate {
    /// An empty window reports zero means; this tells it apart from a measured zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.samples == 0
    }
}
