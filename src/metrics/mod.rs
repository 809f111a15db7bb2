//! Metric-line parsing and steady-state aggregation.
mod aggregator;
mod parser;
mod types;


pub use aggregator::SteadyStateAggregator;
pub use parser::{DEFAULT_METRIC_MARKER, ParsedLine, parse_metric_line};
pub use types::{CpuReading, LevelAggregate, MetricSample, MetricValues};
