use super::types::MetricValues;

/// Marker emitted by the reference load generator in front of each sample.
pub const DEFAULT_METRIC_MARKER: &str = "[METRICS]";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParsedLine {
    Metric(MetricValues),
    NotAMetricLine,
    Malformed,
}

/// Classifies one line of load-generator output.
///
/// The marker may appear anywhere in the line; the two whitespace-separated
/// tokens right after it are throughput and latency. Anything after those two
/// tokens is ignored.
#[must_use]
pub fn parse_metric_line(line: &str, marker: &str) -> ParsedLine {
    let Some((_, rest)) = line.split_once(marker) else {
        return ParsedLine::NotAMetricLine;
    };
    let mut tokens = rest.split_whitespace();
    let Some(throughput) = tokens.next().and_then(parse_value) else {
        return ParsedLine::Malformed;
    };
    let Some(latency) = tokens.next().and_then(parse_value) else {
        return ParsedLine::Malformed;
    };
    ParsedLine::Metric(MetricValues {
        throughput,
        latency,
    })
}

fn parse_value(token: &str) -> Option<f64> {
    let value = token.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_metric(line: &str) -> Result<MetricValues, String> {
        match parse_metric_line(line, DEFAULT_METRIC_MARKER) {
            ParsedLine::Metric(values) => Ok(values),
            other => Err(format!("expected metric for {:?}, got {:?}", line, other)),
        }
    }

    #[test]
    fn parses_generator_output() -> Result<(), String> {
        let values = expect_metric("[METRICS] 1000.00 5.20 0")?;
        if values
            != (MetricValues {
                throughput: 1000.0,
                latency: 5.2,
            })
        {
            return Err(format!("unexpected values: {:?}", values));
        }
        Ok(())
    }

    #[test]
    fn marker_can_follow_a_prefix() -> Result<(), String> {
        let values = expect_metric("worker-3 [METRICS]\t250.5   12.75")?;
        if values.throughput.to_bits() != 250.5_f64.to_bits() {
            return Err(format!("unexpected throughput: {}", values.throughput));
        }
        Ok(())
    }

    #[test]
    fn lines_without_marker_are_not_metrics() {
        for line in ["", "Final Benchmark Results", "METRICS 1 2", "[metrics] 1 2"] {
            assert_eq!(
                parse_metric_line(line, DEFAULT_METRIC_MARKER),
                ParsedLine::NotAMetricLine
            );
        }
    }

    #[test]
    fn bad_tokens_are_malformed() {
        for line in [
            "[METRICS]",
            "[METRICS] 1000.0",
            "[METRICS] fast slow",
            "[METRICS] 1000.0 n/a",
            "[METRICS] -1.0 2.0",
            "[METRICS] NaN 2.0",
            "[METRICS] 1.0 inf",
        ] {
            assert_eq!(
                parse_metric_line(line, DEFAULT_METRIC_MARKER),
                ParsedLine::Malformed,
                "line: {}",
                line
            );
        }
    }

    #[test]
    fn custom_marker() -> Result<(), String> {
        match parse_metric_line("@@ 10 20", "@@") {
            ParsedLine::Metric(_) => Ok(()),
            other => Err(format!("unexpected: {:?}", other)),
        }
    }
}
