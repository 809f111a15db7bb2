use std::time::Duration;

use crate::config::parse_duration_value;
use crate::error::ConfigError;

pub(super) fn parse_duration_arg(s: &str) -> Result<Duration, ConfigError> {
    parse_duration_value(s)
}
