use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackerKind {
    /// Append events to a local JSON-lines file
    Jsonl,
    /// Post events to an HTTP tracking service
    Http,
    /// Only report through the log
    #[value(alias = "none")]
    #[serde(alias = "none")]
    Console,
}

impl TrackerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TrackerKind::Jsonl => "jsonl",
            TrackerKind::Http => "http",
            TrackerKind::Console => "console",
        }
    }
}

/// Concurrency levels as given on the command line; validated later together
/// with the rest of the run config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelList(pub Vec<u32>);

impl std::str::FromStr for LevelList {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>().map_err(|err| ConfigError::InvalidLevel {
                    value: part.to_owned(),
                    source: err,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(LevelList)
    }
}
