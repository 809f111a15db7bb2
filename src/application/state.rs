use std::fmt;

/// Controller lifecycle; each transition is logged at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Idle,
    Locating,
    Aborted,
    Located,
    Spawning { level: u32 },
    Streaming { level: u32 },
    LevelAggregating { level: u32 },
    Exporting { level: u32 },
    Cooldown { after_level: u32 },
    Finishing,
    Done,
}

impl fmt::Display for SweepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepState::Idle => f.write_str("idle"),
            SweepState::Locating => f.write_str("locating"),
            SweepState::Aborted => f.write_str("aborted"),
            SweepState::Located => f.write_str("located"),
            SweepState::Spawning { level } => write!(f, "spawning({})", level),
            SweepState::Streaming { level } => write!(f, "streaming({})", level),
            SweepState::LevelAggregating { level } => write!(f, "aggregating({})", level),
            SweepState::Exporting { level } => write!(f, "exporting({})", level),
            SweepState::Cooldown { after_level } => write!(f, "cooldown(after {})", after_level),
            SweepState::Finishing => f.write_str("finishing"),
            SweepState::Done => f.write_str("done"),
        }
    }
}
