use std::time::Duration;

/// Coarse progress marks driven by line arrival rather than a timer.
///
/// A mark fires on the first observation at or past the next multiple of the
/// interval, so output lands near, not exactly on, each boundary.
#[derive(Debug)]
pub struct ProgressTicker {
    interval_secs: u64,
    next_mark_secs: u64,
}

impl ProgressTicker {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let interval_secs = interval.as_secs().max(1);
        Self {
            interval_secs,
            next_mark_secs: interval_secs,
        }
    }

    /// Returns the whole elapsed seconds to report, if a mark was crossed.
    pub fn observe(&mut self, elapsed: Duration) -> Option<u64> {
        let elapsed_secs = elapsed.as_secs();
        if elapsed_secs < self.next_mark_secs {
            return None;
        }
        let crossed = elapsed_secs
            .checked_div(self.interval_secs)
            .unwrap_or(0)
            .saturating_add(1);
        self.next_mark_secs = crossed.saturating_mul(self.interval_secs);
        Some(elapsed_secs)
    }
}
