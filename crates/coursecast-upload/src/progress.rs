//! Percent progress for the direct transfer.

use std::sync::atomic::{AtomicU8, Ordering};

/// `round(100 * sent / total)`, clamped to `[0, 100]`. An empty file counts as done.
pub fn percent_complete(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = sent as f64 / total as f64 * 100.0;
    ratio.round().clamp(0.0, 100.0) as u8
}

/// Keeps the highest percent seen so published progress never moves backwards.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: AtomicU8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new percent when it is higher than anything recorded before.
    pub fn record(&self, sent: u64, total: u64) -> Option<u8> {
        let percent = percent_complete(sent, total);
        let previous = self.last.fetch_max(percent, Ordering::AcqRel);
        (percent > previous).then_some(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_and_clamps() {
        assert_eq!(percent_complete(0, 200), 0);
        assert_eq!(percent_complete(1, 200), 1); // 0.5 rounds up
        assert_eq!(percent_complete(199, 200), 100);
        assert_eq!(percent_complete(100, 300), 33);
        assert_eq!(percent_complete(500, 200), 100);
        assert_eq!(percent_complete(0, 0), 100);
    }

    #[test]
    fn test_tracker_is_monotonic() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.record(0, 100), None);
        assert_eq!(tracker.record(40, 100), Some(40));
        assert_eq!(tracker.record(40, 100), None);
        assert_eq!(tracker.record(10, 100), None);
        assert_eq!(tracker.record(41, 100), Some(41));
        assert_eq!(tracker.record(100, 100), Some(100));
        assert_eq!(tracker.record(250, 100), None);
    }
}
