//! Creation timestamps.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, SubsecRound, Utc};

/// Wall clock that never goes backwards within one process.
///
/// Stamps are truncated to microseconds so they survive a round trip through
/// the SQLite text column unchanged.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        let now = Utc::now().trunc_subsecs(6);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let stamp = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_stamps_never_decrease() {
        let clock = MonotonicClock::new();
        let mut prev = clock.now();
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn test_stamps_have_microsecond_precision() {
        let clock = MonotonicClock::new();
        assert_eq!(clock.now().nanosecond() % 1_000, 0);
    }

    #[test]
    fn test_clock_behind_previous_stamp_holds() {
        let clock = MonotonicClock::new();
        let future = Utc::now() + chrono::Duration::hours(1);
        *clock.last.lock().unwrap() = Some(future);
        assert_eq!(clock.now(), future);
    }
}
