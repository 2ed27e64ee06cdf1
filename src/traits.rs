//! Abstraction over "now" so schedule evaluation can be tested
//! deterministically.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDateTime};

// ==================== Clock Trait ====================

/// Source of the current wall-clock time.
///
/// Opening hours are written in local time, so clocks hand out naive local
/// date-times rather than instants.
pub trait Clock: Send + Sync {
    fn now_local(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time zone.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// Read the wall clock in the local time zone.
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Mock clock for testing with controllable time.
#[derive(Debug, Clone)]
pub struct MockClock {
    time: Arc<Mutex<NaiveDateTime>>,
}

impl MockClock {
    /// Create a new mock clock set to the given local time.
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Set the mock clock to a new time.
    pub fn set_time(&self, time: NaiveDateTime) {
        *self.lock() = time;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut time = self.lock();
        *time += duration;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        // A poisoned lock still holds a valid timestamp
        self.time.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for MockClock {
    /// Return the currently set time.
    fn now_local(&self) -> NaiveDateTime {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate};

    use super::*;

    fn datetime(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_system_clock_returns_current_time() {
        let clock = SystemClock;
        let before = Local::now().naive_local();
        let clock_time = clock.now_local();
        let after = Local::now().naive_local();

        assert!(clock_time >= before);
        assert!(clock_time <= after);
    }

    #[test]
    fn test_mock_clock_returns_set_time() {
        let fixed = datetime(15, 14, 30);
        let clock = MockClock::new(fixed);
        assert_eq!(clock.now_local(), fixed);
    }

    #[test]
    fn test_mock_clock_can_be_updated() {
        let clock = MockClock::new(datetime(15, 10, 0));
        clock.set_time(datetime(15, 14, 0));
        assert_eq!(clock.now_local(), datetime(15, 14, 0));
    }

    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new(datetime(15, 10, 0));
        clock.advance(chrono::Duration::hours(2));
        assert_eq!(clock.now_local(), datetime(15, 12, 0));
    }

    #[test]
    fn test_mock_clock_clones_share_time() {
        let clock = MockClock::new(datetime(15, 10, 0));
        let shared = clock.clone();
        clock.advance(chrono::Duration::minutes(30));
        assert_eq!(shared.now_local(), datetime(15, 10, 30));
    }
}
