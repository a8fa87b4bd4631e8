//! Clock abstraction
//!
//! Every timestamp written by the services (session start/completion,
//! unlocks, goal progress) comes from an injected [`Clock`], so streaks and
//! idempotence can be tested against a fixed point in time.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, RwLock};

/// Source of the current time
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day (UTC)
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.write() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.now.write() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// Shared handle stored in application state
pub type SharedClock = Arc<dyn Clock>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_is_stable() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        let clock = FixedClock::new(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_fixed_clock_advance_is_shared_between_clones() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 23, 0, 0).unwrap();
        let clock = FixedClock::new(at);
        let handle = clock.clone();
        handle.advance(chrono::Duration::hours(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
