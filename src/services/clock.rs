//! Injectable clock so time-dependent logic is testable without real delays.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now" for services and the background sweeper.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Today's calendar date (UTC).
    fn today(&self) -> NaiveDate {
        self.now_utc().date_naive()
    }

    /// Current time of day in minutes since midnight (UTC).
    fn minute_of_day(&self) -> u16 {
        use chrono::Timelike;
        let t = self.now_utc().time();
        (t.hour() * 60 + t.minute()) as u16
    }
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-instant clock for tests. Shared via `Arc` when a service and the
/// test both need to see advances.
#[derive(Debug)]
pub struct FixedClock {
    now: parking_lot::RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: parking_lot::RwLock::new(now),
        }
    }

    /// Move the fixed instant, e.g. between sweeper ticks in a test.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}
