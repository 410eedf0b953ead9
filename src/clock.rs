//! Time sources.
//!
//! All timestamps are terminal-local wall-clock time. Operations read "now"
//! through [`Clock`] so expiry and shift arithmetic can be driven by tests.

use std::sync::Mutex;

use chrono::{Local, NaiveDateTime, TimeDelta};

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current terminal-local time.
    fn now(&self) -> NaiveDateTime;
}

/// The operating system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use timeclock::clock::{Clock, ManualClock};
/// use chrono::{NaiveDateTime, TimeDelta};
///
/// let start = NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(TimeDelta::minutes(510));
/// assert_eq!(clock.now().format("%H:%M").to_string(), "17:30");
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        *self.lock() = now;
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.lock();
        *now += delta;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        // A poisoned guard still holds a valid timestamp.
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.lock()
    }
}
