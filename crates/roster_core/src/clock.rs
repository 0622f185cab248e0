//! Timestamp source for record writes.
//!
//! # Invariants
//! - Timestamps are RFC 3339 UTC strings with millisecond precision.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::cell::Cell;

/// Supplies the `createdAt`/`updatedAt` stamp for one write.
pub trait Clock {
    fn now(&self) -> String;
}

/// Wall-clock implementation backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        format_timestamp(Utc::now())
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// Used by tests and imports that need reproducible timestamps.
#[derive(Debug)]
pub struct ManualClock {
    current: Cell<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Cell::new(start),
            step,
        }
    }

    /// Starts at the Unix epoch and advances one second per read.
    pub fn from_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH, Duration::seconds(1))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> String {
        let value = self.current.get();
        self.current.set(value + self.step);
        format_timestamp(value)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> String {
        (**self).now()
    }
}

/// Formats a UTC instant the way stored documents carry it.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};

    #[test]
    fn manual_clock_advances_per_read() {
        let clock = ManualClock::from_epoch();
        assert_eq!(clock.now(), "1970-01-01T00:00:00.000Z");
        assert_eq!(clock.now(), "1970-01-01T00:00:01.000Z");
    }
}
