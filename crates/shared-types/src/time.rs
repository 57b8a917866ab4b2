//! Time source port.
//!
//! Event metadata timestamps and OTP codes both depend on "now"; commands
//! read it through [`TimeSource`] so tests can pin it.

use chrono::{DateTime, Utc};

/// UTC timestamp with nanosecond precision.
pub type Timestamp = DateTime<Utc>;

/// Abstract interface for the current time.
pub trait TimeSource: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Time source frozen at one instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub Timestamp);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_time_source() {
        let t0 = Utc.with_ymd_and_hms(2020, 2, 20, 14, 2, 0).unwrap();
        assert_eq!(FixedTimeSource(t0).now(), t0);
    }
}
