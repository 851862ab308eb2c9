//! Same-day trade time handling.
//!
//! Quote feeds report a bare `HH:MM:SS` time-of-day with no date attached,
//! so every comparison in the engine is a same-day comparison. A window or
//! alert that straddles midnight sees a large negative age and empties
//! itself on the next sweep. That matches the behavior of the upstream feed
//! (quotes only flow during daytime trading sessions) and is accepted here
//! rather than papered over.

use std::fmt;

use chrono::{Local, NaiveTime, Timelike};

/// Time-of-day of a quote or an alert, second granularity.
///
/// Ordering is plain chronological ordering within a single trading day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TradeTime(NaiveTime);

impl TradeTime {
    /// Parse the feed's fixed-width `HH:MM:SS` form.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveTime::parse_from_str(s, "%H:%M:%S").ok().map(Self)
    }

    pub fn from_hms(hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, min, sec).map(Self)
    }

    /// Seconds from `self` to `later`. Negative when `later` is behind us.
    pub fn seconds_until(&self, later: TradeTime) -> i64 {
        later.0.signed_duration_since(self.0).num_seconds()
    }

    /// Shift by whole seconds, wrapping at midnight.
    pub fn plus_seconds(&self, secs: i64) -> Self {
        let total = i64::from(self.0.num_seconds_from_midnight()) + secs;
        let wrapped = total.rem_euclid(86_400) as u32;
        Self(
            NaiveTime::from_num_seconds_from_midnight_opt(wrapped, 0)
                .expect("wrapped seconds are always < 86400"),
        )
    }
}

impl fmt::Display for TradeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

/// Wall-clock source for refresh cycles and sweeps.
///
/// The engine itself never reads the system clock; callers obtain `now`
/// here and pass it in, which keeps every monitor decision replayable.
pub trait Clock: Send + Sync {
    fn now_time(&self) -> TradeTime;
}

/// System clock in the machine's local timezone, truncated to seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_time(&self) -> TradeTime {
        let now = Local::now().time();
        TradeTime::from_hms(now.hour(), now.minute(), now.second())
            .expect("system clock components are in range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_width_form() {
        let t = TradeTime::parse("13:00:05").unwrap();
        assert_eq!(t, TradeTime::from_hms(13, 0, 5).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(TradeTime::parse("25:00:00").is_none());
        assert!(TradeTime::parse("not a time").is_none());
    }

    #[test]
    fn ordering_is_chronological() {
        let a = TradeTime::parse("09:30:00").unwrap();
        let b = TradeTime::parse("09:30:01").unwrap();
        assert!(a < b);
        assert_eq!(a.seconds_until(b), 1);
        assert_eq!(b.seconds_until(a), -1);
    }

    #[test]
    fn plus_seconds_wraps_at_midnight() {
        let t = TradeTime::parse("23:59:50").unwrap();
        assert_eq!(t.plus_seconds(20), TradeTime::parse("00:00:10").unwrap());
    }
}
