//! Time anchoring and query windows.
//!
//! This module provides [`minute_to_instant`] for resolving minute-of-day
//! offsets against a calendar date in a provider timezone, and [`TimeWindow`]
//! for defining half-open query ranges.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// The exclusive upper bound of a day in minute offsets.
pub const DAY_END_MINUTE: u32 = 1440;

/// Resolves a minute-of-day offset against a calendar date in the given
/// timezone, returning the instant in UTC.
///
/// Offset 1440 maps to 23:59:59.999999 local on the same date, never to
/// midnight of the following date, so a full-day interval stays anchored to
/// its own calendar day.
///
/// Wall-clock times that fall in a DST gap are shifted forward one hour;
/// ambiguous wall-clock times resolve to the earlier offset.
pub fn minute_to_instant<Tz: TimeZone>(date: NaiveDate, minute: u32, tz: &Tz) -> DateTime<Utc> {
    let local = if minute >= DAY_END_MINUTE {
        date.and_hms_micro_opt(23, 59, 59, 999_999)
            .expect("valid day-end time")
    } else {
        date.and_hms_opt(minute / 60, minute % 60, 0)
            .expect("valid time of day")
    };
    resolve_local(local, tz)
}

/// Resolves a naive local datetime in the given timezone to a UTC instant.
pub fn resolve_local<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // Spring-forward gap: the wall-clock time does not exist locally.
            let shifted = local + Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
                LocalResult::None => Utc.from_utc_datetime(&local),
            }
        }
    }
}

/// A half-open query range `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a window starting at `now` and extending by `horizon`.
    pub fn from_now(now: DateTime<Utc>, horizon: Duration) -> Self {
        Self::new(now, now + horizon)
    }

    /// Creates a window covering one local calendar date in the given
    /// timezone.
    pub fn for_local_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        let start = minute_to_instant(date, 0, tz);
        let next = date.succ_opt().expect("valid successor date");
        let end = minute_to_instant(next, 0, tz);
        Self { start, end }
    }

    /// Returns the duration of the window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if an instant falls within this window (`[start, end)`).
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}
