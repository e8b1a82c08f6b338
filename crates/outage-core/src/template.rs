//! Weekly outage templates.
//!
//! A [`WeeklyTemplate`] is a stable, date-free description of recurring
//! outage windows: per weekday, an ordered list of minute-of-day spans. It
//! persists across refreshes until the upstream reports a different template,
//! and is projected onto concrete calendar dates on demand by
//! [`WeeklyTemplate::expand`] — occurrences are never pre-materialized or
//! cached, so expansion always reflects the template's latest state.

use chrono::{Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::interval::OutageInterval;
use crate::merge::merge_intervals;
use crate::time::{minute_to_instant, TimeWindow};

/// A minute-of-day span within a weekday bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteSpan {
    /// Start offset in minutes from local midnight (inclusive).
    pub start_minute: u32,
    /// End offset in minutes from local midnight (exclusive), up to 1440.
    pub end_minute: u32,
}

impl MinuteSpan {
    /// Creates a new span.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `start_minute >= end_minute`.
    pub fn new(start_minute: u32, end_minute: u32) -> Self {
        debug_assert!(start_minute < end_minute, "span start must precede end");
        Self {
            start_minute,
            end_minute,
        }
    }

    /// Returns the span length in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.end_minute - self.start_minute
    }
}

/// A weekly recurrence template: weekday 0..=6 (0 = Monday) mapped to
/// ordered definite outage spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTemplate {
    buckets: [Vec<MinuteSpan>; 7],
}

impl WeeklyTemplate {
    /// Creates an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a span to a weekday bucket (0 = Monday .. 6 = Sunday).
    ///
    /// Out-of-range weekdays are ignored.
    pub fn add(&mut self, weekday: u8, span: MinuteSpan) {
        if let Some(bucket) = self.buckets.get_mut(weekday as usize) {
            bucket.push(span);
            bucket.sort_by_key(|s| (s.start_minute, s.end_minute));
        }
    }

    /// Returns the spans for a weekday (0 = Monday .. 6 = Sunday).
    pub fn weekday(&self, weekday: u8) -> &[MinuteSpan] {
        self.buckets
            .get(weekday as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns true if no weekday has any span.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Projects the template onto concrete calendar occurrences overlapping
    /// the query window.
    ///
    /// Each local calendar date intersecting the window contributes one
    /// occurrence per span in its weekday bucket, anchored exactly as a
    /// concrete day schedule anchors its slots. Adjacent spans within a day
    /// fuse into maximal occurrences. Results are sorted ascending by start
    /// and recomputed on every call.
    pub fn expand<Tz: TimeZone>(&self, window: &TimeWindow, tz: &Tz) -> Vec<OutageInterval> {
        let mut occurrences = Vec::new();
        if self.is_empty() || window.start >= window.end {
            return occurrences;
        }

        let first = window.start.with_timezone(tz).date_naive();
        let last = window.end.with_timezone(tz).date_naive();

        let mut day = first;
        while day <= last {
            let bucket = self.weekday(day.weekday().num_days_from_monday() as u8);
            for span in bucket {
                let start = minute_to_instant(day, span.start_minute, tz);
                let end = minute_to_instant(day, span.end_minute, tz);
                if start < window.end && end > window.start {
                    occurrences.push(OutageInterval::probable(start, end));
                }
            }
            day = day.succ_opt().expect("valid successor date");
        }

        merge_intervals(occurrences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use chrono_tz::Europe::Kyiv;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monday_template() -> WeeklyTemplate {
        let mut template = WeeklyTemplate::new();
        // Monday 05:00-09:00 local.
        template.add(0, MinuteSpan::new(300, 540));
        template
    }

    mod buckets {
        use super::*;

        #[test]
        fn add_and_read_back() {
            let template = monday_template();
            assert_eq!(template.weekday(0), &[MinuteSpan::new(300, 540)]);
            assert!(template.weekday(1).is_empty());
            assert!(!template.is_empty());
        }

        #[test]
        fn out_of_range_weekday_ignored() {
            let mut template = WeeklyTemplate::new();
            template.add(7, MinuteSpan::new(0, 60));
            assert!(template.is_empty());
            assert!(template.weekday(9).is_empty());
        }

        #[test]
        fn spans_kept_sorted() {
            let mut template = WeeklyTemplate::new();
            template.add(2, MinuteSpan::new(600, 660));
            template.add(2, MinuteSpan::new(120, 180));
            assert_eq!(template.weekday(2)[0].start_minute, 120);
        }

        #[test]
        fn serde_roundtrip() {
            let template = monday_template();
            let json = serde_json::to_string(&template).unwrap();
            let parsed: WeeklyTemplate = serde_json::from_str(&json).unwrap();
            assert_eq!(template, parsed);
        }
    }

    mod expansion {
        use super::*;

        #[test]
        fn fourteen_day_window_yields_two_mondays() {
            let template = monday_template();
            // 2025-10-27 is a Monday; window starts at local midnight.
            let start = minute_to_instant(date(2025, 10, 27), 0, &Kyiv);
            let window = TimeWindow::new(start, start + Duration::days(14));

            let occurrences = template.expand(&window, &Kyiv);
            assert_eq!(occurrences.len(), 2);

            for (i, occurrence) in occurrences.iter().enumerate() {
                let local_start = occurrence.start.with_timezone(&Kyiv);
                assert_eq!(local_start.date_naive().weekday().num_days_from_monday(), 0);
                assert_eq!(
                    local_start.date_naive(),
                    date(2025, 10, 27) + Duration::days(7 * i as i64)
                );
                assert_eq!(occurrence.duration(), Duration::hours(4));
            }
            // Identical time-of-day on distinct dates.
            assert_eq!(
                occurrences[1].start - occurrences[0].start,
                Duration::days(7)
            );
        }

        #[test]
        fn occurrences_are_probable_source() {
            let template = monday_template();
            let start = utc(2025, 10, 26, 0, 0);
            let window = TimeWindow::new(start, start + Duration::days(7));
            let occurrences = template.expand(&window, &Kyiv);
            assert_eq!(occurrences.len(), 1);
            assert_eq!(
                occurrences[0].source,
                crate::interval::OutageSource::Probable
            );
        }

        #[test]
        fn window_clips_non_overlapping_occurrences() {
            let template = monday_template();
            // Window covering Tuesday..Sunday only: no Monday occurrence.
            let start = minute_to_instant(date(2025, 10, 28), 0, &Kyiv);
            let window = TimeWindow::new(start, start + Duration::days(6));
            assert!(template.expand(&window, &Kyiv).is_empty());
        }

        #[test]
        fn adjacent_spans_fuse_within_a_day() {
            let mut template = WeeklyTemplate::new();
            template.add(0, MinuteSpan::new(300, 420));
            template.add(0, MinuteSpan::new(420, 540));

            let start = minute_to_instant(date(2025, 10, 27), 0, &Kyiv);
            let window = TimeWindow::new(start, start + Duration::days(1));
            let occurrences = template.expand(&window, &Kyiv);
            assert_eq!(occurrences.len(), 1);
            assert_eq!(occurrences[0].duration(), Duration::hours(4));
        }

        #[test]
        fn expansion_reflects_latest_template_state() {
            let mut template = monday_template();
            let start = minute_to_instant(date(2025, 10, 27), 0, &Kyiv);
            let window = TimeWindow::new(start, start + Duration::days(7));

            assert_eq!(template.expand(&window, &Kyiv).len(), 1);

            // No caching: a mutated template is visible on the next call.
            template.add(1, MinuteSpan::new(600, 720));
            assert_eq!(template.expand(&window, &Kyiv).len(), 2);
        }

        #[test]
        fn empty_template_expands_to_nothing() {
            let template = WeeklyTemplate::new();
            let start = utc(2025, 10, 27, 0, 0);
            let window = TimeWindow::new(start, start + Duration::days(30));
            assert!(template.expand(&window, &Kyiv).is_empty());
        }
    }
}
