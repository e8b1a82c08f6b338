//! Hour-token format adapter.
//!
//! Decodes the embedded fact payload: per UTC day-timestamp, per group, 24
//! per-hour tokens keyed `"1".."24"`. Token runs are folded into minute
//! intervals by an explicit two-state machine whose only effect is interval
//! emission on the close transition.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use outage_core::interval::{OutageKind, OutageSource};
use outage_core::schedule::{DaySchedule, DayStatus};
use outage_core::time::{resolve_local, DAY_END_MINUTE};

use crate::adapter::DayPayload;
use crate::error::{AdapterError, AdapterResult};
use crate::normalize::normalize_intervals;
use crate::raw::{HourToken, RawInterval};

/// The wire format tag used in error reporting.
pub const FORMAT_HOUR_TOKEN: &str = "hour_token";

/// The group-name prefix carried on the wire.
pub const GROUP_PREFIX: &str = "GPV";

/// The local-time format of the container's update stamp.
const UPDATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// One day's hour tokens for one group, keyed `"1".."24"`.
pub type HourMap = BTreeMap<String, String>;

/// The decoded fact payload: day timestamps mapped to per-group hour maps,
/// plus container metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactPayload {
    /// Per-day data: UTC day-timestamp string mapped to group hour maps.
    #[serde(default)]
    pub data: BTreeMap<String, BTreeMap<String, HourMap>>,
    /// The container's update stamp, local `%d.%m.%Y %H:%M`.
    pub update: Option<String>,
    /// The container's marker for which day key is "today".
    pub today: Option<Value>,
}

impl FactPayload {
    /// Decodes a payload from a JSON document.
    pub fn from_json(raw: &str) -> AdapterResult<Self> {
        serde_json::from_str(raw).map_err(|err| {
            AdapterError::invalid_payload("payload is not a valid fact object")
                .with_format(FORMAT_HOUR_TOKEN)
                .with_source(err)
        })
    }

    /// Decodes a payload from an already-parsed JSON value.
    pub fn from_value(value: Value) -> AdapterResult<Self> {
        serde_json::from_value(value).map_err(|err| {
            AdapterError::invalid_payload("payload is not a valid fact object")
                .with_format(FORMAT_HOUR_TOKEN)
                .with_source(err)
        })
    }

    /// Lists the groups in the payload, with the wire prefix stripped.
    pub fn groups(&self) -> Vec<String> {
        let Some(first_day) = self.data.values().next() else {
            return Vec::new();
        };
        first_day
            .keys()
            .map(|key| key.strip_prefix(GROUP_PREFIX).unwrap_or(key).to_string())
            .collect()
    }

    /// Parses the container's update stamp, interpreted in the provider
    /// timezone.
    ///
    /// Unparseable values yield `None` with a warning, never an error.
    pub fn updated_on<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        let raw = self.update.as_deref()?;
        match NaiveDateTime::parse_from_str(raw, UPDATE_FORMAT) {
            Ok(naive) => Some(resolve_local(naive, tz)),
            Err(err) => {
                warn!(update = raw, error = %err, "unparseable update timestamp");
                None
            }
        }
    }

    /// Builds one group's day schedules, anchored in the provider timezone.
    ///
    /// Day keys are UTC timestamps resolved to the provider-local calendar
    /// date; a day whose key does not parse, or that lacks the group, is
    /// skipped with a warning. Decoded days always carry
    /// [`DayStatus::Applies`]: this format publishes no per-day status.
    pub fn day_schedules<Tz: TimeZone>(
        &self,
        group: &str,
        tz: &Tz,
    ) -> AdapterResult<Vec<DaySchedule>> {
        let group_key = format!("{GROUP_PREFIX}{group}");
        if !self
            .data
            .values()
            .any(|day| day.contains_key(&group_key))
        {
            return Err(
                AdapterError::unknown_group(format!("group {group} not present in payload"))
                    .with_format(FORMAT_HOUR_TOKEN),
            );
        }

        let updated_at = self.updated_on(tz);
        let mut days = Vec::new();
        for (timestamp, day_data) in &self.data {
            let Some(hours) = day_data.get(&group_key) else {
                warn!(timestamp = %timestamp, group, "day has no entry for group, skipping");
                continue;
            };
            let Some(date) = parse_day_timestamp(timestamp, tz) else {
                continue;
            };
            let raw = DayPayload::HourToken(hours).parse();
            let intervals = normalize_intervals(&raw, date, tz, OutageSource::Planned);
            days.push(
                DaySchedule::new(date, DayStatus::Applies)
                    .with_intervals(intervals)
                    .with_updated_at(updated_at),
            );
        }
        days.sort_by_key(|d| d.date);
        Ok(days)
    }
}

fn parse_day_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<chrono::NaiveDate> {
    let seconds: i64 = match raw.parse() {
        Ok(seconds) => seconds,
        Err(err) => {
            warn!(timestamp = raw, error = %err, "skipping unparseable day timestamp");
            return None;
        }
    };
    match Utc.timestamp_opt(seconds, 0) {
        chrono::LocalResult::Single(dt) => Some(dt.with_timezone(tz).date_naive()),
        _ => {
            warn!(timestamp = raw, "skipping out-of-range day timestamp");
            None
        }
    }
}

/// Decoder state: either no interval is open, or one is open since a minute
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    NoOpenInterval,
    OpenInterval { start_minute: u32 },
}

/// Folds 24 hour tokens into raw minute intervals.
///
/// Hours are indexed 1..=24; a missing key counts as `yes`. Interval
/// emission happens only on a close transition:
/// - `yes` closes an open interval at this hour's `:00`;
/// - `no` opens at `:00` or continues;
/// - `second` opens at this hour's `:30`, overriding any prior state;
/// - `first` closes an open interval at this hour's `:30`; isolated, it
///   emits a single 30-minute interval;
/// - an interval still open after hour 24 closes at day end.
pub fn decode_hour_tokens(hours: &HourMap) -> Vec<RawInterval> {
    use DecodeState::*;

    let mut intervals = Vec::new();
    let mut state = NoOpenInterval;

    for n in 1..=24u32 {
        let hour_start = (n - 1) * 60;
        let token = hours
            .get(&n.to_string())
            .map(|raw| HourToken::parse(raw))
            .unwrap_or(HourToken::Yes);

        state = match (state, token) {
            (OpenInterval { start_minute }, HourToken::Yes) => {
                intervals.push(RawInterval::new(start_minute, hour_start, OutageKind::Definite));
                NoOpenInterval
            }
            (NoOpenInterval, HourToken::Yes) => NoOpenInterval,
            (NoOpenInterval, HourToken::No) => OpenInterval {
                start_minute: hour_start,
            },
            (open @ OpenInterval { .. }, HourToken::No) => open,
            (_, HourToken::Second) => OpenInterval {
                start_minute: hour_start + 30,
            },
            (OpenInterval { start_minute }, HourToken::First) => {
                intervals.push(RawInterval::new(
                    start_minute,
                    hour_start + 30,
                    OutageKind::Definite,
                ));
                NoOpenInterval
            }
            (NoOpenInterval, HourToken::First) => {
                // Isolated half-hour with no preceding run.
                intervals.push(RawInterval::new(
                    hour_start,
                    hour_start + 30,
                    OutageKind::Definite,
                ));
                NoOpenInterval
            }
        };
    }

    if let OpenInterval { start_minute } = state {
        intervals.push(RawInterval::new(start_minute, DAY_END_MINUTE, OutageKind::Definite));
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Kyiv;
    use serde_json::json;

    fn hour_map(tokens: &[(u32, &str)]) -> HourMap {
        tokens
            .iter()
            .map(|(n, token)| (n.to_string(), token.to_string()))
            .collect()
    }

    mod state_machine {
        use super::*;

        #[test]
        fn worked_example() {
            // {13:second, 14..16:no, 17:first, 18:yes} -> [12:30, 16:30).
            let hours = hour_map(&[
                (13, "second"),
                (14, "no"),
                (15, "no"),
                (16, "no"),
                (17, "first"),
                (18, "yes"),
            ]);
            let intervals = decode_hour_tokens(&hours);
            assert_eq!(intervals.len(), 1);
            assert_eq!(intervals[0].start_minute, 12 * 60 + 30);
            assert_eq!(intervals[0].end_minute, 16 * 60 + 30);
        }

        #[test]
        fn all_yes_is_empty() {
            let hours = hour_map(&(1..=24).map(|n| (n, "yes")).collect::<Vec<_>>());
            assert!(decode_hour_tokens(&hours).is_empty());
        }

        #[test]
        fn all_no_spans_the_whole_day() {
            let hours = hour_map(&(1..=24).map(|n| (n, "no")).collect::<Vec<_>>());
            let intervals = decode_hour_tokens(&hours);
            assert_eq!(intervals.len(), 1);
            assert_eq!(intervals[0].start_minute, 0);
            assert_eq!(intervals[0].end_minute, DAY_END_MINUTE);
        }

        #[test]
        fn missing_hours_count_as_yes() {
            // Only hours 3 and 4 are off; everything else is absent.
            let hours = hour_map(&[(3, "no"), (4, "no")]);
            let intervals = decode_hour_tokens(&hours);
            assert_eq!(intervals.len(), 1);
            assert_eq!(intervals[0].start_minute, 2 * 60);
            assert_eq!(intervals[0].end_minute, 4 * 60);
        }

        #[test]
        fn isolated_first_is_a_half_hour() {
            let hours = hour_map(&[(10, "first")]);
            let intervals = decode_hour_tokens(&hours);
            assert_eq!(intervals.len(), 1);
            assert_eq!(intervals[0].start_minute, 9 * 60);
            assert_eq!(intervals[0].end_minute, 9 * 60 + 30);
        }

        #[test]
        fn trailing_open_interval_closes_at_day_end() {
            let hours = hour_map(&[(23, "no"), (24, "no")]);
            let intervals = decode_hour_tokens(&hours);
            assert_eq!(intervals.len(), 1);
            assert_eq!(intervals[0].start_minute, 22 * 60);
            assert_eq!(intervals[0].end_minute, DAY_END_MINUTE);
        }

        #[test]
        fn second_overrides_an_open_run() {
            // An open run restarts at the half hour when a second arrives.
            let hours = hour_map(&[(8, "no"), (9, "second"), (10, "yes")]);
            let intervals = decode_hour_tokens(&hours);
            assert_eq!(intervals.len(), 1);
            assert_eq!(intervals[0].start_minute, 8 * 60 + 30);
            assert_eq!(intervals[0].end_minute, 9 * 60);
        }

        #[test]
        fn unknown_token_treated_as_power_on() {
            let hours = hour_map(&[(5, "no"), (6, "banana"), (7, "no"), (8, "yes")]);
            let intervals = decode_hour_tokens(&hours);
            assert_eq!(intervals.len(), 2);
            assert_eq!((intervals[0].start_minute, intervals[0].end_minute), (240, 300));
            assert_eq!((intervals[1].start_minute, intervals[1].end_minute), (360, 420));
        }

        #[test]
        fn two_separate_runs() {
            let hours = hour_map(&[(2, "no"), (3, "no"), (4, "yes"), (20, "no"), (21, "yes")]);
            let intervals = decode_hour_tokens(&hours);
            assert_eq!(intervals.len(), 2);
        }
    }

    mod payload {
        use super::*;

        fn fact() -> FactPayload {
            // 1761602400 = 2025-10-27T22:00:00Z, local date 2025-10-28 in Kyiv.
            // 1761516000 = 2025-10-26T22:00:00Z, local date 2025-10-27 in Kyiv.
            FactPayload::from_value(json!({
                "data": {
                    "1761516000": {
                        "GPV1.1": {"13": "second", "14": "no", "15": "no", "16": "no", "17": "first"},
                        "GPV2.2": {"1": "no", "2": "yes"}
                    },
                    "1761602400": {
                        "GPV1.1": {"5": "no", "6": "yes"}
                    }
                },
                "update": "27.10.2025 06:00"
            }))
            .unwrap()
        }

        #[test]
        fn groups_strip_the_prefix() {
            assert_eq!(fact().groups(), vec!["1.1", "2.2"]);
        }

        #[test]
        fn update_stamp_is_provider_local() {
            // 06:00 Kyiv winter time is 04:00 UTC.
            let updated = fact().updated_on(&Kyiv).unwrap();
            assert_eq!(
                updated,
                Utc.with_ymd_and_hms(2025, 10, 27, 4, 0, 0).unwrap()
            );
        }

        #[test]
        fn unparseable_update_is_none() {
            let fact = FactPayload {
                update: Some("soon".into()),
                ..Default::default()
            };
            assert!(fact.updated_on(&Kyiv).is_none());
        }

        #[test]
        fn day_schedules_for_group() {
            let days = fact().day_schedules("1.1", &Kyiv).unwrap();
            assert_eq!(days.len(), 2);

            assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 10, 27).unwrap());
            assert_eq!(days[0].intervals.len(), 1);
            // The worked example anchored to Kyiv winter time (UTC+2).
            assert_eq!(
                days[0].intervals[0].start,
                Utc.with_ymd_and_hms(2025, 10, 27, 10, 30, 0).unwrap()
            );
            assert_eq!(
                days[0].intervals[0].end,
                Utc.with_ymd_and_hms(2025, 10, 27, 14, 30, 0).unwrap()
            );

            assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 10, 28).unwrap());
            assert!(days[0].updated_at.is_some());
        }

        #[test]
        fn day_without_the_group_is_skipped() {
            // Group 2.2 appears only in the first day's data.
            let days = fact().day_schedules("2.2", &Kyiv).unwrap();
            assert_eq!(days.len(), 1);
            assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 10, 27).unwrap());
        }

        #[test]
        fn unknown_group_is_an_error() {
            let err = fact().day_schedules("9.9", &Kyiv).unwrap_err();
            assert_eq!(err.code(), crate::error::AdapterErrorCode::UnknownGroup);
        }

        #[test]
        fn unparseable_day_key_is_skipped() {
            let fact = FactPayload::from_value(json!({
                "data": {
                    "not-a-timestamp": {"GPV1.1": {"1": "no"}},
                    "1761516000": {"GPV1.1": {"1": "no", "2": "yes"}}
                }
            }))
            .unwrap();
            let days = fact.day_schedules("1.1", &Kyiv).unwrap();
            assert_eq!(days.len(), 1);
        }
    }
}
