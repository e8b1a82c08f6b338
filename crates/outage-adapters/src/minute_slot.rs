//! Minute-slot format adapter.
//!
//! Decodes the per-group planned-outage payload: each group carries a
//! `today` and `tomorrow` section with an RFC 3339 date, a day status, and a
//! list of minute-offset slots, plus an `updatedOn` timestamp. Valid slots
//! map 1:1 to raw intervals; malformed slots are skipped with a warning.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use outage_core::interval::OutageSource;
use outage_core::schedule::{DaySchedule, DayStatus};

use crate::adapter::DayPayload;
use crate::error::{AdapterError, AdapterResult};
use crate::normalize::normalize_intervals;
use crate::raw::{decode_slot, RawInterval};

/// The wire format tag used in error reporting.
pub const FORMAT_MINUTE_SLOT: &str = "minute_slot";

/// One day's section of a group payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySection {
    /// The day's calendar date, RFC 3339 with offset.
    pub date: Option<String>,
    /// The upstream day status string.
    pub status: Option<String>,
    /// Raw slot records; decoded leniently one by one.
    #[serde(default)]
    pub slots: Vec<Value>,
}

impl DaySection {
    /// Maps the upstream status string to a [`DayStatus`].
    ///
    /// A missing or unrecognized status maps to [`DayStatus::Pending`], the
    /// latter with a warning.
    pub fn day_status(&self) -> DayStatus {
        match self.status.as_deref() {
            Some("ScheduleApplies") => DayStatus::Applies,
            Some("WaitingForSchedule") => DayStatus::Pending,
            Some("EmergencyShutdowns") => DayStatus::Emergency,
            Some(other) => {
                warn!(status = other, "unrecognized day status, treating as pending");
                DayStatus::Pending
            }
            None => DayStatus::Pending,
        }
    }

    /// Parses the section's calendar date.
    pub fn local_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt.date_naive()),
            Err(err) => {
                warn!(date = raw, error = %err, "unparseable day date");
                None
            }
        }
    }

    /// Decodes the section's slots into raw intervals, skipping malformed
    /// records.
    pub fn raw_intervals(&self) -> Vec<RawInterval> {
        self.slots.iter().filter_map(decode_slot).collect()
    }

    /// Builds a [`DaySchedule`] for this section, anchored in the provider
    /// timezone.
    ///
    /// Returns `None` when the section has no parseable date. Slots are
    /// decoded into intervals only when the schedule applies; pending and
    /// emergency days yield an empty interval list.
    pub fn day_schedule<Tz: TimeZone>(&self, tz: &Tz) -> Option<DaySchedule> {
        let date = self.local_date()?;
        let status = self.day_status();
        let intervals = if status == DayStatus::Applies {
            let raw = DayPayload::MinuteSlot(self).parse();
            normalize_intervals(&raw, date, tz, OutageSource::Planned)
        } else {
            Vec::new()
        };
        Some(DaySchedule::new(date, status).with_intervals(intervals))
    }
}

/// One group's planned-outage data: today, tomorrow, and the update stamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDays {
    /// Today's section.
    pub today: Option<DaySection>,
    /// Tomorrow's section.
    pub tomorrow: Option<DaySection>,
    /// When the upstream last updated this group, RFC 3339.
    #[serde(rename = "updatedOn")]
    pub updated_on: Option<String>,
}

impl GroupDays {
    /// Parses the group's updated-on timestamp.
    ///
    /// Unparseable values yield `None` with a warning, never an error.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.updated_on.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(err) => {
                warn!(updated_on = raw, error = %err, "unparseable updatedOn timestamp");
                None
            }
        }
    }

    /// Returns the dates for which a schedule section is present.
    pub fn planned_dates(&self) -> Vec<NaiveDate> {
        self.sections()
            .filter_map(DaySection::local_date)
            .collect()
    }

    /// Builds the group's day schedules, anchored in the provider timezone.
    pub fn day_schedules<Tz: TimeZone>(&self, tz: &Tz) -> Vec<DaySchedule> {
        let updated_at = self.updated_at();
        self.sections()
            .filter_map(|section| section.day_schedule(tz))
            .map(|day| day.with_updated_at(updated_at))
            .collect()
    }

    fn sections(&self) -> impl Iterator<Item = &DaySection> {
        self.today.iter().chain(self.tomorrow.iter())
    }
}

/// The decoded minute-slot payload: group name mapped to its days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlannedPayload(pub BTreeMap<String, GroupDays>);

impl PlannedPayload {
    /// Decodes a payload from a JSON document.
    pub fn from_json(raw: &str) -> AdapterResult<Self> {
        serde_json::from_str(raw).map_err(|err| {
            AdapterError::invalid_payload("payload is not a valid group map")
                .with_format(FORMAT_MINUTE_SLOT)
                .with_source(err)
        })
    }

    /// Decodes a payload from an already-parsed JSON value.
    pub fn from_value(value: Value) -> AdapterResult<Self> {
        serde_json::from_value(value).map_err(|err| {
            AdapterError::invalid_payload("payload is not a valid group map")
                .with_format(FORMAT_MINUTE_SLOT)
                .with_source(err)
        })
    }

    /// Lists the groups present in the payload.
    pub fn groups(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Returns one group's data.
    pub fn group(&self, name: &str) -> AdapterResult<&GroupDays> {
        self.0.get(name).ok_or_else(|| {
            AdapterError::unknown_group(format!("group {name} not present in payload"))
                .with_format(FORMAT_MINUTE_SLOT)
        })
    }
}
