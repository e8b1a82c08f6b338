//! Day schedules, generations, and the generation store.
//!
//! A [`DaySchedule`] holds one group's merged outage intervals for one
//! calendar date. A [`ScheduleGeneration`] is the complete result of one
//! refresh: the concrete day schedules, the weekly template (if the provider
//! publishes one), and the upstream updated-on instant. Generations are
//! rebuilt wholesale on every refresh and published atomically through
//! [`ScheduleStore`]; there is no incremental diffing and no historical
//! archive.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::OutageInterval;
use crate::template::WeeklyTemplate;

/// The upstream-reported status of one schedule day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// The published schedule applies.
    Applies,
    /// The provider has not committed a schedule for this day yet.
    Pending,
    /// Emergency shutdowns are in effect; slot data is not authoritative.
    Emergency,
}

impl DayStatus {
    /// Returns a stable identifier for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applies => "applies",
            Self::Pending => "pending",
            Self::Emergency => "emergency",
        }
    }
}

/// One group's outage schedule for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// The local calendar date this schedule covers.
    pub date: NaiveDate,
    /// Merged outage intervals, sorted ascending, non-overlapping.
    pub intervals: Vec<OutageInterval>,
    /// The upstream-reported status of the day.
    pub status: DayStatus,
    /// When the upstream last updated this schedule, if known.
    pub updated_at: Option<DateTime<Utc>>,
}

impl DaySchedule {
    /// Creates an empty day schedule.
    pub fn new(date: NaiveDate, status: DayStatus) -> Self {
        Self {
            date,
            intervals: Vec::new(),
            status,
            updated_at: None,
        }
    }

    /// Builder method to set the intervals.
    pub fn with_intervals(mut self, intervals: Vec<OutageInterval>) -> Self {
        self.intervals = intervals;
        self
    }

    /// Builder method to set the updated-at instant.
    pub fn with_updated_at(mut self, updated_at: Option<DateTime<Utc>>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Returns true if the day carries no outage intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// One complete generation of schedule data.
///
/// Immutable once published: queries and expansions read from it without
/// synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleGeneration {
    /// Concrete per-day schedules, sorted by date.
    pub days: Vec<DaySchedule>,
    /// The weekly recurrence template, if the provider publishes one.
    pub template: Option<WeeklyTemplate>,
    /// When the upstream last updated the schedule, if known.
    pub updated_on: Option<DateTime<Utc>>,
}

impl ScheduleGeneration {
    /// Creates an empty generation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the day schedules (kept sorted by date).
    pub fn with_days(mut self, mut days: Vec<DaySchedule>) -> Self {
        days.sort_by_key(|d| d.date);
        self.days = days;
        self
    }

    /// Builder method to set the weekly template.
    pub fn with_template(mut self, template: WeeklyTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Builder method to set the updated-on instant.
    pub fn with_updated_on(mut self, updated_on: Option<DateTime<Utc>>) -> Self {
        self.updated_on = updated_on;
        self
    }

    /// Returns the day schedule for a local calendar date, if present.
    pub fn day_for(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Returns true if any concrete planned data is present.
    pub fn has_planned_data(&self) -> bool {
        !self.days.is_empty()
    }

    /// Iterates all planned intervals across days, in date order.
    pub fn planned_intervals(&self) -> impl Iterator<Item = &OutageInterval> {
        self.days.iter().flat_map(|d| d.intervals.iter())
    }
}

/// Holder of the single current generation.
///
/// Readers always observe a complete generation: [`ScheduleStore::publish`]
/// swaps in a fully built replacement, and [`ScheduleStore::current`] hands
/// out a shared handle to whatever was current at call time. A failed
/// refresh simply never publishes, leaving the prior valid generation
/// untouched.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    current: RwLock<Arc<ScheduleGeneration>>,
}

impl ScheduleStore {
    /// Creates a store holding an empty generation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the current generation.
    pub fn current(&self) -> Arc<ScheduleGeneration> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Atomically replaces the current generation.
    pub fn publish(&self, generation: ScheduleGeneration) {
        let generation = Arc::new(generation);
        match self.current.write() {
            Ok(mut guard) => *guard = generation,
            Err(poisoned) => *poisoned.into_inner() = generation,
        }
    }
}
