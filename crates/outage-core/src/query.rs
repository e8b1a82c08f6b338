//! Temporal queries over a schedule generation.
//!
//! All queries are pure functions of `(generation, now)`: callers supply the
//! evaluation instant and horizons explicitly, which keeps results
//! reproducible in tests and independent of wall-clock reads. Status,
//! next-outage, and connectivity queries consider only planned intervals;
//! probable template occurrences feed the supplementary occurrence list and
//! [`ScheduleGeneration::next_probable`] alone.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::OutageInterval;
use crate::schedule::{DayStatus, ScheduleGeneration};
use crate::time::TimeWindow;

/// Electricity availability at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectricityStatus {
    /// A planned outage covers the instant.
    Outage,
    /// Planned data is present and no outage covers the instant.
    Normal,
    /// No planned data is available to answer the question.
    Unknown,
}

impl ElectricityStatus {
    /// Returns a stable identifier for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outage => "outage",
            Self::Normal => "normal",
            Self::Unknown => "unknown",
        }
    }
}

impl ScheduleGeneration {
    /// Returns the electricity status at `now`.
    ///
    /// [`ElectricityStatus::Unknown`] means no planned data is present at
    /// all, not that the instant falls outside every interval.
    pub fn current_status(&self, now: DateTime<Utc>) -> ElectricityStatus {
        if !self.has_planned_data() {
            return ElectricityStatus::Unknown;
        }
        if self.current_event(now).is_some() {
            ElectricityStatus::Outage
        } else {
            ElectricityStatus::Normal
        }
    }

    /// Returns the planned interval covering `now`, if any.
    ///
    /// Coverage is inclusive at the start and exclusive at the end; at the
    /// very instant an outage ends, it is no longer current. When intervals
    /// share a start, the one ending earlier wins.
    pub fn current_event(&self, now: DateTime<Utc>) -> Option<&OutageInterval> {
        self.planned_intervals()
            .filter(|iv| iv.contains(now))
            .min_by_key(|iv| (iv.start, iv.end))
    }

    /// Returns the next planned outage strictly after `now`, within the
    /// horizon.
    pub fn next_outage(&self, now: DateTime<Utc>, horizon: Duration) -> Option<&OutageInterval> {
        let window = TimeWindow::from_now(now, horizon);
        self.planned_intervals()
            .filter(|iv| iv.start > now && iv.start < window.end)
            .min_by_key(|iv| (iv.start, iv.end))
    }

    /// Returns the next probable outage occurrence strictly after `now`,
    /// within the horizon.
    ///
    /// Probable occurrences come from expanding the weekly template; absent a
    /// template, the answer is always `None`.
    pub fn next_probable<Tz: TimeZone>(
        &self,
        now: DateTime<Utc>,
        horizon: Duration,
        tz: &Tz,
    ) -> Option<OutageInterval> {
        let template = self.template.as_ref()?;
        let window = TimeWindow::from_now(now, horizon);
        template
            .expand(&window, tz)
            .into_iter()
            .filter(|iv| iv.start > now)
            .min_by_key(|iv| (iv.start, iv.end))
    }

    /// Returns the next instant at which power is (or returns to being)
    /// available.
    ///
    /// During a planned outage this is the current event's end; otherwise it
    /// is the end of the next planned outage within the horizon. Returns
    /// `None` when neither exists, never an error.
    pub fn next_connectivity(&self, now: DateTime<Utc>, horizon: Duration) -> Option<DateTime<Utc>> {
        if let Some(current) = self.current_event(now) {
            return Some(current.end);
        }
        self.next_outage(now, horizon).map(|iv| iv.end)
    }

    /// Returns all outage occurrences overlapping the window, planned and
    /// probable, sorted ascending by `(start, end, source)`.
    ///
    /// Planned intervals and expanded template occurrences are listed side by
    /// side; suppressing probable occurrences on dates with concrete data is
    /// left to the consumer, distinguishable via each occurrence's `source`.
    pub fn occurrences_between<Tz: TimeZone>(
        &self,
        window: &TimeWindow,
        tz: &Tz,
    ) -> Vec<OutageInterval> {
        let mut occurrences: Vec<OutageInterval> = self
            .planned_intervals()
            .filter(|iv| iv.overlaps(window.start, window.end))
            .copied()
            .collect();
        if let Some(template) = &self.template {
            occurrences.extend(template.expand(window, tz));
        }
        occurrences.sort_by_key(|iv| (iv.start, iv.end, iv.source));
        occurrences
    }
}

/// Horizons used when computing a [`StatusSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryHorizons {
    /// Lookahead for planned outages and connectivity.
    pub planned: Duration,
    /// Lookahead for probable template occurrences.
    pub probable: Duration,
}

impl Default for QueryHorizons {
    fn default() -> Self {
        Self {
            planned: Duration::hours(48),
            probable: Duration::days(8),
        }
    }
}

/// Scalar snapshot of a generation at one instant, for rendering
/// collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Electricity status at the evaluation instant.
    pub status: ElectricityStatus,
    /// The planned outage covering the instant, if any.
    pub current_event: Option<OutageInterval>,
    /// The next planned outage within the planned horizon.
    pub next_outage: Option<OutageInterval>,
    /// The next probable occurrence within the probable horizon.
    pub next_probable: Option<OutageInterval>,
    /// When power is next (or again) available.
    pub next_connectivity: Option<DateTime<Utc>>,
    /// Upstream status of the evaluation instant's local date.
    pub today_status: Option<DayStatus>,
    /// Upstream status of the following local date.
    pub tomorrow_status: Option<DayStatus>,
    /// When the upstream last updated the schedule.
    pub updated_on: Option<DateTime<Utc>>,
}

impl StatusSummary {
    /// Computes a summary of `generation` at `now`.
    pub fn compute<Tz: TimeZone>(
        generation: &ScheduleGeneration,
        now: DateTime<Utc>,
        horizons: QueryHorizons,
        tz: &Tz,
    ) -> Self {
        let today = now.with_timezone(tz).date_naive();
        let tomorrow = today.succ_opt();
        Self {
            status: generation.current_status(now),
            current_event: generation.current_event(now).copied(),
            next_outage: generation.next_outage(now, horizons.planned).copied(),
            next_probable: generation.next_probable(now, horizons.probable, tz),
            next_connectivity: generation.next_connectivity(now, horizons.planned),
            today_status: generation.day_for(today).map(|d| d.status),
            tomorrow_status: tomorrow
                .and_then(|date| generation.day_for(date))
                .map(|d| d.status),
            updated_on: generation.updated_on,
        }
    }
}
