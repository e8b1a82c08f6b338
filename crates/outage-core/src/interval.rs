//! Canonical outage interval types.
//!
//! This module provides [`OutageInterval`], the canonical unit of outage data
//! after normalization, together with its [`OutageSource`] and [`OutageKind`]
//! tags. Every interval is a half-open range `[start, end)` of UTC instants.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Where an outage interval came from.
///
/// Concretely-scheduled intervals and recurring-template projections are never
/// merged with each other; consumers can suppress one in favor of the other
/// using this tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OutageSource {
    /// A concrete per-day schedule published by the provider.
    Planned,
    /// A projection of the provider's stable weekly template.
    Probable,
}

/// The kind of slot an interval was decoded from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OutageKind {
    /// A confirmed outage.
    Definite,
    /// No outage planned. Dropped during normalization; never present in
    /// engine output.
    NotPlanned,
}

impl OutageKind {
    /// Returns true if intervals of this kind represent an actual outage.
    pub fn is_outage(&self) -> bool {
        matches!(self, Self::Definite)
    }
}

/// A canonical outage interval: `[start, end)` in UTC, tagged with its source
/// and kind.
///
/// Invariant: `start < end`. An interval anchored to a single calendar date
/// never crosses into the following date; a day-end boundary is represented
/// as 23:59:59.999999 local time, not the next midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageInterval {
    /// Start of the outage (inclusive).
    pub start: DateTime<Utc>,
    /// End of the outage (exclusive).
    pub end: DateTime<Utc>,
    /// Where this interval came from.
    pub source: OutageSource,
    /// The kind of slot it was decoded from.
    pub kind: OutageKind,
}

impl OutageInterval {
    /// Creates a new interval.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `start >= end`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        source: OutageSource,
        kind: OutageKind,
    ) -> Self {
        debug_assert!(start < end, "interval start must precede end");
        Self {
            start,
            end,
            source,
            kind,
        }
    }

    /// Creates a definite interval from a concrete per-day schedule.
    pub fn planned(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(start, end, OutageSource::Planned, OutageKind::Definite)
    }

    /// Creates a definite interval projected from a weekly template.
    pub fn probable(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(start, end, OutageSource::Probable, OutageKind::Definite)
    }

    /// Checks whether the interval covers the given instant.
    ///
    /// Uses half-open semantics: inclusive at `start`, exclusive at `end`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// Returns true if this interval overlaps the half-open range
    /// `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Returns the duration of the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
