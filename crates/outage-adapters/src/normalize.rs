//! Raw interval normalization.
//!
//! Converts the minute-offset [`RawInterval`]s an adapter produced into
//! canonical [`OutageInterval`]s: drops `NotPlanned` slots, anchors offsets
//! to the day's calendar date in the provider timezone, and fuses adjacent
//! spans so the result satisfies the day-schedule invariants.

use chrono::{NaiveDate, TimeZone};

use outage_core::interval::{OutageInterval, OutageKind, OutageSource};
use outage_core::merge::merge_intervals;
use outage_core::time::minute_to_instant;

use crate::raw::RawInterval;

/// Normalizes one day's raw intervals into canonical intervals.
///
/// `NotPlanned` intervals are dropped; the rest are anchored to `date` in the
/// provider timezone, tagged with `source`, merged, and returned sorted
/// ascending. Offset 1440 maps to the day's 23:59:59.999999 boundary, so no
/// interval crosses into the following date.
pub fn normalize_intervals<Tz: TimeZone>(
    raw: &[RawInterval],
    date: NaiveDate,
    tz: &Tz,
    source: OutageSource,
) -> Vec<OutageInterval> {
    let anchored = raw
        .iter()
        .filter(|iv| iv.kind.is_outage())
        .map(|iv| {
            OutageInterval::new(
                minute_to_instant(date, iv.start_minute, tz),
                minute_to_instant(date, iv.end_minute, tz),
                source,
                OutageKind::Definite,
            )
        })
        .collect();
    merge_intervals(anchored)
}
