//! Interval fusion.
//!
//! Fuses exactly-adjacent intervals that share a source and kind into
//! maximal, non-overlapping ranges. The input is one source's intervals for
//! one day or occurrence set; cross-source fusion never happens because
//! planned and probable intervals are kept in separate result sets by
//! construction.

use crate::interval::OutageInterval;

/// Fuses exactly-adjacent same-source, same-kind intervals.
///
/// The input is sorted ascending by `(start, end)` first, then scanned with a
/// single accumulator: when the next interval starts exactly where the
/// accumulator ends and both carry the same source and kind, the accumulator
/// is extended; otherwise it is flushed and restarted.
///
/// Idempotent: `merge_intervals(merge_intervals(l)) == merge_intervals(l)`.
pub fn merge_intervals(mut intervals: Vec<OutageInterval>) -> Vec<OutageInterval> {
    if intervals.len() < 2 {
        return intervals;
    }

    intervals.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged = Vec::with_capacity(intervals.len());
    let mut iter = intervals.into_iter();
    let mut acc = iter.next().expect("non-empty interval list");

    for next in iter {
        if next.start == acc.end && next.source == acc.source && next.kind == acc.kind {
            acc.end = next.end;
        } else {
            merged.push(acc);
            acc = next;
        }
    }
    merged.push(acc);

    merged
}
