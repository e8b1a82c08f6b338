//! The closed set of per-day format adapters.
//!
//! Each wire format that yields concrete per-day intervals appears here as
//! one variant behind a single parse capability. Merge and query code never
//! branches on the format; adding a provider means adding a variant.

use crate::hour_token::{decode_hour_tokens, HourMap};
use crate::minute_slot::DaySection;
use crate::raw::RawInterval;

/// One day's worth of undecoded schedule data, tagged by wire format.
#[derive(Debug, Clone, Copy)]
pub enum DayPayload<'a> {
    /// A minute-slot day section (format A).
    MinuteSlot(&'a DaySection),
    /// An hour-token map (format B).
    HourToken(&'a HourMap),
}

impl DayPayload<'_> {
    /// Decodes the day's raw intervals.
    ///
    /// Malformed units inside the payload are skipped with a warning; the
    /// result is whatever decoded cleanly.
    pub fn parse(&self) -> Vec<RawInterval> {
        match self {
            Self::MinuteSlot(section) => section.raw_intervals(),
            Self::HourToken(hours) => decode_hour_tokens(hours),
        }
    }

    /// Returns the wire format tag for logging and error reporting.
    pub fn format(&self) -> &'static str {
        match self {
            Self::MinuteSlot(_) => crate::minute_slot::FORMAT_MINUTE_SLOT,
            Self::HourToken(_) => crate::hour_token::FORMAT_HOUR_TOKEN,
        }
    }
}
