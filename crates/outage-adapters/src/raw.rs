//! Raw interval and token types from upstream payloads.
//!
//! This module defines [`RawInterval`], a format-agnostic representation of
//! one decoded outage slot before normalization, and [`HourToken`], the
//! per-hour status vocabulary of the hour-token format. Raw intervals carry
//! minute-of-day offsets; they become canonical UTC intervals only after the
//! normalizer anchors them to a calendar date and timezone.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use outage_core::interval::OutageKind;
use outage_core::time::DAY_END_MINUTE;

/// One decoded outage slot: minute offsets within a single day.
///
/// Transient - produced by an adapter, consumed by the normalizer, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInterval {
    /// Start offset in minutes from local midnight (inclusive).
    pub start_minute: u32,
    /// End offset in minutes from local midnight (exclusive), up to 1440.
    pub end_minute: u32,
    /// The decoded slot kind.
    pub kind: OutageKind,
}

impl RawInterval {
    /// Creates a new raw interval.
    pub fn new(start_minute: u32, end_minute: u32, kind: OutageKind) -> Self {
        Self {
            start_minute,
            end_minute,
            kind,
        }
    }

    /// Returns true if the offsets form a well-ordered span within one day.
    pub fn is_valid(&self) -> bool {
        self.start_minute < self.end_minute && self.end_minute <= DAY_END_MINUTE
    }
}

/// The per-hour status vocabulary of the hour-token format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourToken {
    /// Power is on for the whole hour.
    Yes,
    /// Power is off for the whole hour.
    No,
    /// Power is off for the first half of the hour only.
    First,
    /// Power is off for the second half of the hour only.
    Second,
}

impl HourToken {
    /// Parses an upstream token string.
    ///
    /// Unrecognized strings decode to [`HourToken::Yes`] (the no-outage
    /// interpretation) with a data-quality warning.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "yes" => Self::Yes,
            "no" => Self::No,
            "first" => Self::First,
            "second" => Self::Second,
            other => {
                warn!(token = other, "unrecognized hour token, assuming power on");
                Self::Yes
            }
        }
    }
}

/// The wire shape of one minute-offset slot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Start offset in minutes from local midnight.
    pub start: u32,
    /// End offset in minutes from local midnight.
    pub end: u32,
    /// The slot type string ("Definite", "NotPlanned").
    #[serde(rename = "type")]
    pub slot_type: String,
}

impl SlotRecord {
    /// Maps the slot type string to a kind.
    ///
    /// Unknown type strings map to [`OutageKind::NotPlanned`] (the no-outage
    /// interpretation) with a warning.
    pub fn kind(&self) -> OutageKind {
        match self.slot_type.as_str() {
            "Definite" => OutageKind::Definite,
            "NotPlanned" => OutageKind::NotPlanned,
            other => {
                warn!(slot_type = other, "unrecognized slot type, assuming no outage");
                OutageKind::NotPlanned
            }
        }
    }
}

/// Decodes one slot value leniently.
///
/// Returns `None` (after a warning) when the record is malformed or its
/// offsets do not form a valid span; one bad slot never fails the payload.
pub fn decode_slot(value: &Value) -> Option<RawInterval> {
    let record: SlotRecord = match serde_json::from_value(value.clone()) {
        Ok(record) => record,
        Err(err) => {
            warn!(error = %err, "skipping malformed slot record");
            return None;
        }
    };
    let interval = RawInterval::new(record.start, record.end, record.kind());
    if !interval.is_valid() {
        warn!(
            start = record.start,
            end = record.end,
            "skipping slot with invalid minute offsets"
        );
        return None;
    }
    Some(interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod raw_interval {
        use super::*;

        #[test]
        fn validity_bounds() {
            assert!(RawInterval::new(0, 1440, OutageKind::Definite).is_valid());
            assert!(RawInterval::new(480, 540, OutageKind::Definite).is_valid());
            assert!(!RawInterval::new(540, 480, OutageKind::Definite).is_valid());
            assert!(!RawInterval::new(480, 480, OutageKind::Definite).is_valid());
            assert!(!RawInterval::new(0, 1441, OutageKind::Definite).is_valid());
        }
    }

    mod hour_token {
        use super::*;

        #[test]
        fn known_tokens() {
            assert_eq!(HourToken::parse("yes"), HourToken::Yes);
            assert_eq!(HourToken::parse("no"), HourToken::No);
            assert_eq!(HourToken::parse("first"), HourToken::First);
            assert_eq!(HourToken::parse("second"), HourToken::Second);
        }

        #[test]
        fn unknown_token_means_power_on() {
            assert_eq!(HourToken::parse("maybe"), HourToken::Yes);
            assert_eq!(HourToken::parse(""), HourToken::Yes);
        }
    }

    mod slots {
        use super::*;

        #[test]
        fn decodes_well_formed_slot() {
            let slot = decode_slot(&json!({"start": 480, "end": 540, "type": "Definite"}));
            assert_eq!(
                slot,
                Some(RawInterval::new(480, 540, OutageKind::Definite))
            );
        }

        #[test]
        fn unknown_type_is_not_planned() {
            let slot = decode_slot(&json!({"start": 0, "end": 60, "type": "Mystery"})).unwrap();
            assert_eq!(slot.kind, OutageKind::NotPlanned);
        }

        #[test]
        fn malformed_slot_is_skipped() {
            assert!(decode_slot(&json!({"start": "eight", "end": 540, "type": "Definite"}))
                .is_none());
            assert!(decode_slot(&json!({"end": 540, "type": "Definite"})).is_none());
            assert!(decode_slot(&json!("not an object")).is_none());
        }

        #[test]
        fn inverted_offsets_are_skipped() {
            assert!(decode_slot(&json!({"start": 540, "end": 480, "type": "Definite"})).is_none());
            assert!(decode_slot(&json!({"start": 0, "end": 2000, "type": "Definite"})).is_none());
        }
    }
}
