//! Wire-format adapters for upstream outage schedule payloads.
//!
//! This crate decodes the three upstream wire formats into the canonical
//! model of `outage-core`:
//!
//! - [`PlannedPayload`] - minute-slot per-group schedules (format A)
//! - [`FactPayload`] - hour-token per-day schedules embedded in HTML
//!   (format B, see [`extract_fact_object`])
//! - [`ProbablePayload`] - weekly recurrence templates (format C)
//! - [`AdapterError`] - error types for adapter operations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ minute-slot  │   │  hour-token  │   │    weekly    │
//! │   payload    │   │   payload    │   │   payload    │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        │                  │                  │
//!        ▼                  ▼                  │
//! ┌─────────────────────────────────┐         │
//! │          RawInterval            │         │
//! └──────────────┬──────────────────┘         │
//!                │ normalize_intervals()       │
//!                ▼                            ▼
//!     ┌─────────────────┐          ┌─────────────────┐
//!     │   DaySchedule   │          │ WeeklyTemplate  │
//!     └─────────────────┘          └─────────────────┘
//! ```
//!
//! Decoding is fail-soft at the unit level: one malformed slot, token, or
//! day never fails an otherwise valid payload; such units are skipped with
//! a `tracing` warning. Only an undecodable payload is an error.

pub mod adapter;
pub mod error;
pub mod extract;
pub mod hour_token;
pub mod minute_slot;
pub mod normalize;
pub mod raw;
pub mod timezone;
pub mod weekly;

// Re-export main types at crate root
pub use adapter::DayPayload;
pub use error::{AdapterError, AdapterErrorCode, AdapterResult};
pub use extract::{extract_fact_object, parse_fact_payload};
pub use hour_token::{decode_hour_tokens, FactPayload, HourMap, GROUP_PREFIX};
pub use minute_slot::{DaySection, GroupDays, PlannedPayload};
pub use normalize::normalize_intervals;
pub use raw::{decode_slot, HourToken, RawInterval, SlotRecord};
pub use timezone::resolve_timezone;
pub use weekly::{ProbableDso, ProbableGroup, ProbablePayload, ProbableRegion};
