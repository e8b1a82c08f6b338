//! Core types: intervals, time anchoring, merging, templates, queries

pub mod interval;
pub mod merge;
pub mod query;
pub mod schedule;
pub mod template;
pub mod time;
pub mod tracing;

pub use interval::{OutageInterval, OutageKind, OutageSource};
pub use merge::merge_intervals;
pub use query::{ElectricityStatus, QueryHorizons, StatusSummary};
pub use schedule::{DaySchedule, DayStatus, ScheduleGeneration, ScheduleStore};
pub use template::{MinuteSpan, WeeklyTemplate};
pub use time::{minute_to_instant, resolve_local, TimeWindow, DAY_END_MINUTE};
pub use crate::tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
