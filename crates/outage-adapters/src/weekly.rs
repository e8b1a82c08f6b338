//! Weekly-template format adapter.
//!
//! Decodes the probable-outage payload, nested region → provider (dso) →
//! group, where each group carries a weekday slot map `{"0".."6": [slots]}`
//! (0 = Monday). Only `Definite` slots enter the template; malformed slots
//! and out-of-range weekday keys are skipped with a warning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use outage_core::template::{MinuteSpan, WeeklyTemplate};

use crate::error::{AdapterError, AdapterResult};
use crate::raw::decode_slot;

/// The wire format tag used in error reporting.
pub const FORMAT_WEEKLY: &str = "weekly_template";

/// One group's weekly slots, keyed by weekday `"0".."6"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbableGroup {
    /// Weekday key mapped to raw slot records; decoded leniently.
    #[serde(default)]
    pub slots: BTreeMap<String, Vec<Value>>,
}

impl ProbableGroup {
    /// Builds a [`WeeklyTemplate`] from the group's slot map.
    ///
    /// `NotPlanned` and malformed slots are dropped; a weekday key outside
    /// `"0".."6"` drops its whole bucket with a warning.
    pub fn template(&self) -> WeeklyTemplate {
        let mut template = WeeklyTemplate::new();
        for (weekday_key, slots) in &self.slots {
            let weekday: u8 = match weekday_key.parse() {
                Ok(weekday) if weekday < 7 => weekday,
                _ => {
                    warn!(weekday = %weekday_key, "skipping out-of-range weekday bucket");
                    continue;
                }
            };
            for slot in slots.iter().filter_map(decode_slot) {
                if slot.kind.is_outage() {
                    template.add(weekday, MinuteSpan::new(slot.start_minute, slot.end_minute));
                }
            }
        }
        template
    }
}

/// One provider's (dso's) groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbableDso {
    /// The provider's display name, when published.
    pub name: Option<String>,
    /// Group name mapped to its weekly slots.
    #[serde(default)]
    pub groups: BTreeMap<String, ProbableGroup>,
}

impl ProbableDso {
    /// Lists the provider's groups.
    pub fn groups(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Returns one group's data.
    pub fn group(&self, name: &str) -> AdapterResult<&ProbableGroup> {
        self.groups.get(name).ok_or_else(|| {
            AdapterError::unknown_group(format!("group {name} not present in payload"))
                .with_format(FORMAT_WEEKLY)
        })
    }
}

/// One region's providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbableRegion {
    /// The region's display name, when published.
    pub name: Option<String>,
    /// Provider id mapped to its data.
    #[serde(default)]
    pub dsos: BTreeMap<String, ProbableDso>,
}

impl ProbableRegion {
    /// Lists the region's provider ids.
    pub fn providers(&self) -> Vec<&str> {
        self.dsos.keys().map(String::as_str).collect()
    }

    /// Returns one provider's data.
    pub fn provider(&self, id: &str) -> AdapterResult<&ProbableDso> {
        self.dsos.get(id).ok_or_else(|| {
            AdapterError::unknown_group(format!("provider {id} not present in payload"))
                .with_format(FORMAT_WEEKLY)
        })
    }
}

/// The decoded weekly-template payload: region id mapped to its providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbablePayload(pub BTreeMap<String, ProbableRegion>);

impl ProbablePayload {
    /// Decodes a payload from a JSON document.
    pub fn from_json(raw: &str) -> AdapterResult<Self> {
        serde_json::from_str(raw).map_err(|err| {
            AdapterError::invalid_payload("payload is not a valid region map")
                .with_format(FORMAT_WEEKLY)
                .with_source(err)
        })
    }

    /// Decodes a payload from an already-parsed JSON value.
    pub fn from_value(value: Value) -> AdapterResult<Self> {
        serde_json::from_value(value).map_err(|err| {
            AdapterError::invalid_payload("payload is not a valid region map")
                .with_format(FORMAT_WEEKLY)
                .with_source(err)
        })
    }

    /// Lists the region ids present in the payload.
    pub fn regions(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Returns one region's data.
    pub fn region(&self, id: &str) -> AdapterResult<&ProbableRegion> {
        self.0.get(id).ok_or_else(|| {
            AdapterError::unknown_group(format!("region {id} not present in payload"))
                .with_format(FORMAT_WEEKLY)
        })
    }

    /// Builds the weekly template for a configured (region, provider, group).
    pub fn template(&self, region: &str, provider: &str, group: &str) -> AdapterResult<WeeklyTemplate> {
        Ok(self
            .region(region)?
            .provider(provider)?
            .group(group)?
            .template())
    }
}
