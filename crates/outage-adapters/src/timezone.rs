//! Provider timezone resolution.
//!
//! Anchoring APIs are generic over [`chrono::TimeZone`], but callers
//! configure the provider timezone as an IANA identifier string. This module
//! resolves that string to a concrete zone once, up front, so a bad
//! configuration surfaces as an error instead of misanchored intervals.

use chrono_tz::Tz;

use crate::error::{AdapterError, AdapterResult};

/// Resolves a configured IANA timezone identifier.
pub fn resolve_timezone(name: &str) -> AdapterResult<Tz> {
    name.parse().map_err(|_| {
        AdapterError::invalid_timezone(format!("{name} is not a known IANA timezone"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use outage_core::time::minute_to_instant;

    #[test]
    fn resolves_known_zones() {
        assert_eq!(resolve_timezone("Europe/Kyiv").unwrap(), Tz::Europe__Kyiv);
        assert_eq!(resolve_timezone("UTC").unwrap(), Tz::UTC);
    }

    #[test]
    fn unknown_zone_is_an_error() {
        let err = resolve_timezone("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(err.code(), crate::error::AdapterErrorCode::InvalidTimezone);
        assert!(err.message().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn resolved_zone_anchors_intervals() {
        let tz = resolve_timezone("Europe/Kyiv").unwrap();
        // Kyiv is UTC+2 in winter.
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            minute_to_instant(date, 600, &tz),
            Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap()
        );
    }
}
