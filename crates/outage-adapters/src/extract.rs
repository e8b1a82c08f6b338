//! Embedded-object extraction for the hour-token format.
//!
//! The hour-token payload is not served as a JSON document: it is assigned
//! to a script variable inside an HTML page. This module locates the
//! assignment marker and returns the embedded JSON object text for decoding.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AdapterError, AdapterResult};
use crate::hour_token::{FactPayload, FORMAT_HOUR_TOKEN};

static FACT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)DisconSchedule\.fact\s*=\s*(\{.*?\})</script>")
        .expect("valid fact marker pattern")
});

/// Extracts the embedded schedule object text from an HTML document.
///
/// The pattern is dot-matches-newline: the object may span lines. A missing
/// marker usually means the request was served a bot-filter page or the
/// service is down.
pub fn extract_fact_object(html: &str) -> AdapterResult<&str> {
    FACT_MARKER
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|object| object.as_str())
        .ok_or_else(|| {
            AdapterError::marker_not_found("schedule object marker not found in document")
                .with_format(FORMAT_HOUR_TOKEN)
        })
}

/// Extracts and decodes the embedded schedule payload in one step.
pub fn parse_fact_payload(html: &str) -> AdapterResult<FactPayload> {
    FactPayload::from_json(extract_fact_object(html)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = concat!(
        "<html><body><script>\n",
        "DisconSchedule.preset = {};\n",
        "DisconSchedule.fact = {\"data\": {\"1761516000\": {\"GPV1.1\":\n",
        "{\"1\": \"no\", \"2\": \"yes\"}}}, \"update\": \"27.10.2025 06:00\"}</script>\n",
        "</body></html>"
    );

    #[test]
    fn extracts_the_embedded_object() {
        let object = extract_fact_object(PAGE).unwrap();
        assert!(object.starts_with('{'));
        assert!(object.ends_with('}'));
        assert!(object.contains("GPV1.1"));
    }

    #[test]
    fn object_spans_multiple_lines() {
        // The slot map itself contains a newline; the pattern must cross it.
        assert!(extract_fact_object(PAGE).unwrap().contains('\n'));
    }

    #[test]
    fn missing_marker_is_an_error() {
        let err = extract_fact_object("<html>please verify you are human</html>").unwrap_err();
        assert_eq!(err.code(), crate::error::AdapterErrorCode::MarkerNotFound);
        assert_eq!(err.format(), Some(FORMAT_HOUR_TOKEN));
    }

    #[test]
    fn extract_and_decode() {
        let fact = parse_fact_payload(PAGE).unwrap();
        assert_eq!(fact.groups(), vec!["1.1"]);
        assert_eq!(fact.update.as_deref(), Some("27.10.2025 06:00"));
    }

    #[test]
    fn marker_with_invalid_json_is_a_payload_error() {
        let page = "<script>DisconSchedule.fact = {broken}</script>";
        let err = parse_fact_payload(page).unwrap_err();
        assert_eq!(err.code(), crate::error::AdapterErrorCode::InvalidPayload);
    }
}
