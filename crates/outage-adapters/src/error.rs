//! Error types for payload adapter operations.
//!
//! This module defines the error types that can occur when decoding upstream
//! outage schedule payloads. Errors cover undecodable payloads; malformed
//! individual records inside an otherwise valid payload are skipped with a
//! warning instead.

use std::fmt;
use thiserror::Error;

/// The category of an adapter error.
///
/// This enum provides a high-level classification of errors for callers that
/// decide whether to keep serving stale data or surface the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterErrorCode {
    /// The payload could not be decoded at all - not JSON, wrong shape.
    InvalidPayload,
    /// The embedded-object marker was not found in the document.
    MarkerNotFound,
    /// The requested group is not present in the payload.
    UnknownGroup,
    /// The configured timezone identifier is not a known IANA zone.
    InvalidTimezone,
}

impl AdapterErrorCode {
    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPayload => "invalid_payload",
            Self::MarkerNotFound => "marker_not_found",
            Self::UnknownGroup => "unknown_group",
            Self::InvalidTimezone => "invalid_timezone",
        }
    }
}

impl fmt::Display for AdapterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while decoding an upstream payload.
#[derive(Debug, Error)]
pub struct AdapterError {
    /// The error code categorizing this error.
    code: AdapterErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The wire format that generated this error (e.g., "minute_slot").
    format: Option<String>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AdapterError {
    /// Creates a new adapter error with the given code and message.
    pub fn new(code: AdapterErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            format: None,
            source: None,
        }
    }

    /// Creates an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::InvalidPayload, message)
    }

    /// Creates a marker-not-found error.
    pub fn marker_not_found(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::MarkerNotFound, message)
    }

    /// Creates an unknown group error.
    pub fn unknown_group(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::UnknownGroup, message)
    }

    /// Creates an invalid timezone error.
    pub fn invalid_timezone(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorCode::InvalidTimezone, message)
    }

    /// Sets the wire format name for this error.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> AdapterErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the wire format name, if set.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref format) = self.format {
            write!(f, "[{}] ", format)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
