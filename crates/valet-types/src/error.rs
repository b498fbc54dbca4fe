//! Error types for valet.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for valet operations.
pub type Result<T> = std::result::Result<T, ValetError>;

/// Opaque error produced by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while requesting and decoding Valet data.
#[derive(Error, Debug)]
pub enum ValetError {
    /// The request was rejected locally before anything was sent.
    #[error(transparent)]
    InvalidInput(#[from] QueryError),

    /// The transport failed (network error, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The API answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Message reported by the API.
        message: String,
        /// Documentation link reported by the API, if any.
        docs: Option<String>,
    },

    /// The payload did not have the expected shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ValetError {
    /// Wraps any transport error.
    pub fn transport(error: impl Into<BoxError>) -> Self {
        Self::Transport(error.into())
    }

    /// Returns true if the error was detected before any request was made.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Invalid observation query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No series or group name was given.
    #[error("At least one series or group name is required")]
    EmptyTarget,

    /// Only one of start date and end date was given.
    #[error("Both start date and end date must be provided")]
    ConflictingDateOption,

    /// A date did not parse as `YYYY-MM-DD`.
    #[error("Invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// Which option held the date (`start_date` or `end_date`).
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// End date precedes start date.
    #[error("Invalid date range: {start} > {end}")]
    InvertedRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// More than one recency option was given.
    #[error("Only one of recent, recent_weeks, recent_months and recent_years can be provided")]
    AmbiguousRecency,
}

/// Payload did not match the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A key of an observation object could not be decoded.
    #[error("Malformed observation for '{key}': {reason}")]
    MalformedObservation {
        /// The offending key (series name, `d` or `q`).
        key: String,
        /// Why decoding failed.
        reason: String,
    },

    /// The payload is not valid JSON or has the wrong structure.
    #[error("Invalid {context} payload: {message}")]
    Payload {
        /// Which endpoint was being decoded.
        context: &'static str,
        /// Parser message.
        message: String,
    },

    /// A required top-level object is missing.
    #[error("Invalid {context} payload: missing '{field}'")]
    MissingField {
        /// Which endpoint was being decoded.
        context: &'static str,
        /// The missing JSON key.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_converts_to_invalid_input() {
        let err: ValetError = QueryError::AmbiguousRecency.into();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("recent_weeks"));
    }

    #[test]
    fn test_remote_error_surfaces_message() {
        let err = ValetError::Remote {
            status: 404,
            message: "Series FOO not found.".to_string(),
            docs: None,
        };
        assert_eq!(err.to_string(), "API error (status 404): Series FOO not found.");
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = ValetError::transport(io);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "timed out");
    }
}
