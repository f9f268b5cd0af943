//! Error types for the fraud query gateway
//!
//! Every failure the gateway can observe is a [`GatewayError`]. Only
//! [`GatewayError::Validation`] is surfaced to callers as a distinct outcome;
//! the rest are folded into the canonical error response by [`crate::mapper`].

use thiserror::Error;

/// Timeframe normalization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Expression is not exactly `<number> <timeunit>`
    #[error("Invalid format, expected: '<number> <timeunit>'")]
    InvalidFormat,

    /// Count token is not a base-10 integer
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Unit token is not in the unit table
    #[error("Unknown time unit: {0}")]
    UnknownUnit(String),

    /// Count token is below zero
    #[error("Negative timeframe: {0}")]
    Negative(i64),

    /// Count times unit does not fit in an i64 of milliseconds
    #[error("Timeframe too large: {count} {unit}")]
    Overflow { count: i64, unit: String },
}

/// Gateway error types
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or blank input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Timeframe could not be normalized
    #[error(transparent)]
    Format(#[from] DurationError),

    /// Bounded wait expired without a reply
    #[error("The key '{key}' was not found.")]
    NoReply { key: String },

    /// Reply header names a different request
    #[error("Correlation mismatch: expected {expected}, got {actual}")]
    CorrelationMismatch { expected: String, actual: String },

    /// Outbound payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Reply payload could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Any other failure raised by the bus client
    #[error("Transport error: {0}")]
    Transport(String),

    /// Connection error to NATS server
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

impl From<async_nats::ConnectError> for GatewayError {
    fn from(err: async_nats::ConnectError) -> Self {
        GatewayError::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reply_message_embeds_key() {
        let err = GatewayError::NoReply {
            key: "4111-1111".to_string(),
        };
        assert_eq!(err.to_string(), "The key '4111-1111' was not found.");
    }

    #[test]
    fn test_format_error_is_transparent() {
        let err: GatewayError = DurationError::UnknownUnit("fortnights".to_string()).into();
        assert!(matches!(err, GatewayError::Format(_)));
        assert_eq!(err.to_string(), "Unknown time unit: fortnights");
    }

    #[test]
    fn test_error_display() {
        let err = GatewayError::Connection("failed to connect".to_string());
        assert_eq!(err.to_string(), "Connection error: failed to connect");
    }
}
