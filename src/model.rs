//! Fraud query request and response structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key used in place of the request key on every synthesized error response
pub const ERROR_KEY: &str = "ERROR";

/// Prefix of the single record name carried by an error response
pub const ERROR_RECORD_PREFIX: &str = "error: ";

/// Outbound lookup published on the query topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Subject of the fraud-indicator lookup (card number, account, ...)
    pub key: String,

    /// Lookback window in milliseconds
    pub timeframe: i64,

    /// Routing discriminator for the responder
    pub subject: String,
}

/// Aggregated occurrences of one fraud indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub count: u64,
    pub amount: f64,
}

/// Reply to a [`QueryRequest`], or the canonical error shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub key: String,

    pub timeframe: i64,

    /// Set by the responder; absent on locally synthesized errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    #[serde(default)]
    pub records: HashMap<String, Indicator>,
}

impl QueryResponse {
    /// Build an error response carrying one zero-valued record named after `message`
    pub fn error(message: &str) -> Self {
        let mut records = HashMap::with_capacity(1);
        records.insert(format!("{ERROR_RECORD_PREFIX}{message}"), Indicator::default());

        Self {
            key: ERROR_KEY.to_string(),
            timeframe: 0,
            correlation_id: None,
            records,
        }
    }

    /// Whether this response has the error shape
    pub fn is_error(&self) -> bool {
        self.key == ERROR_KEY
            && self.records.len() == 1
            && self
                .records
                .keys()
                .all(|name| name.starts_with(ERROR_RECORD_PREFIX))
    }
}
