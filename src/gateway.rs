//! Fraud query gateway
//!
//! Bridges a synchronous lookup onto NATS request/reply. Each call builds a
//! fresh [`RequestEnvelope`], publishes it once, waits for at most one reply
//! within the configured timeout and returns a [`QueryOutcome`]. Failures never
//! escape: apart from input validation they all become the canonical error
//! response via [`map_error`].
//!
//! # Test Reference
//! - Test: `tests/gateway_tests.rs`

use crate::codec::{Codec, JsonCodec};
use crate::envelope::{now_millis, RequestEnvelope, CORRELATION_ID_HEADER};
use crate::error::{GatewayError, Result};
use crate::mapper::map_error;
use crate::model::QueryResponse;
use crate::query_bus::{Reply, RequestReply};
use bytes::Bytes;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Result of one gateway query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Responder answered; the response is passed through untouched
    Found(QueryResponse),

    /// Key or subject missing; the bus was not contacted
    Rejected(String),

    /// Any other failure, as the canonical error response
    Failed(QueryResponse),
}

impl QueryOutcome {
    /// HTTP status code for this outcome
    pub fn status(&self) -> u16 {
        match self {
            Self::Found(_) => 200,
            Self::Rejected(_) => 400,
            Self::Failed(_) => 502,
        }
    }

    /// Response body, if the outcome carries one
    pub fn response(&self) -> Option<&QueryResponse> {
        match self {
            Self::Found(response) | Self::Failed(response) => Some(response),
            Self::Rejected(_) => None,
        }
    }
}

/// Gateway over a request/reply bus
pub struct FraudQueryGateway<B, C = JsonCodec> {
    bus: B,
    codec: C,
    topic: String,
    timeout: Duration,
}

impl<B: RequestReply> FraudQueryGateway<B, JsonCodec> {
    /// Create a gateway publishing JSON on `topic`
    pub fn new(bus: B, topic: impl Into<String>, timeout: Duration) -> Self {
        Self::with_codec(bus, JsonCodec, topic, timeout)
    }
}

impl<B: RequestReply, C: Codec> FraudQueryGateway<B, C> {
    /// Create a gateway with a custom payload codec
    pub fn with_codec(bus: B, codec: C, topic: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bus,
            codec,
            topic: topic.into(),
            timeout,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look up fraud indicators for `key` over `timeframe` (e.g. `"5 minutes"`)
    pub async fn query(
        &self,
        key: Option<&str>,
        timeframe: Option<&str>,
        subject: Option<&str>,
    ) -> QueryOutcome {
        let (Some(key), Some(subject)) = (non_blank(key), non_blank(subject)) else {
            tracing::debug!("Rejecting query with missing key or subject");
            return QueryOutcome::Rejected(
                GatewayError::Validation("key and subject are required".to_string()).to_string(),
            );
        };

        let correlation_id = Uuid::new_v4();
        match self.exchange(correlation_id, key, timeframe, subject).await {
            Ok(response) => {
                tracing::info!(
                    correlation_id = ?response.correlation_id,
                    records = response.records.len(),
                    "Response received"
                );
                QueryOutcome::Found(response)
            }
            Err(err) => {
                tracing::error!(
                    correlation_id = %correlation_id,
                    key = %key,
                    error = %err,
                    "Error occurred while processing NATS request"
                );
                QueryOutcome::Failed(map_error(&err))
            }
        }
    }

    async fn exchange(
        &self,
        correlation_id: Uuid,
        key: &str,
        timeframe: Option<&str>,
        subject: &str,
    ) -> Result<QueryResponse> {
        let envelope = RequestEnvelope::build(correlation_id, key, timeframe, subject)?;
        let payload = Bytes::from(self.codec.encode(&envelope.request)?);
        let headers = envelope.headers(now_millis());

        let started = Instant::now();
        let reply = tokio::time::timeout(
            self.timeout,
            self.bus.request(&self.topic, headers, payload, self.timeout),
        )
        .await
        .unwrap_or(Ok(None));
        tracing::info!(
            correlation_id = %correlation_id,
            round_trip = ?started.elapsed(),
            "NATS reply time"
        );

        let Some(reply) = reply? else {
            return Err(GatewayError::NoReply {
                key: key.to_string(),
            });
        };

        check_correlation(&reply, &correlation_id)?;
        self.codec.decode(&reply.payload)
    }
}

/// Reject a reply whose correlation header names another request
fn check_correlation(reply: &Reply, expected: &Uuid) -> Result<()> {
    let Some(actual) = reply
        .headers
        .as_ref()
        .and_then(|headers| headers.get(CORRELATION_ID_HEADER))
    else {
        return Ok(());
    };

    let expected = expected.to_string();
    if actual.as_str() != expected {
        return Err(GatewayError::CorrelationMismatch {
            expected,
            actual: actual.as_str().to_string(),
        });
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
