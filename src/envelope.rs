//! Outbound request envelope
//!
//! Pairs a [`QueryRequest`] with the transport metadata that travels as NATS
//! headers: a fresh correlation id and the client-side publish timestamp.
//!
//! # Test Reference
//! - Test: `envelope::tests::test_headers_carry_metadata`

use crate::duration::parse_duration_ms;
use crate::error::Result;
use crate::model::QueryRequest;
use async_nats::HeaderMap;
use uuid::Uuid;

/// Header carrying the request correlation id
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Header carrying the client publish time, ms since epoch
pub const CLIENT_PUBLISH_TS_HEADER: &str = "x-client-publish-ts-ms";

/// Request plus correlation metadata for one exchange
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub correlation_id: Uuid,
    pub request: QueryRequest,
}

impl RequestEnvelope {
    /// Build the envelope, normalizing the timeframe expression
    pub fn build(
        correlation_id: Uuid,
        key: &str,
        timeframe: Option<&str>,
        subject: &str,
    ) -> Result<Self> {
        let request = QueryRequest {
            key: key.to_string(),
            timeframe: parse_duration_ms(timeframe)?,
            subject: subject.to_string(),
        };

        Ok(Self {
            correlation_id,
            request,
        })
    }

    /// Render the transport headers, stamping the given publish time
    pub fn headers(&self, client_publish_ms: i64) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CORRELATION_ID_HEADER,
            self.correlation_id.to_string().as_str(),
        );
        headers.insert(
            CLIENT_PUBLISH_TS_HEADER,
            client_publish_ms.to_string().as_str(),
        );
        headers
    }
}

/// Current wall-clock time in ms since epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DurationError, GatewayError};

    #[test]
    fn test_build_normalizes_timeframe() {
        let id = Uuid::new_v4();
        let envelope = RequestEnvelope::build(id, "4111", Some("5 minutes"), "card").unwrap();

        assert_eq!(envelope.correlation_id, id);
        assert_eq!(envelope.request.key, "4111");
        assert_eq!(envelope.request.timeframe, 300_000);
        assert_eq!(envelope.request.subject, "card");
    }

    #[test]
    fn test_build_rejects_bad_timeframe() {
        let result = RequestEnvelope::build(Uuid::new_v4(), "4111", Some("5"), "card");
        assert!(matches!(
            result,
            Err(GatewayError::Format(DurationError::InvalidFormat))
        ));
    }

    #[test]
    fn test_headers_carry_metadata() {
        let id = Uuid::new_v4();
        let envelope = RequestEnvelope::build(id, "k", None, "s").unwrap();
        let headers = envelope.headers(1_700_000_000_123);

        assert_eq!(
            headers.get(CORRELATION_ID_HEADER).map(|v| v.as_str()),
            Some(id.to_string().as_str())
        );
        assert_eq!(
            headers.get(CLIENT_PUBLISH_TS_HEADER).map(|v| v.as_str()),
            Some("1700000000123")
        );
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
    }
}
