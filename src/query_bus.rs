//! NATS request/reply query bus
//!
//! [`RequestReply`] is the seam the gateway talks to: one publish, one bounded
//! wait, at most one reply. [`NatsQueryBus`] implements it over a shared
//! `async_nats::Client`, which multiplexes every in-flight request over a single
//! connection and routes each reply to its own unique inbox, so replies can't
//! cross between concurrent callers. A topic with no subscribers is treated
//! like an expired wait.
//!
//! # Test Reference
//! - Test: `tests/integration_tests.rs::test_request_reply_round_trip`

use crate::error::{GatewayError, Result};
use async_nats::client::RequestErrorKind;
use async_nats::{Client, HeaderMap, Request};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// A reply message received for a request
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub headers: Option<HeaderMap>,
    pub payload: Bytes,
}

/// Publish-and-await-one-reply primitive
#[async_trait]
pub trait RequestReply: Send + Sync {
    /// Publish `payload` on `topic` and wait up to `timeout` for one reply.
    ///
    /// Returns `Ok(None)` when the wait expires without a reply.
    async fn request(
        &self,
        topic: &str,
        headers: HeaderMap,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Option<Reply>>;
}

/// NATS QueryBus implementation
///
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct NatsQueryBus {
    client: Client,
}

impl NatsQueryBus {
    /// Create a new NATS QueryBus over an established client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestReply for NatsQueryBus {
    async fn request(
        &self,
        topic: &str,
        headers: HeaderMap,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Option<Reply>> {
        let request = Request::new()
            .payload(payload)
            .headers(headers)
            .timeout(Some(timeout));

        match self.client.send_request(topic.to_string(), request).await {
            Ok(message) => Ok(Some(Reply {
                headers: message.headers,
                payload: message.payload,
            })),
            Err(err) => map_request_error(err.kind(), err.to_string(), topic),
        }
    }
}

/// Timeouts and missing responders both mean no reply; anything else is a transport failure
pub(crate) fn map_request_error(
    kind: RequestErrorKind,
    message: String,
    topic: &str,
) -> Result<Option<Reply>> {
    match kind {
        RequestErrorKind::TimedOut => Ok(None),
        RequestErrorKind::NoResponders => {
            tracing::warn!(topic = %topic, "No responders subscribed to query topic");
            Ok(None)
        }
        _ => Err(GatewayError::Transport(message)),
    }
}

#[async_trait]
impl<T: RequestReply + ?Sized> RequestReply for std::sync::Arc<T> {
    async fn request(
        &self,
        topic: &str,
        headers: HeaderMap,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Option<Reply>> {
        (**self).request(topic, headers, payload, timeout).await
    }
}
