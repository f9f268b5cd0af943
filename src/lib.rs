//! Fraud Query Gateway
//!
//! Synchronous lookups of fraud indicators over NATS request/reply. A caller
//! supplies a key, a human timeframe (`"5 minutes"`) and a subject; the gateway
//! publishes a JSON request with correlation headers on the query topic, waits
//! a bounded time for one reply and returns either the responder's answer or a
//! canonical error response.
//!
//! # Features
//!
//! - **Timeframe parsing**: `"<number> <unit>"` normalized to milliseconds
//! - **Request/Reply**: one bounded wait per query over a shared, multiplexed connection
//! - **Uniform errors**: timeouts, transport and decode failures share one response shape
//! - **Config sources**: properties file or environment, selected at startup
//! - **HTTP**: axum router exposing `GET /api/fraud/query`
//!
//! # Example
//!
//! ```rust,ignore
//! use fraud_query_gateway::{FraudQueryGateway, GatewayConfig, NatsConnection, NatsQueryBus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::default();
//!     let connection = NatsConnection::connect(&config).await?;
//!     let gateway = FraudQueryGateway::new(
//!         NatsQueryBus::new(connection.client()),
//!         config.topic.clone(),
//!         config.request_timeout,
//!     );
//!
//!     let outcome = gateway.query(Some("4111"), Some("5 minutes"), Some("card")).await;
//!     println!("{} {:?}", outcome.status(), outcome.response());
//!
//!     connection.shutdown().await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod codec;
pub mod config;
pub mod connection;
pub mod duration;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http;
pub mod mapper;
pub mod model;
pub mod query_bus;

// Re-exports
pub use codec::{Codec, JsonCodec};
pub use config::{ConfigSource, EnvSource, GatewayConfig, PropertiesSource, SourceKind};
pub use connection::NatsConnection;
pub use duration::{parse_duration_ms, TimeUnit};
pub use envelope::{RequestEnvelope, CLIENT_PUBLISH_TS_HEADER, CORRELATION_ID_HEADER};
pub use error::{DurationError, GatewayError, Result};
pub use gateway::{FraudQueryGateway, QueryOutcome};
pub use mapper::map_error;
pub use model::{Indicator, QueryRequest, QueryResponse};
pub use query_bus::{NatsQueryBus, Reply, RequestReply};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all public types are accessible
        let _ = std::any::type_name::<GatewayConfig>();
        let _ = std::any::type_name::<GatewayError>();
        let _ = std::any::type_name::<NatsConnection>();
        let _ = std::any::type_name::<NatsQueryBus>();
        let _ = std::any::type_name::<FraudQueryGateway<NatsQueryBus>>();
        let _ = std::any::type_name::<QueryResponse>();
    }
}
