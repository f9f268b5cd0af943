//! Shared NATS connection
//!
//! One [`NatsConnection`] is created at startup and handed to every component
//! that needs the bus. Request/reply calls go through cheap clones of the
//! underlying client; [`NatsConnection::shutdown`] flushes and releases it on exit.
//!
//! # Test Reference
//! - Test: `tests/integration_tests.rs::test_connect_to_nats`

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use async_nats::connection::State;
use async_nats::{Client, ConnectOptions};

/// Process-wide NATS connection handle
pub struct NatsConnection {
    client: Client,
    url: String,
}

impl NatsConnection {
    /// Connect to the server named in `config`
    pub async fn connect(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;

        let url = config.nats_url();
        let client = ConnectOptions::new()
            .name("fraud-query-gateway")
            .connection_timeout(config.connection_timeout)
            .max_reconnects(Some(config.max_reconnects))
            .connect(url.as_str())
            .await?;

        tracing::info!(url = %url, "Connected to NATS server");

        Ok(Self { client, url })
    }

    /// Warn when the connection is not established yet
    pub fn log_health(&self) -> bool {
        let state = self.client.connection_state();
        let connected = matches!(state, State::Connected);
        if !connected {
            tracing::warn!(url = %self.url, state = ?state, "NATS not connected at startup");
        }
        connected
    }

    /// Get a handle to the underlying NATS client
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Get the server URL this connection was opened against
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Flush pending messages and release the connection.
    ///
    /// The socket closes once the last client clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        tracing::info!(url = %self.url, "Closing NATS connection");
        self.client
            .flush()
            .await
            .map_err(|e| GatewayError::Connection(format!("Failed to flush: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let config = GatewayConfig {
            nats_host: String::new(),
            ..GatewayConfig::default()
        };
        let result = NatsConnection::connect(&config).await;
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[tokio::test]
    #[ignore = "requires NATS server"]
    async fn test_new_connection() {
        let connection = NatsConnection::connect(&GatewayConfig::default())
            .await
            .unwrap();
        assert!(connection.log_health());
        connection.shutdown().await.unwrap();
    }
}
