//! Payload codec for query messages

use crate::error::{GatewayError, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Encodes outbound requests and decodes inbound replies
pub trait Codec: Send + Sync {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T>;
}

/// JSON codec backed by serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| GatewayError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        serde_json::from_slice(payload).map_err(|e| GatewayError::Deserialization(e.to_string()))
    }
}
