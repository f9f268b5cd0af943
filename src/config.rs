//! Gateway configuration
//!
//! Settings are read from a key-value [`ConfigSource`]. Which source backs the
//! gateway is decided at startup by the `app.config.source` key of the local
//! properties file:
//!
//! - `properties` (default): a `.properties` file, `app.config.path` or the local file itself
//! - `env`: process environment, `nats.host` is read from `NATS_HOST`
//!
//! # Test Reference
//! - Test: `config::tests::test_load_selects_env_source`

use crate::error::{GatewayError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Key selecting the config source variant
pub const SOURCE_KEY: &str = "app.config.source";

/// Key overriding the properties file path
pub const SOURCE_PATH_KEY: &str = "app.config.path";

/// Key setting a prefix for environment variable names
pub const ENV_PREFIX_KEY: &str = "app.config.env.prefix";

// -----------------------------------------------------------------------------
// ConfigSource
// -----------------------------------------------------------------------------

/// Key-value configuration source
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Properties file source (`key=value` lines)
#[derive(Debug, Clone, Default)]
pub struct PropertiesSource {
    entries: HashMap<String, String>,
}

impl PropertiesSource {
    /// Load a properties file; a missing file yields an empty source
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Properties file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(GatewayError::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parse properties text. Lines starting with `#` or `!` are comments.
    pub fn parse(contents: &str) -> Self {
        let entries = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .filter_map(|line| {
                let split = line.find(['=', ':'])?;
                let (key, value) = line.split_at(split);
                Some((key.trim().to_string(), value[1..].trim().to_string()))
            })
            .collect();
        Self { entries }
    }
}

impl ConfigSource for PropertiesSource {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Environment variable source
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
}

impl EnvSource {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Variable name for a dotted key: `fraud.query.topic` -> `FRAUD_QUERY_TOPIC`
    pub fn var_name(&self, key: &str) -> String {
        let name: String = key
            .chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_ascii_uppercase(), name),
            None => name,
        }
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.var_name(key)).ok()
    }
}

/// Which [`ConfigSource`] variant backs the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Properties(PathBuf),
    Env { prefix: Option<String> },
}

impl SourceKind {
    /// Read the selection from the local properties file
    pub fn select(local: &PropertiesSource, local_path: &Path) -> Result<Self> {
        let kind = local.get_or(SOURCE_KEY, "properties");
        match kind.trim().to_ascii_lowercase().as_str() {
            "properties" | "file" => {
                let path = local
                    .get(SOURCE_PATH_KEY)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| local_path.to_path_buf());
                Ok(Self::Properties(path))
            }
            "env" | "environment" => Ok(Self::Env {
                prefix: local.get(ENV_PREFIX_KEY),
            }),
            other => Err(GatewayError::Config(format!(
                "Unknown config source '{}', expected 'properties' or 'env'",
                other
            ))),
        }
    }

    /// Open the selected source
    pub fn open(&self) -> Result<Box<dyn ConfigSource>> {
        match self {
            Self::Properties(path) => Ok(Box::new(PropertiesSource::load(path)?)),
            Self::Env { prefix } => Ok(Box::new(EnvSource::new(prefix.clone()))),
        }
    }
}

// -----------------------------------------------------------------------------
// GatewayConfig
// -----------------------------------------------------------------------------

/// Fraud query gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// NATS server host
    pub nats_host: String,

    /// NATS server port
    pub nats_port: u16,

    /// Max reconnect attempts
    pub max_reconnects: usize,

    /// Connection timeout
    pub connection_timeout: Duration,

    /// Topic queries are published on
    pub topic: String,

    /// Bound on the wait for a reply
    pub request_timeout: Duration,

    /// HTTP bind host
    pub server_host: String,

    /// HTTP bind port
    pub server_port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            nats_host: "localhost".to_string(),
            nats_port: 4222,
            max_reconnects: 10,
            connection_timeout: Duration::from_secs(5),
            topic: "fraud.query".to_string(),
            request_timeout: Duration::from_millis(1000),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
        }
    }
}

impl GatewayConfig {
    /// Load configuration, starting from the local properties file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let local = PropertiesSource::load(path)?;
        let kind = SourceKind::select(&local, path)?;

        tracing::info!(source = ?kind, "Loading gateway configuration");

        let source = kind.open()?;
        Self::from_source(source.as_ref())
    }

    /// Create configuration from environment variables
    ///
    /// # Environment Variables
    /// - `NATS_HOST`, `NATS_PORT`: NATS server address
    /// - `FRAUD_QUERY_TOPIC`: request topic
    /// - `FRAUD_QUERY_TIMEOUT`: reply timeout, e.g. `1s`
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvSource::default())
    }

    /// Read every setting from `source`, falling back to defaults
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            nats_host: source.get_or("nats.host", &defaults.nats_host),
            nats_port: parse_number(source, "nats.port", defaults.nats_port)?,
            max_reconnects: parse_number(source, "nats.max.reconnects", defaults.max_reconnects)?,
            connection_timeout: match source.get("nats.connection.timeout") {
                Some(value) => parse_timeout(&value)?,
                None => defaults.connection_timeout,
            },
            topic: source.get_or("fraud.query.topic", &defaults.topic),
            request_timeout: match source.get("fraud.query.timeout") {
                Some(value) => parse_timeout(&value)?,
                None => defaults.request_timeout,
            },
            server_host: source.get_or("server.host", &defaults.server_host),
            server_port: parse_number(source, "server.port", defaults.server_port)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.nats_host.trim().is_empty() {
            return Err(GatewayError::Config("NATS host cannot be empty".to_string()));
        }

        if self.nats_port == 0 {
            return Err(GatewayError::Config("NATS port cannot be 0".to_string()));
        }

        if self.topic.trim().is_empty() {
            return Err(GatewayError::Config("Topic cannot be empty".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(GatewayError::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// NATS server URL
    pub fn nats_url(&self) -> String {
        format!("nats://{}:{}", self.nats_host, self.nats_port)
    }
}

fn parse_number<T: std::str::FromStr>(source: &dyn ConfigSource, key: &str, default: T) -> Result<T> {
    match source.get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| GatewayError::Config(format!("Invalid value for {}: '{}'", key, value))),
        None => Ok(default),
    }
}

/// Parse a timeout such as `500ms`, `5s` or `1m 30s`
pub fn parse_timeout(input: &str) -> Result<Duration> {
    let timeout = humantime::parse_duration(input.trim())
        .map_err(|e| GatewayError::Config(format!("Invalid timeout '{}': {}", input, e)))?;

    if timeout.is_zero() {
        return Err(GatewayError::Config(format!(
            "Invalid timeout '{}': must be greater than zero",
            input
        )));
    }
    Ok(timeout)
}
