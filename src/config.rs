use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::dispatcher::DispatcherConfig;
use crate::error::ConfigError;
use crate::forwarder::WebhookForwarder;
use crate::signing::Signer;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";

const ENV_BIND_ADDR: &str = "RELAY_BIND_ADDR";
const ENV_WEBHOOK_URL: &str = "RELAY_WEBHOOK_URL";
const ENV_QUEUE_CAPACITY: &str = "RELAY_QUEUE_CAPACITY";
const ENV_TIMEOUT_SECS: &str = "RELAY_TIMEOUT_SECS";
const ENV_SIGNING_SECRET: &str = "RELAY_SIGNING_SECRET";

/// Process-wide settings, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// Address the `/input` listener binds to.
    pub bind_addr: SocketAddr,

    /// Destination webhook for converted events.
    pub webhook_url: String,

    /// Dispatch queue capacity. Must be at least 1.
    pub queue_capacity: usize,

    /// Upper bound on one outbound POST, in seconds. Must be at least 1.
    pub request_timeout_secs: u64,

    /// When set, outbound bodies are HMAC-signed with this secret.
    pub signing_secret: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            webhook_url: "https://webhook.site/".to_string(),
            queue_capacity: DispatcherConfig::default().queue_capacity,
            request_timeout_secs: 10,
            signing_secret: None,
        }
    }
}

impl RelayConfig {
    /// Config file (if `RELAY_CONFIG` is set), then `RELAY_*` overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(std::env::vars())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()
    }

    /// Apply `RELAY_*` pairs from `vars`; other keys are ignored.
    pub fn apply_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.as_ref();
            let value: String = value.into();
            match key {
                ENV_BIND_ADDR => {
                    self.bind_addr = value
                        .parse()
                        .map_err(|e: std::net::AddrParseError| invalid(key, &value, e))?;
                }
                ENV_WEBHOOK_URL => self.webhook_url = value,
                ENV_QUEUE_CAPACITY => {
                    self.queue_capacity = value
                        .parse()
                        .map_err(|e: std::num::ParseIntError| invalid(key, &value, e))?;
                }
                ENV_TIMEOUT_SECS => {
                    self.request_timeout_secs = value
                        .parse()
                        .map_err(|e: std::num::ParseIntError| invalid(key, &value, e))?;
                }
                ENV_SIGNING_SECRET => {
                    self.signing_secret = if value.is_empty() { None } else { Some(value) };
                }
                _ => {}
            }
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.webhook_url.is_empty() {
            return Err(invalid("webhook_url", "", "must not be empty"));
        }
        if !(self.webhook_url.starts_with("http://") || self.webhook_url.starts_with("https://")) {
            return Err(invalid("webhook_url", &self.webhook_url, "must be an http(s) URL"));
        }
        if self.queue_capacity == 0 {
            return Err(invalid("queue_capacity", "0", "must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "0", "must be at least 1"));
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            queue_capacity: self.queue_capacity,
        }
    }

    /// Forwarder for the configured destination.
    pub fn forwarder(&self) -> WebhookForwarder {
        let forwarder = WebhookForwarder::new(self.webhook_url.clone())
            .with_timeout(self.request_timeout());
        match &self.signing_secret {
            Some(secret) => forwarder.with_signer(Signer::new(secret.as_bytes())),
            None => forwarder,
        }
    }
}

fn invalid(key: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
