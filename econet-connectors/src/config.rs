//! Configuration entry for one controller
//!
//! Mirrors what a config UI collects (host and credentials) plus optional
//! tuning knobs. Entries are stored as JSON by the host:
//!
//! ```json
//! { "host": "192.168.1.50", "username": "admin", "password": "admin" }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use econet_core::constants::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RETRY_DELAY_MS,
};
use econet_core::{EconetError, EconetResult};

use crate::http::HttpConfig;

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EconetConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Uid recorded by the config flow once the controller answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl EconetConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            uid: None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }

    /// Parse and validate a stored entry
    pub fn from_json(json: &str) -> EconetResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EconetError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EconetResult<()> {
        if self.host.trim().is_empty() {
            return Err(EconetError::Config("host must not be empty".into()));
        }
        if self.username.is_empty() {
            return Err(EconetError::Config("username must not be empty".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(EconetError::Config("poll_interval_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(self.host.clone())
            .basic_auth(self.username.clone(), self.password.clone())
            .timeout_secs(self.timeout_secs)
            .max_attempts(self.max_attempts)
            .retry_delay(Duration::from_millis(self.retry_delay_ms))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl fmt::Debug for EconetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EconetConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"***")
            .field("uid", &self.uid)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .finish()
    }
}
