//! HTTP Connector for the ecoNET-300 Local API
//!
//! ## Overview
//!
//! The controller exposes a small read-mostly JSON API under
//! `{host}/econet/`. Every call is a basic-auth `GET`, including writes,
//! which carry the parameter index and value as query parameters.
//!
//! ## Status Handling
//!
//! | Outcome                  | Result                 | Retried |
//! |--------------------------|------------------------|---------|
//! | 200 + JSON object        | `Ok(Some(object))`     | no      |
//! | 401                      | `Err(EconetError::Auth)` | no    |
//! | any other status         | `Ok(None)`             | no      |
//! | request timed out        | `Ok(None)` once exhausted | yes  |
//! | other transport failure  | `Ok(None)`             | no      |
//!
//! Timeouts are retried up to `max_attempts` times in total with a fixed
//! pause between attempts. When every attempt timed out the caller sees "no
//! data", exactly as for a non-200 status.
//!
//! ## Transport Seam
//!
//! Request building, status handling and retry live in [`EconetClient`].
//! Moving bytes is delegated to a [`Transport`]:
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  EconetClient   │     │    Transport     │
//! │ auth, retry,    │────▶│  ureq (default)  │
//! │ status mapping  │     │  or test double  │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use econet_connectors::http::{EconetClient, HttpConfig, UreqTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpConfig::new("192.168.1.50")
//!     .basic_auth("admin", "admin")
//!     .timeout_secs(10);
//!
//! let client = EconetClient::new(config, Arc::new(UreqTransport::new()));
//! if let Some(sys_params) = client.get_params("sysParams").await? {
//!     println!("uid: {:?}", sys_params.get("uid"));
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use log::{debug, warn};
use serde_json::{Map, Value};
use thiserror::Error;

use econet_core::constants::{
    API_SET_PARAM_KEY, API_SET_PARAM_URI, API_SET_PARAM_VALUE, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_DELAY_MS,
};
use econet_core::{EconetError, EconetResult};

/// JSON object returned by every endpoint
pub type JsonObject = Map<String, Value>;

const HTTP_OK: u16 = 200;
const HTTP_UNAUTHORIZED: u16 = 401;

/// Transport-level failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No response within the request timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection refused, DNS failure, unreadable body...
    #[error("Request failed: {0}")]
    Failed(String),
}

/// Outgoing request as seen by a [`Transport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

/// Status and raw body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 response with a JSON body
    pub fn json(value: &Value) -> Self {
        Self::new(HTTP_OK, value.to_string())
    }
}

/// Moves a single GET request over the wire
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Basic-auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", credentials)
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Controller address, with or without scheme
    pub host: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Credentials, if the controller requires them
    pub auth: Option<BasicAuth>,
    /// Total attempts for a request that keeps timing out
    pub max_attempts: u32,
    /// Pause between timed-out attempts
    pub retry_delay: Duration,
}

impl HttpConfig {
    /// Create new configuration for a controller host
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            auth: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the attempt ceiling; at least one attempt is always made
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the pause between timed-out attempts
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Prefix `http://` unless the host already names a scheme
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("http://") || host.contains("https://") {
        host.to_string()
    } else {
        warn!("Manually adding 'http' to host");
        format!("http://{}", host)
    }
}

/// Client for the controller's `/econet/` endpoints
#[derive(Clone)]
pub struct EconetClient {
    host: String,
    config: HttpConfig,
    transport: Arc<dyn Transport>,
}

impl EconetClient {
    /// Create new client; the host is normalized once here
    pub fn new(config: HttpConfig, transport: Arc<dyn Transport>) -> Self {
        let host = normalize_host(&config.host);
        Self {
            host,
            config,
            transport,
        }
    }

    /// Normalized host, including scheme
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch `{host}/econet/{endpoint}`
    pub async fn get_params(&self, endpoint: &str) -> EconetResult<Option<JsonObject>> {
        let url = format!("{}/econet/{}", self.host, endpoint);
        self.get(self.build_request(url, Vec::new())).await
    }

    /// Write `value` to the parameter with device index `key`
    pub async fn set_param(&self, key: &str, value: &Value) -> EconetResult<Option<JsonObject>> {
        let url = format!("{}/econet/{}", self.host, API_SET_PARAM_URI);
        let query = vec![
            (API_SET_PARAM_KEY.to_string(), key.to_string()),
            (API_SET_PARAM_VALUE.to_string(), query_value(value)),
        ];
        self.get(self.build_request(url, query)).await
    }

    /// Build request with authentication and headers
    fn build_request(&self, url: String, query: Vec<(String, String)>) -> HttpRequest {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if let Some(auth) = &self.config.auth {
            headers.push(("Authorization".to_string(), auth.header_value()));
        }

        HttpRequest {
            url,
            query,
            headers,
            timeout: self.config.timeout,
        }
    }

    /// Execute request with timeout retry
    async fn get(&self, request: HttpRequest) -> EconetResult<Option<JsonObject>> {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.config.retry_delay).await;
            }

            match self.transport.get(&request).await {
                Ok(resp) if resp.status == HTTP_UNAUTHORIZED => {
                    return Err(EconetError::Auth);
                }
                Ok(resp) if resp.status != HTTP_OK => {
                    debug!("{} returned status {}", request.url, resp.status);
                    return Ok(None);
                }
                Ok(resp) => return Ok(parse_object(&request.url, &resp.body)),
                Err(TransportError::Timeout) => {
                    warn!("Timeout error, retry({}/{})", attempt, max_attempts);
                }
                Err(TransportError::Failed(reason)) => {
                    warn!("Request to {} failed: {}", request.url, reason);
                    return Ok(None);
                }
            }
        }

        warn!(
            "Giving up on {} after {} timed out attempts",
            request.url, max_attempts
        );
        Ok(None)
    }
}

impl fmt::Debug for EconetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EconetClient")
            .field("host", &self.host)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_object(url: &str, body: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => Some(object),
        Ok(other) => {
            warn!("{} returned non-object JSON: {}", url, other);
            None
        }
        Err(e) => {
            warn!("{} returned invalid JSON: {}", url, e);
            None
        }
    }
}

/// Blocking `ureq` agent driven from tokio's blocking pool
#[cfg(feature = "http")]
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(&format!("econet-connectors/{}", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }

    fn call(agent: &ureq::Agent, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut req = agent.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.query {
            req = req.query(name, value);
        }
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }

        match req.call() {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.into_string().map_err(|e| classify_io(&e))?;
                Ok(HttpResponse { status, body })
            }
            Err(ureq::Error::Status(status, resp)) => Ok(HttpResponse {
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(classify_transport(&transport)),
        }
    }
}

#[cfg(feature = "http")]
impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for UreqTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let request = request.clone();

        tokio::task::spawn_blocking(move || Self::call(&agent, &request))
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?
    }
}

#[cfg(feature = "http")]
fn classify_io(error: &std::io::Error) -> TransportError {
    match error.kind() {
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => TransportError::Timeout,
        _ => TransportError::Failed(error.to_string()),
    }
}

#[cfg(feature = "http")]
fn classify_transport(transport: &ureq::Transport) -> TransportError {
    let io_error = std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<std::io::Error>());

    match io_error {
        Some(e) => classify_io(e),
        None => TransportError::Failed(transport.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::new("192.168.1.50")
            .basic_auth("admin", "secret")
            .timeout_secs(3)
            .max_attempts(0)
            .retry_delay(Duration::ZERO);

        assert_eq!(config.host, "192.168.1.50");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.retry_delay, Duration::ZERO);
        assert_eq!(config.auth.unwrap().username, "admin");
    }

    #[test]
    fn test_config_defaults() {
        let config = HttpConfig::new("host");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_host_normalization() {
        assert_eq!(normalize_host("192.168.1.50"), "http://192.168.1.50");
        assert_eq!(normalize_host("http://econet.local"), "http://econet.local");
        assert_eq!(normalize_host("https://econet.local/"), "https://econet.local");
    }

    #[test]
    fn test_basic_auth_header() {
        let auth = BasicAuth {
            username: "admin".into(),
            password: "admin".into(),
        };
        assert_eq!(auth.header_value(), "Basic YWRtaW46YWRtaW4=");

        let auth = BasicAuth {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", auth).contains("hunter2"));
    }

    #[test]
    fn test_query_value_rendering() {
        assert_eq!(query_value(&Value::from(55)), "55");
        assert_eq!(query_value(&Value::from("55")), "55");
        assert_eq!(query_value(&Value::from(55.5)), "55.5");
    }

    #[test]
    fn test_parse_object_rejects_non_objects() {
        assert!(parse_object("u", "{\"a\":1}").is_some());
        assert!(parse_object("u", "[1,2]").is_none());
        assert!(parse_object("u", "not json").is_none());
    }
}
