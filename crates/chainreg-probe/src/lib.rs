//! # chainreg-probe -- HTTP prober for registry endpoint checks
//!
//! Issues single GET requests against chain RPC/REST endpoints and normalizes
//! every outcome into a [`ProbeResult`]:
//! - a response of any status becomes `status: Some(code)` plus the body;
//! - a transport failure (connection refused, DNS, timeout) becomes
//!   `status: None` plus a failure reason.
//!
//! Nothing here throws on a non-2xx status. Callers decide what a status means:
//! the endpoint verifier wants any 2xx, some capability probes want 400.
//!
//! ## No retries
//!
//! Each probe is sent exactly once. A failed call is terminal for the check
//! that issued it; the per-request timeout from [`ProbeConfig`] bounds how
//! long a hanging endpoint can stall validation.

pub mod config;
pub mod error;

pub use config::{ConfigError, ProbeConfig};
pub use error::ProbeError;

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

/// Normalized outcome of one GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// The URL that was requested.
    pub url: String,
    /// HTTP status, or `None` if the request never completed.
    pub status: Option<u16>,
    /// Response body: parsed JSON, a JSON string for non-JSON text, or
    /// `Null` when there was no response.
    pub body: Value,
    /// Transport failure description when `status` is `None`.
    pub failure: Option<String>,
}

impl ProbeResult {
    /// A completed request.
    pub fn response(url: impl Into<String>, status: u16, body: Value) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            body,
            failure: None,
        }
    }

    /// A request that failed before a response arrived.
    pub fn unreachable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            body: Value::Null,
            failure: Some(reason.into()),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }

    /// True if the response status equals `code`.
    pub fn status_is(&self, code: u16) -> bool {
        self.status == Some(code)
    }

    /// Look up a string inside the JSON body by JSON Pointer.
    pub fn body_str(&self, pointer: &str) -> Option<&str> {
        self.body.pointer(pointer).and_then(Value::as_str)
    }
}

/// Something that can GET a URL and report what happened.
///
/// The HTTP implementation is [`HttpProber`]; tests substitute canned
/// responses.
pub trait Prober {
    /// Issue a single GET to `url`.
    fn get(&self, url: &str) -> impl Future<Output = ProbeResult> + Send;
}

impl<P: Prober + Sync + ?Sized> Prober for &P {
    fn get(&self, url: &str) -> impl Future<Output = ProbeResult> + Send {
        (**self).get(url)
    }
}

/// [`Prober`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    http: reqwest::Client,
    timeout_secs: u64,
}

impl HttpProber {
    /// Create a new prober from configuration.
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        let user_agent = reqwest::header::HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ConfigError::InvalidUserAgent(config.user_agent.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(reqwest::header::USER_AGENT, user_agent);
                headers
            })
            .build()
            .map_err(|e| ProbeError::Http {
                stage: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            timeout_secs: config.timeout_secs,
        })
    }

    fn describe_failure(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("request timed out after {}s", self.timeout_secs)
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        }
    }
}

impl Prober for HttpProber {
    async fn get(&self, url: &str) -> ProbeResult {
        tracing::debug!(%url, "probing");

        let resp = match self.http.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let reason = self.describe_failure(&e);
                tracing::debug!(%url, %reason, "probe transport failure");
                return ProbeResult::unreachable(url, reason);
            }
        };

        let status = resp.status().as_u16();
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let reason = self.describe_failure(&e);
                tracing::debug!(%url, status, %reason, "probe body read failed");
                return ProbeResult::unreachable(url, reason);
            }
        };

        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        tracing::debug!(%url, status, "probe completed");
        ProbeResult::response(url, status, body)
    }
}
