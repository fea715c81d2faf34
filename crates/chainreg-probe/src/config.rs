//! Prober configuration.
//!
//! Defaults are suitable for CI runs against public endpoints. Override via
//! environment variables or explicit construction for tests.

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP prober.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds. A call exceeding it is reported as a
    /// transport failure.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every probe.
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CHAINREG_TIMEOUT_SECS` (default: 30, must be a positive integer)
    /// - `CHAINREG_USER_AGENT` (default: `chainreg/<version>`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_secs = match lookup("CHAINREG_TIMEOUT_SECS") {
            Some(raw) => parse_timeout("CHAINREG_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let user_agent = lookup("CHAINREG_USER_AGENT").unwrap_or_else(default_user_agent);

        Ok(Self {
            timeout_secs,
            user_agent,
        })
    }

    /// Replace the timeout, rejecting zero.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(
                "timeout_secs".to_string(),
                "0".to_string(),
            ));
        }
        self.timeout_secs = timeout_secs;
        Ok(self)
    }
}

fn default_user_agent() -> String {
    format!("chainreg/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_timeout(var: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout(var.to_string(), raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid timeout for {0}: {1:?} (expected a positive number of seconds)")]
    InvalidTimeout(String, String),
    #[error("invalid User-Agent header value: {0:?}")]
    InvalidUserAgent(String),
}
