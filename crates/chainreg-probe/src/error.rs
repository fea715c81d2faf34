//! Prober error types.

/// Errors raised while constructing the prober.
///
/// Probing itself never fails: transport problems and non-2xx statuses are
/// folded into [`ProbeResult`](crate::ProbeResult).
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The underlying HTTP client could not be built.
    #[error("HTTP client error during {stage}: {source}")]
    Http {
        stage: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
