//! Error types for readiness probes.

use thiserror::Error;

/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, ReadinessError>;

/// Errors that can occur while probing an instance.
#[derive(Error, Debug)]
pub enum ReadinessError {
    /// No URL to probe.
    #[error("no url defined")]
    MissingUrl,

    /// Transport-level failure (DNS, connect, TLS, timeout).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The instance answered, but not with HTTP 200.
    #[error("received unexpected http status code {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}
