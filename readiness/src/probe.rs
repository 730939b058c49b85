//! The readiness probe itself.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use crate::error::{ReadinessError, Result};

/// Default per-probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A single-shot HTTP readiness check.
///
/// Built up with query parameters (typically the application's token key),
/// then executed with [`run`](Self::run). Success is exactly HTTP 200.
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    url: String,
    query: Vec<(String, String)>,
    insecure: bool,
    timeout: Duration,
}

impl ReadinessProbe {
    /// Create a probe against the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a query parameter to the probed URL.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Trust invalid TLS certificates.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Bound the whole probe, connect included, by a timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute the probe.
    pub async fn run(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(ReadinessError::MissingUrl);
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.insecure)
            .timeout(self.timeout)
            .build()?;

        debug!(url = %self.url, "probing instance");
        let response = client.get(&self.url).query(&self.query).send().await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(ReadinessError::UnexpectedStatus(status)),
        }
    }
}
