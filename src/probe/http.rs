//! HTTP prober
//!
//! Network outcomes (timeout, refused connection, error status) are values,
//! never errors: they resolve to a DOWN outcome that flows into the store and
//! the alert evaluator. Only a malformed URL is an `Err`, since that is a
//! caller bug rather than an operational result.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::model::ProbeStatus;

/// Result of one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    /// Elapsed wall time; present whenever the HTTP exchange completed
    pub latency_ms: Option<u64>,
    /// Short failure detail for DOWN outcomes
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn up(latency_ms: u64) -> Self {
        Self {
            status: ProbeStatus::Up,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn down(latency_ms: Option<u64>, error: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Down,
            latency_ms,
            error: Some(error.into()),
        }
    }
}

/// URL validation failures (caller bugs, rejected before any probe)
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("URL must not be empty")]
    EmptyUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme: {0} (expected http or https)")]
    UnsupportedScheme(String),
}

/// Validate a probe target URL: parseable, http or https
pub fn validate_url(url: &str) -> Result<(), ProbeError> {
    if url.trim().is_empty() {
        return Err(ProbeError::EmptyUrl);
    }

    let parsed = reqwest::Url::parse(url).map_err(|e| ProbeError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProbeError::UnsupportedScheme(other.to_string())),
    }
}

/// The probing seam: the scheduler and engine only see this trait,
/// so tests can substitute a scripted prober.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> Result<ProbeOutcome, ProbeError>;
}

/// Prober backed by a reqwest client with a per-request timeout
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        validate_url(url)?;

        let start = Instant::now();
        match self.client.get(url).send().await {
            Ok(response) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                let code = response.status().as_u16();

                // Redirects are followed by the client, so anything below 400
                // that survives to here counts as healthy.
                if code < 400 {
                    Ok(ProbeOutcome::up(elapsed_ms))
                } else {
                    Ok(ProbeOutcome::down(Some(elapsed_ms), format!("HTTP {}", code)))
                }
            }
            Err(e) if e.is_timeout() => Ok(ProbeOutcome::down(
                None,
                format!("timed out after {:?}", self.timeout),
            )),
            Err(e) => Ok(ProbeOutcome::down(None, e.to_string())),
        }
    }
}
