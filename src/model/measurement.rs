//! Probe measurement types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::endpoint::EndpointId;

/// Outcome of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    Up,
    Down,
}

impl ProbeStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeStatus::Up)
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "UP"),
            ProbeStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// The immutable recorded outcome of one probe.
///
/// `latency_ms` is present whenever the HTTP exchange completed (always for
/// UP; for DOWN with an error status); absent on timeout or connect failure.
/// `error` carries a short detail string for DOWN measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub endpoint_id: EndpointId,
    pub observed_at: DateTime<Utc>,
    pub status: ProbeStatus,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}
