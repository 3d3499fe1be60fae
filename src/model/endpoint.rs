//! Endpoint identity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::measurement::ProbeStatus;

/// Engine-allocated endpoint identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(pub u64);

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque caller identity, issued by the external auth collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monitored endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: EndpointId,
    /// Owning caller; endpoints are invisible to other owners
    pub owner: OwnerId,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the dashboard's main table: endpoint identity plus its
/// latest measurement (if any) and the current alert flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSummary {
    pub id: EndpointId,
    pub name: String,
    pub url: String,
    pub last_status: Option<ProbeStatus>,
    pub last_latency_ms: Option<u64>,
    pub last_observed_at: Option<DateTime<Utc>>,
    /// Mirrors the alert config's `alert_active`; false when no config exists yet
    pub alert: bool,
}
