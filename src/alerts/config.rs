//! Per-endpoint alert configuration
//!
//! Thresholds are user-editable; the counters and the active flag are owned
//! by the evaluator and never settable through the update path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Thresholds plus evaluator-owned runtime state, one per endpoint.
/// Created lazily with defaults on first access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// UP measurements above this latency trip a LATENCY alert
    pub latency_threshold_ms: u64,
    /// DOWN streak length that trips a DOWN alert
    pub consecutive_fail_threshold: u32,
    /// Length of the current trailing DOWN streak (evaluator-owned)
    pub consecutive_failures: u32,
    /// Whether the endpoint is currently in the ALERTING state (evaluator-owned)
    pub alert_active: bool,
    /// Timestamp of the most recent activation (evaluator-owned)
    pub last_alert_at: Option<DateTime<Utc>>,
}

impl AlertConfig {
    pub fn new(latency_threshold_ms: u64, consecutive_fail_threshold: u32) -> Self {
        Self {
            latency_threshold_ms,
            consecutive_fail_threshold,
            consecutive_failures: 0,
            alert_active: false,
            last_alert_at: None,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self::new(500, 3)
    }
}

/// Caller-facing threshold update. Exactly these two fields are writable;
/// counters and state pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfigUpdate {
    pub latency_threshold_ms: u64,
    pub consecutive_fail_threshold: u32,
}

impl AlertConfigUpdate {
    /// Reject non-positive thresholds before any state is touched
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.latency_threshold_ms == 0 {
            return Err(ConfigError::NonPositiveLatencyThreshold);
        }
        if self.consecutive_fail_threshold == 0 {
            return Err(ConfigError::NonPositiveFailThreshold);
        }
        Ok(())
    }
}

/// Alert configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("latency_threshold_ms must be a positive integer")]
    NonPositiveLatencyThreshold,

    #[error("consecutive_fail_threshold must be at least 1")]
    NonPositiveFailThreshold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AlertConfig::default();
        assert_eq!(config.latency_threshold_ms, 500);
        assert_eq!(config.consecutive_fail_threshold, 3);
        assert_eq!(config.consecutive_failures, 0);
        assert!(!config.alert_active);
        assert!(config.last_alert_at.is_none());
    }

    #[test]
    fn test_update_validation() {
        let ok = AlertConfigUpdate {
            latency_threshold_ms: 200,
            consecutive_fail_threshold: 1,
        };
        assert!(ok.validate().is_ok());

        let bad_latency = AlertConfigUpdate {
            latency_threshold_ms: 0,
            consecutive_fail_threshold: 3,
        };
        assert!(matches!(
            bad_latency.validate(),
            Err(ConfigError::NonPositiveLatencyThreshold)
        ));

        let bad_fails = AlertConfigUpdate {
            latency_threshold_ms: 200,
            consecutive_fail_threshold: 0,
        };
        assert!(matches!(
            bad_fails.validate(),
            Err(ConfigError::NonPositiveFailThreshold)
        ));
    }
}
