//! Engine configuration

use std::time::Duration;

/// Tunables for the monitoring engine and its workers
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Per-request probe timeout (default: 5 s)
    pub probe_timeout: Duration,
    /// Scheduler tick period (default: 60 s)
    pub poll_interval: Duration,
    /// Measurements retained per endpoint (default: 10 000)
    pub max_measurements_per_endpoint: usize,
    /// Alert records retained per endpoint (default: 500)
    pub max_alerts_per_endpoint: usize,
    /// Age past which measurements and alerts are pruned (default: 72 h)
    pub retention: Duration,
    /// Retention worker tick period (default: 60 s)
    pub retention_check_interval: Duration,
    /// TTL for cached stats snapshots (default: 5 s)
    pub stats_cache_ttl: Duration,
    /// Maximum cached (endpoint, window) snapshots (default: 1024)
    pub stats_cache_capacity: u64,
    /// Latency threshold for lazily created alert configs (default: 500 ms)
    pub default_latency_threshold_ms: u64,
    /// Failure streak threshold for lazily created alert configs (default: 3)
    pub default_fail_threshold: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(60),
            max_measurements_per_endpoint: 10_000,
            max_alerts_per_endpoint: 500,
            retention: Duration::from_secs(72 * 3600),
            retention_check_interval: Duration::from_secs(60),
            stats_cache_ttl: Duration::from_secs(5),
            stats_cache_capacity: 1024,
            default_latency_threshold_ms: 500,
            default_fail_threshold: 3,
        }
    }
}

impl MonitorConfig {
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_measurement_cap(mut self, cap: usize) -> Self {
        self.max_measurements_per_endpoint = cap;
        self
    }

    pub fn with_alert_cap(mut self, cap: usize) -> Self {
        self.max_alerts_per_endpoint = cap;
        self
    }

    pub fn with_default_thresholds(mut self, latency_ms: u64, fails: u32) -> Self {
        self.default_latency_threshold_ms = latency_ms;
        self.default_fail_threshold = fails;
        self
    }
}
