//! Window statistics over a slice of measurements

use serde::{Deserialize, Serialize};

use crate::model::Measurement;

/// Derived statistics for one endpoint over a trailing window.
/// Not persisted; recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub window_hours: u32,
    /// Percent of UP checks, one decimal. None (not zero) when the window is
    /// empty: zero would misleadingly imply measured downtime.
    pub uptime_percent: Option<f64>,
    /// Mean latency over UP measurements carrying a latency, nearest integer
    pub avg_latency_ms: Option<u64>,
    pub total_checks: usize,
}

/// Compute stats over measurements already filtered to the window.
///
/// Pure: callers fetch the window from the store (`since`) and pass it in.
pub fn compute_stats(measurements: &[Measurement], window_hours: u32) -> StatsSnapshot {
    let total_checks = measurements.len();
    if total_checks == 0 {
        return StatsSnapshot {
            window_hours,
            uptime_percent: None,
            avg_latency_ms: None,
            total_checks: 0,
        };
    }

    let up_count = measurements.iter().filter(|m| m.status.is_up()).count();
    let uptime = up_count as f64 * 100.0 / total_checks as f64;

    let latencies: Vec<u64> = measurements
        .iter()
        .filter(|m| m.status.is_up())
        .filter_map(|m| m.latency_ms)
        .collect();

    let avg_latency_ms = if latencies.is_empty() {
        None
    } else {
        let sum: u64 = latencies.iter().sum();
        Some((sum as f64 / latencies.len() as f64).round() as u64)
    };

    StatsSnapshot {
        window_hours,
        uptime_percent: Some((uptime * 10.0).round() / 10.0),
        avg_latency_ms,
        total_checks,
    }
}
