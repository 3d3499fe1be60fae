//! Per-endpoint bounded measurement log
//!
//! Append-only except for endpoint cascade-delete and the retention worker.
//! A write is visible to every subsequent read once `record` returns.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::model::{EndpointId, Measurement, ProbeStatus};

type Series = Arc<RwLock<VecDeque<Measurement>>>;

/// In-memory measurement store, one bounded series per endpoint
pub struct MeasurementStore {
    /// Series keyed by endpoint, ordered oldest to newest
    series: DashMap<EndpointId, Series>,
    /// Cap per endpoint; oldest entries are dropped past this
    max_per_endpoint: usize,
}

impl MeasurementStore {
    pub fn new(max_per_endpoint: usize) -> Self {
        Self {
            series: DashMap::new(),
            max_per_endpoint,
        }
    }

    /// Append a measurement stamped with the current time
    pub fn record(
        &self,
        endpoint_id: EndpointId,
        status: ProbeStatus,
        latency_ms: Option<u64>,
        error: Option<String>,
    ) -> Measurement {
        self.record_at(endpoint_id, Utc::now(), status, latency_ms, error)
    }

    /// Append a measurement with an explicit timestamp (backfill and tests)
    pub fn record_at(
        &self,
        endpoint_id: EndpointId,
        observed_at: DateTime<Utc>,
        status: ProbeStatus,
        latency_ms: Option<u64>,
        error: Option<String>,
    ) -> Measurement {
        let measurement = Measurement {
            endpoint_id,
            observed_at,
            status,
            latency_ms,
            error,
        };

        let series = self.series_for(endpoint_id);
        let mut log = series.write();
        log.push_back(measurement.clone());
        while log.len() > self.max_per_endpoint {
            log.pop_front();
        }

        measurement
    }

    /// Most recent `limit` measurements, newest first
    pub fn recent(&self, endpoint_id: EndpointId, limit: usize) -> Vec<Measurement> {
        match self.series.get(&endpoint_id) {
            Some(series) => {
                let log = series.read();
                log.iter().rev().take(limit).cloned().collect()
            }
            None => Vec::new(),
        }
    }

    /// All measurements with `observed_at >= cutoff`, oldest first (aggregation order)
    pub fn since(&self, endpoint_id: EndpointId, cutoff: DateTime<Utc>) -> Vec<Measurement> {
        match self.series.get(&endpoint_id) {
            Some(series) => {
                let log = series.read();
                log.iter()
                    .filter(|m| m.observed_at >= cutoff)
                    .cloned()
                    .collect()
            }
            None => Vec::new(),
        }
    }

    /// Latest measurement for the endpoint, if any
    pub fn last(&self, endpoint_id: EndpointId) -> Option<Measurement> {
        self.series
            .get(&endpoint_id)
            .and_then(|series| series.read().back().cloned())
    }

    /// Number of retained measurements for the endpoint
    pub fn count(&self, endpoint_id: EndpointId) -> usize {
        self.series
            .get(&endpoint_id)
            .map(|series| series.read().len())
            .unwrap_or(0)
    }

    /// Cascade-delete the endpoint's entire series
    pub fn remove_endpoint(&self, endpoint_id: EndpointId) -> bool {
        self.series.remove(&endpoint_id).is_some()
    }

    /// Drop measurements older than `cutoff` across all endpoints.
    /// Returns the number of measurements removed.
    pub fn prune_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        for entry in self.series.iter() {
            let mut log = entry.value().write();
            while log.front().is_some_and(|m| m.observed_at < cutoff) {
                log.pop_front();
                removed += 1;
            }
        }
        removed
    }

    fn series_for(&self, endpoint_id: EndpointId) -> Series {
        self.series
            .entry(endpoint_id)
            .or_insert_with(|| Arc::new(RwLock::new(VecDeque::new())))
            .clone()
    }
}
