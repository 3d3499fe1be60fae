//! Immutable alert records and per-endpoint bounded history

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::model::EndpointId;

/// What tripped (or cleared) the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertKind {
    Latency,
    Down,
    Recovered,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::Latency => write!(f, "LATENCY"),
            AlertKind::Down => write!(f, "DOWN"),
            AlertKind::Recovered => write!(f, "RECOVERED"),
        }
    }
}

/// Immutable record of one state-machine transition.
/// Append-only; removed only by endpoint cascade-delete or retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub endpoint_id: EndpointId,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    /// Observed latency for LATENCY, failure streak for DOWN, None for RECOVERED
    pub value: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl AlertRecord {
    pub fn down(endpoint_id: EndpointId, failures: u32, at: DateTime<Utc>) -> Self {
        Self {
            endpoint_id,
            kind: AlertKind::Down,
            message: format!("Endpoint is DOWN for {} consecutive checks", failures),
            value: Some(failures as u64),
            created_at: at,
        }
    }

    pub fn latency(
        endpoint_id: EndpointId,
        latency_ms: u64,
        threshold_ms: u64,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            endpoint_id,
            kind: AlertKind::Latency,
            message: format!(
                "Latency {} ms exceeded threshold {} ms",
                latency_ms, threshold_ms
            ),
            value: Some(latency_ms),
            created_at: at,
        }
    }

    pub fn recovered(endpoint_id: EndpointId, at: DateTime<Utc>) -> Self {
        Self {
            endpoint_id,
            kind: AlertKind::Recovered,
            message: "Endpoint recovered".to_string(),
            value: None,
            created_at: at,
        }
    }
}

type Log = Arc<RwLock<VecDeque<AlertRecord>>>;

/// Bounded append-only alert log per endpoint.
///
/// Records are immutable once pushed. Besides endpoint cascade-delete, the
/// per-endpoint cap and the retention worker's age prune also drop the oldest
/// records; an in-memory log cannot retain alert history unbounded.
pub struct AlertHistory {
    logs: DashMap<EndpointId, Log>,
    max_per_endpoint: usize,
}

impl AlertHistory {
    pub fn new(max_per_endpoint: usize) -> Self {
        Self {
            logs: DashMap::new(),
            max_per_endpoint,
        }
    }

    pub fn push(&self, record: AlertRecord) {
        let log = self
            .logs
            .entry(record.endpoint_id)
            .or_insert_with(|| Arc::new(RwLock::new(VecDeque::new())))
            .clone();

        let mut log = log.write();
        log.push_back(record);
        while log.len() > self.max_per_endpoint {
            log.pop_front();
        }
    }

    /// Most recent `limit` records, newest first
    pub fn recent(&self, endpoint_id: EndpointId, limit: usize) -> Vec<AlertRecord> {
        match self.logs.get(&endpoint_id) {
            Some(log) => log.read().iter().rev().take(limit).cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn count(&self, endpoint_id: EndpointId) -> usize {
        self.logs
            .get(&endpoint_id)
            .map(|log| log.read().len())
            .unwrap_or(0)
    }

    pub fn remove_endpoint(&self, endpoint_id: EndpointId) -> bool {
        self.logs.remove(&endpoint_id).is_some()
    }

    /// Drop records older than `cutoff`; returns how many were removed
    pub fn prune_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        for entry in self.logs.iter() {
            let mut log = entry.value().write();
            while log.front().is_some_and(|a| a.created_at < cutoff) {
                log.pop_front();
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_push_and_recent_newest_first() {
        let history = AlertHistory::new(100);
        let base = Utc::now();

        history.push(AlertRecord::down(EndpointId(1), 3, base));
        history.push(AlertRecord::recovered(EndpointId(1), base + Duration::minutes(5)));

        let recent = history.recent(EndpointId(1), 10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].kind, AlertKind::Recovered);
        assert_eq!(recent[1].kind, AlertKind::Down);
        assert_eq!(recent[1].value, Some(3));
    }

    #[test]
    fn test_cap_drops_oldest() {
        let history = AlertHistory::new(2);
        let base = Utc::now();
        for i in 0..4 {
            history.push(AlertRecord::down(
                EndpointId(1),
                i + 1,
                base + Duration::seconds(i as i64),
            ));
        }

        assert_eq!(history.count(EndpointId(1)), 2);
        let recent = history.recent(EndpointId(1), 10);
        assert_eq!(recent[0].value, Some(4));
        assert_eq!(recent[1].value, Some(3));
    }

    #[test]
    fn test_remove_endpoint() {
        let history = AlertHistory::new(10);
        history.push(AlertRecord::recovered(EndpointId(1), Utc::now()));

        assert!(history.remove_endpoint(EndpointId(1)));
        assert_eq!(history.count(EndpointId(1)), 0);
    }

    #[test]
    fn test_prune_older_than() {
        let history = AlertHistory::new(10);
        let base = Utc::now();
        for i in 0..5 {
            history.push(AlertRecord::recovered(
                EndpointId(1),
                base + Duration::hours(i),
            ));
        }

        let removed = history.prune_older_than(base + Duration::hours(3));
        assert_eq!(removed, 3);
        assert_eq!(history.count(EndpointId(1)), 2);
    }
}
