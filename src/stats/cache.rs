//! Snapshot caching for repeated dashboard stats queries
//!
//! Uses moka for thread-safe concurrent caching with TTL-based expiration.
//! Stats are advisory, so a snapshot may be served up to the TTL stale; every
//! new measurement for an endpoint invalidates its entries early.

use std::time::Duration;

use moka::sync::Cache;

use super::aggregator::StatsSnapshot;
use crate::model::EndpointId;

/// Cache of computed snapshots keyed by endpoint and window size
pub struct StatsCache {
    cache: Cache<(EndpointId, u32), StatsSnapshot>,
}

impl StatsCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn get(&self, endpoint_id: EndpointId, window_hours: u32) -> Option<StatsSnapshot> {
        self.cache.get(&(endpoint_id, window_hours))
    }

    pub fn put(&self, endpoint_id: EndpointId, window_hours: u32, snapshot: StatsSnapshot) {
        self.cache.insert((endpoint_id, window_hours), snapshot);
    }

    /// Drop all cached windows for one endpoint (new measurement or delete)
    pub fn invalidate_endpoint(&self, endpoint_id: EndpointId) {
        let stale: Vec<(EndpointId, u32)> = self
            .cache
            .iter()
            .filter(|(key, _)| key.0 == endpoint_id)
            .map(|(key, _)| *key)
            .collect();

        for key in stale {
            self.cache.invalidate(&key);
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total: usize) -> StatsSnapshot {
        StatsSnapshot {
            window_hours: 24,
            uptime_percent: Some(100.0),
            avg_latency_ms: Some(50),
            total_checks: total,
        }
    }

    #[test]
    fn test_put_get() {
        let cache = StatsCache::new(16, Duration::from_secs(60));
        cache.put(EndpointId(1), 24, snapshot(5));

        let hit = cache.get(EndpointId(1), 24).unwrap();
        assert_eq!(hit.total_checks, 5);
        assert!(cache.get(EndpointId(1), 12).is_none());
        assert!(cache.get(EndpointId(2), 24).is_none());
    }

    #[test]
    fn test_invalidate_endpoint_spares_others() {
        let cache = StatsCache::new(16, Duration::from_secs(60));
        cache.put(EndpointId(1), 24, snapshot(1));
        cache.put(EndpointId(1), 12, snapshot(2));
        cache.put(EndpointId(2), 24, snapshot(3));

        cache.invalidate_endpoint(EndpointId(1));

        assert!(cache.get(EndpointId(1), 24).is_none());
        assert!(cache.get(EndpointId(1), 12).is_none());
        assert_eq!(cache.get(EndpointId(2), 24).unwrap().total_checks, 3);
    }
}
