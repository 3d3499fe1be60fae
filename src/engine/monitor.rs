//! Monitoring engine facade
//!
//! Composes the registry, measurement store, alert state, prober, and stats
//! cache behind the caller-facing operations. Every endpoint-scoped operation
//! takes the caller's owner id; a foreign endpoint behaves exactly like a
//! missing one.
//!
//! Per-endpoint exclusion: each endpoint's alert config lives behind its own
//! `Mutex`, and record + evaluate (and threshold updates, and cascade delete)
//! run under it. The critical section never awaits, so a sync mutex is safe;
//! probing happens before acquisition. Distinct endpoints proceed in parallel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::alerts::{evaluate, AlertConfig, AlertConfigUpdate, AlertHistory, AlertRecord};
use crate::model::{Endpoint, EndpointId, EndpointSummary, Measurement, OwnerId};
use crate::probe::{validate_url, HttpProber, ProbeOutcome, Prober};
use crate::stats::{compute_stats, StatsCache, StatsSnapshot};
use crate::store::MeasurementStore;

use super::config::MonitorConfig;
use super::error::MonitorError;
use super::registry::EndpointRegistry;

/// Result of one probe → record → evaluate pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub measurement: Measurement,
    /// The state transition this measurement caused, if any
    pub alert: Option<AlertRecord>,
}

/// Partial endpoint update; at least one field must be present
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointChange {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Outcome of one retention pass
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PruneStats {
    pub measurements_removed: usize,
    pub alerts_removed: usize,
}

impl PruneStats {
    pub fn is_empty(&self) -> bool {
        self.measurements_removed == 0 && self.alerts_removed == 0
    }
}

/// The health-monitoring engine
pub struct MonitorEngine {
    config: MonitorConfig,
    registry: EndpointRegistry,
    store: MeasurementStore,
    /// One exclusive scope per endpoint; guards record + evaluate
    alert_configs: dashmap::DashMap<EndpointId, Arc<Mutex<AlertConfig>>>,
    alerts: AlertHistory,
    prober: Arc<dyn Prober>,
    stats_cache: StatsCache,
}

impl MonitorEngine {
    pub fn new(config: MonitorConfig) -> Self {
        let prober = Arc::new(HttpProber::new(config.probe_timeout));
        Self::with_prober(config, prober)
    }

    /// Build with a custom prober (the test seam)
    pub fn with_prober(config: MonitorConfig, prober: Arc<dyn Prober>) -> Self {
        Self {
            store: MeasurementStore::new(config.max_measurements_per_endpoint),
            alerts: AlertHistory::new(config.max_alerts_per_endpoint),
            stats_cache: StatsCache::new(config.stats_cache_capacity, config.stats_cache_ttl),
            registry: EndpointRegistry::new(),
            alert_configs: dashmap::DashMap::new(),
            prober,
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    // === Endpoint CRUD ===

    /// Register a new endpoint after validating name and URL
    pub fn create_endpoint(
        &self,
        owner: &OwnerId,
        name: &str,
        url: &str,
    ) -> Result<Endpoint, MonitorError> {
        if name.trim().is_empty() {
            return Err(MonitorError::EmptyName);
        }
        validate_url(url)?;

        let endpoint = self
            .registry
            .create(owner.clone(), name.to_string(), url.to_string());
        tracing::info!(endpoint_id = %endpoint.id, name = %endpoint.name, url = %endpoint.url, "Endpoint created");
        Ok(endpoint)
    }

    /// Rename and/or re-target an endpoint; a change with no fields is invalid
    pub fn update_endpoint(
        &self,
        owner: &OwnerId,
        id: EndpointId,
        change: EndpointChange,
    ) -> Result<Endpoint, MonitorError> {
        if change.name.is_none() && change.url.is_none() {
            return Err(MonitorError::NoFieldsToUpdate);
        }
        if let Some(name) = &change.name {
            if name.trim().is_empty() {
                return Err(MonitorError::EmptyName);
            }
        }
        if let Some(url) = &change.url {
            validate_url(url)?;
        }

        self.registry
            .get_owned(owner, id)
            .ok_or(MonitorError::NotFound)?;
        self.registry
            .update(id, change.name, change.url)
            .ok_or(MonitorError::NotFound)
    }

    /// Delete an endpoint and cascade-delete its measurements, alert config,
    /// and alert records. Serialized against in-flight evaluation so a probe
    /// landing mid-delete cannot resurrect state.
    pub fn delete_endpoint(&self, owner: &OwnerId, id: EndpointId) -> Result<(), MonitorError> {
        self.registry
            .get_owned(owner, id)
            .ok_or(MonitorError::NotFound)?;

        if let Some(slot) = self.alert_configs.get(&id).map(|s| Arc::clone(&s)) {
            let _guard = slot.lock();
            self.registry.remove(id);
        } else {
            self.registry.remove(id);
        }

        self.store.remove_endpoint(id);
        self.alerts.remove_endpoint(id);
        self.alert_configs.remove(&id);
        self.stats_cache.invalidate_endpoint(id);
        tracing::info!(endpoint_id = %id, "Endpoint deleted");
        Ok(())
    }

    /// All endpoints for the caller, id order
    pub fn list_endpoints(&self, owner: &OwnerId) -> Vec<Endpoint> {
        self.registry.list_owned(owner)
    }

    /// Dashboard main-table rows: latest measurement plus alert flag
    pub fn summaries(&self, owner: &OwnerId) -> Vec<EndpointSummary> {
        self.registry
            .list_owned(owner)
            .into_iter()
            .map(|endpoint| {
                let last = self.store.last(endpoint.id);
                let alert = self
                    .alert_configs
                    .get(&endpoint.id)
                    .map(|slot| slot.lock().alert_active)
                    .unwrap_or(false);

                EndpointSummary {
                    id: endpoint.id,
                    name: endpoint.name,
                    url: endpoint.url,
                    last_status: last.as_ref().map(|m| m.status),
                    last_latency_ms: last.as_ref().and_then(|m| m.latency_ms),
                    last_observed_at: last.as_ref().map(|m| m.observed_at),
                    alert,
                }
            })
            .collect()
    }

    // === Measurement pipeline ===

    /// Probe an endpoint immediately and run the full pipeline.
    /// Returns once the measurement is recorded and evaluated.
    pub async fn measure_now(
        &self,
        owner: &OwnerId,
        id: EndpointId,
    ) -> Result<CheckReport, MonitorError> {
        let endpoint = self
            .registry
            .get_owned(owner, id)
            .ok_or(MonitorError::NotFound)?;
        let outcome = self.prober.probe(&endpoint.url).await?;
        self.apply_outcome(id, outcome)
    }

    /// Scheduler path: probe by id without an ownership check
    pub async fn run_check(&self, id: EndpointId) -> Result<CheckReport, MonitorError> {
        let endpoint = self.registry.get(id).ok_or(MonitorError::NotFound)?;
        let outcome = self.prober.probe(&endpoint.url).await?;
        self.apply_outcome(id, outcome)
    }

    /// Record a probe outcome and evaluate alert state under the endpoint's
    /// exclusive scope. Also the ingestion path for externally collected
    /// results.
    pub fn apply_outcome(
        &self,
        id: EndpointId,
        outcome: ProbeOutcome,
    ) -> Result<CheckReport, MonitorError> {
        let slot = self.config_slot(id);
        let mut cfg = slot.lock();

        // The endpoint may have been deleted while the probe was in flight;
        // re-check under the lock so nothing is written for a dead endpoint.
        if !self.registry.contains(id) {
            drop(cfg);
            self.alert_configs.remove(&id);
            return Err(MonitorError::NotFound);
        }

        let measurement =
            self.store
                .record(id, outcome.status, outcome.latency_ms, outcome.error);
        let alert = evaluate(&mut cfg, &measurement);

        // The history push stays inside the critical section: a cascade
        // delete serializes on the same slot, so it cannot land between the
        // evaluation and the push and leave an orphaned record behind.
        if let Some(record) = &alert {
            match record.kind {
                crate::alerts::AlertKind::Recovered => {
                    tracing::info!(endpoint_id = %id, "Alert resolved: {}", record.message);
                }
                _ => {
                    tracing::warn!(endpoint_id = %id, kind = %record.kind, "Alert raised: {}", record.message);
                }
            }
            self.alerts.push(record.clone());
        }
        drop(cfg);

        self.stats_cache.invalidate_endpoint(id);
        Ok(CheckReport { measurement, alert })
    }

    /// Most recent measurements, newest first
    pub fn history(
        &self,
        owner: &OwnerId,
        id: EndpointId,
        limit: usize,
    ) -> Result<Vec<Measurement>, MonitorError> {
        self.registry
            .get_owned(owner, id)
            .ok_or(MonitorError::NotFound)?;
        Ok(self.store.recent(id, limit))
    }

    // === Stats ===

    /// Stats over the trailing window, served from cache when fresh
    pub fn stats(
        &self,
        owner: &OwnerId,
        id: EndpointId,
        window_hours: u32,
    ) -> Result<StatsSnapshot, MonitorError> {
        if window_hours == 0 {
            return Err(MonitorError::ZeroWindow);
        }
        self.registry
            .get_owned(owner, id)
            .ok_or(MonitorError::NotFound)?;

        if let Some(snapshot) = self.stats_cache.get(id, window_hours) {
            return Ok(snapshot);
        }

        let cutoff = Utc::now() - chrono::Duration::hours(window_hours as i64);
        let window = self.store.since(id, cutoff);
        let snapshot = compute_stats(&window, window_hours);
        self.stats_cache.put(id, window_hours, snapshot.clone());
        Ok(snapshot)
    }

    // === Alert config and history ===

    /// Fetch the endpoint's alert config, lazily creating it with defaults
    pub fn alert_config(
        &self,
        owner: &OwnerId,
        id: EndpointId,
    ) -> Result<AlertConfig, MonitorError> {
        self.registry
            .get_owned(owner, id)
            .ok_or(MonitorError::NotFound)?;
        Ok(self.config_slot(id).lock().clone())
    }

    /// Update the two user-editable thresholds; counters and state pass
    /// through untouched, and no transition is triggered.
    pub fn update_alert_config(
        &self,
        owner: &OwnerId,
        id: EndpointId,
        update: AlertConfigUpdate,
    ) -> Result<AlertConfig, MonitorError> {
        update.validate()?;
        self.registry
            .get_owned(owner, id)
            .ok_or(MonitorError::NotFound)?;

        let slot = self.config_slot(id);
        let mut cfg = slot.lock();
        cfg.latency_threshold_ms = update.latency_threshold_ms;
        cfg.consecutive_fail_threshold = update.consecutive_fail_threshold;
        Ok(cfg.clone())
    }

    /// Most recent alert records, newest first
    pub fn alerts(
        &self,
        owner: &OwnerId,
        id: EndpointId,
        limit: usize,
    ) -> Result<Vec<AlertRecord>, MonitorError> {
        self.registry
            .get_owned(owner, id)
            .ok_or(MonitorError::NotFound)?;
        Ok(self.alerts.recent(id, limit))
    }

    // === Scheduler / retention support ===

    pub fn endpoint_ids(&self) -> Vec<EndpointId> {
        self.registry.ids()
    }

    pub fn endpoint_count(&self) -> usize {
        self.registry.len()
    }

    /// Drop measurements and alert records older than the retention horizon
    pub fn prune(&self, now: DateTime<Utc>) -> PruneStats {
        let cutoff = now - chrono::Duration::seconds(self.config.retention.as_secs() as i64);
        PruneStats {
            measurements_removed: self.store.prune_older_than(cutoff),
            alerts_removed: self.alerts.prune_older_than(cutoff),
        }
    }

    /// Get or lazily create the endpoint's exclusive alert-config slot.
    /// The entry API makes creation atomic, so no duplicate configs.
    fn config_slot(&self, id: EndpointId) -> Arc<Mutex<AlertConfig>> {
        Arc::clone(&self.alert_configs.entry(id).or_insert_with(|| {
            Arc::new(Mutex::new(AlertConfig::new(
                self.config.default_latency_threshold_ms,
                self.config.default_fail_threshold,
            )))
        }))
    }
}
