//! Periodic probe scheduler
//!
//! Each tick spawns one probe task per endpoint, so a slow endpoint never
//! delays the others. Per-endpoint pipeline failures are logged and skipped;
//! the next tick retries them. Serialization with manual `measure_now` calls
//! happens inside the engine, per endpoint.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time;

use crate::engine::MonitorEngine;
use crate::model::ProbeStatus;

/// Counts from one scheduler sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub checked: usize,
    pub up: usize,
    pub down: usize,
    /// Pipeline errors (endpoint deleted mid-flight, task failure)
    pub skipped: usize,
}

/// Probe every registered endpoint once, in parallel
pub async fn run_cycle(engine: &Arc<MonitorEngine>) -> CycleSummary {
    let ids = engine.endpoint_ids();
    let mut summary = CycleSummary::default();

    let tasks: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let engine = Arc::clone(engine);
            tokio::spawn(async move { (id, engine.run_check(id).await) })
        })
        .collect();

    for joined in join_all(tasks).await {
        match joined {
            Ok((id, Ok(report))) => {
                summary.checked += 1;
                match report.measurement.status {
                    ProbeStatus::Up => summary.up += 1,
                    ProbeStatus::Down => summary.down += 1,
                }
                tracing::debug!(
                    endpoint_id = %id,
                    status = %report.measurement.status,
                    latency_ms = ?report.measurement.latency_ms,
                    "Endpoint checked"
                );
            }
            Ok((id, Err(e))) => {
                summary.skipped += 1;
                tracing::warn!(endpoint_id = %id, error = %e, "Check skipped");
            }
            Err(e) => {
                summary.skipped += 1;
                tracing::error!(error = %e, "Probe task failed");
            }
        }
    }

    summary
}

/// Background worker driving `run_cycle` on a fixed period
pub struct SchedulerWorker {
    engine: Arc<MonitorEngine>,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl SchedulerWorker {
    pub fn new(engine: Arc<MonitorEngine>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the background worker
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            tracing::info!("Scheduler started with interval {:?}", self.interval);

            let mut ticker = time::interval(self.interval);

            while self.running.load(Ordering::SeqCst) {
                ticker.tick().await;

                if self.engine.endpoint_count() == 0 {
                    tracing::debug!("No endpoints registered, skipping cycle");
                    continue;
                }

                let summary = run_cycle(&self.engine).await;
                tracing::info!(
                    checked = summary.checked,
                    up = summary.up,
                    down = summary.down,
                    skipped = summary.skipped,
                    "Probe cycle complete"
                );
            }

            tracing::info!("Scheduler stopped");
        })
    }

    /// Stop the worker
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if worker is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MonitorConfig;
    use crate::model::OwnerId;
    use crate::probe::{ProbeError, ProbeOutcome, Prober};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Prober scripted per URL; unknown URLs come back refused
    struct ScriptedProber {
        outcomes: HashMap<String, ProbeOutcome>,
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
            Ok(self
                .outcomes
                .get(url)
                .cloned()
                .unwrap_or_else(|| ProbeOutcome::down(None, "connection refused")))
        }
    }

    fn scripted_engine(outcomes: HashMap<String, ProbeOutcome>) -> Arc<MonitorEngine> {
        Arc::new(MonitorEngine::with_prober(
            MonitorConfig::default(),
            Arc::new(ScriptedProber { outcomes }),
        ))
    }

    #[tokio::test]
    async fn test_cycle_probes_every_endpoint() {
        let owner = OwnerId::from("alice");
        let engine = scripted_engine(HashMap::from([
            ("http://a.example".to_string(), ProbeOutcome::up(20)),
            (
                "http://b.example".to_string(),
                ProbeOutcome::down(Some(30), "HTTP 500"),
            ),
        ]));

        let a = engine
            .create_endpoint(&owner, "a", "http://a.example")
            .unwrap();
        let b = engine
            .create_endpoint(&owner, "b", "http://b.example")
            .unwrap();

        let summary = run_cycle(&engine).await;
        assert_eq!(summary.checked, 2);
        assert_eq!(summary.up, 1);
        assert_eq!(summary.down, 1);
        assert_eq!(summary.skipped, 0);

        assert_eq!(engine.history(&owner, a.id, 10).unwrap().len(), 1);
        assert_eq!(engine.history(&owner, b.id, 10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_cycles_drive_alerting() {
        let owner = OwnerId::from("alice");
        let engine = scripted_engine(HashMap::new()); // everything refused
        let ep = engine
            .create_endpoint(&owner, "dead", "http://dead.example")
            .unwrap();

        for _ in 0..3 {
            run_cycle(&engine).await;
        }

        let cfg = engine.alert_config(&owner, ep.id).unwrap();
        assert!(cfg.alert_active);
        assert_eq!(cfg.consecutive_failures, 3);
        assert_eq!(engine.alerts(&owner, ep.id, 10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_engine_cycle_is_noop() {
        let engine = scripted_engine(HashMap::new());
        let summary = run_cycle(&engine).await;
        assert_eq!(summary, CycleSummary::default());
    }

    #[tokio::test]
    async fn test_worker_start_stop() {
        let engine = scripted_engine(HashMap::new());
        let worker = Arc::new(SchedulerWorker::new(engine, Duration::from_millis(10)));

        let handle = Arc::clone(&worker).start();
        assert!(worker.is_running());

        tokio::time::sleep(Duration::from_millis(30)).await;
        worker.stop();
        assert!(!worker.is_running());
        let _ = handle.await;
    }
}
