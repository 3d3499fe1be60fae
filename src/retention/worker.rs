//! Retention worker that periodically prunes aged data

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::engine::{MonitorEngine, PruneStats};

/// Background worker dropping measurements and alerts past the retention horizon
pub struct RetentionWorker {
    engine: Arc<MonitorEngine>,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl RetentionWorker {
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
            tracing::info!("Retention worker started with interval {:?}", self.interval);

            let mut ticker = time::interval(self.interval);

            while self.running.load(Ordering::SeqCst) {
                ticker.tick().await;

                let stats = run_retention_pass(&self.engine);
                if !stats.is_empty() {
                    tracing::info!(
                        measurements = stats.measurements_removed,
                        alerts = stats.alerts_removed,
                        "Retention pass pruned aged records"
                    );
                }
            }

            tracing::info!("Retention worker stopped");
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

/// Run one retention pass (for manual/testing use)
pub fn run_retention_pass(engine: &MonitorEngine) -> PruneStats {
    engine.prune(chrono::Utc::now())
}
