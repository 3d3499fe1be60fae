//! Netpulse daemon
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - NETPULSE_POLL_INTERVAL_SECS: Seconds between probe sweeps (default: 60)
//! - NETPULSE_PROBE_TIMEOUT_SECS: Per-request probe timeout (default: 5)
//! - NETPULSE_RETENTION_HOURS: Hours of history to retain (default: 72)
//! - NETPULSE_ENDPOINTS_FILE: JSON seed file of endpoints: [{"name", "url"}]
//! - NETPULSE_OWNER: Owner id for seeded endpoints (default: local)
//! - RUST_LOG: Log level (default: netpulse=info)

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netpulse::engine::{MonitorConfig, MonitorEngine};
use netpulse::model::OwnerId;
use netpulse::retention::RetentionWorker;
use netpulse::scheduler::SchedulerWorker;

/// One entry of the seed file
#[derive(Debug, Deserialize)]
struct SeedEndpoint {
    name: String,
    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netpulse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration from environment
    let poll_interval_secs: u64 = std::env::var("NETPULSE_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60);
    let probe_timeout_secs: u64 = std::env::var("NETPULSE_PROBE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);
    let retention_hours: u64 = std::env::var("NETPULSE_RETENTION_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(72);

    let config = MonitorConfig::default()
        .with_poll_interval(Duration::from_secs(poll_interval_secs))
        .with_probe_timeout(Duration::from_secs(probe_timeout_secs))
        .with_retention(Duration::from_secs(retention_hours * 3600));

    tracing::info!("Netpulse configuration:");
    tracing::info!("  Poll interval: {} seconds", poll_interval_secs);
    tracing::info!("  Probe timeout: {} seconds", probe_timeout_secs);
    tracing::info!("  Retention: {} hours", retention_hours);

    let engine = Arc::new(MonitorEngine::new(config.clone()));

    // Seed endpoints from file, if configured
    if let Ok(path) = std::env::var("NETPULSE_ENDPOINTS_FILE") {
        let owner = OwnerId::new(
            std::env::var("NETPULSE_OWNER").unwrap_or_else(|_| "local".to_string()),
        );
        let raw = std::fs::read_to_string(&path)?;
        let seeds: Vec<SeedEndpoint> = serde_json::from_str(&raw)?;

        for seed in seeds {
            match engine.create_endpoint(&owner, &seed.name, &seed.url) {
                Ok(endpoint) => {
                    tracing::info!(endpoint_id = %endpoint.id, name = %endpoint.name, "Seeded endpoint");
                }
                Err(e) => {
                    tracing::warn!(name = %seed.name, url = %seed.url, error = %e, "Skipping invalid seed endpoint");
                }
            }
        }
        tracing::info!(
            "Seeded {} endpoints from {}",
            engine.endpoint_count(),
            path
        );
    } else {
        tracing::info!("No NETPULSE_ENDPOINTS_FILE set, starting with an empty registry");
    }

    // Start background workers
    let scheduler = Arc::new(SchedulerWorker::new(
        Arc::clone(&engine),
        config.poll_interval,
    ));
    let scheduler_handle = Arc::clone(&scheduler).start();

    let retention = Arc::new(RetentionWorker::new(
        Arc::clone(&engine),
        config.retention_check_interval,
    ));
    let retention_handle = Arc::clone(&retention).start();

    tracing::info!("Netpulse {} running, press ctrl-c to stop", env!("CARGO_PKG_VERSION"));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    scheduler.stop();
    retention.stop();
    let _ = scheduler_handle.await;
    let _ = retention_handle.await;

    Ok(())
}
