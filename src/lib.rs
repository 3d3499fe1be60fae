//! Netpulse: Endpoint Health Monitoring Engine
//!
//! Repeatedly probes HTTP endpoints, retains bounded per-endpoint history,
//! computes rolling statistics, and evaluates a per-endpoint alert state
//! machine with hysteresis. Transport, auth, and presentation are external
//! collaborators that call into the engine and read its results.
//!
//! # Features
//!
//! - **Measurement Store**: append-only, per-endpoint bounded probe log
//! - **Health Prober**: bounded-timeout HTTP checks; network failures are
//!   outcomes, not errors
//! - **Stats Aggregator**: uptime percent and average latency over a trailing
//!   window, with a short-TTL snapshot cache
//! - **Alert Evaluator**: edge-triggered activation on failure streaks or
//!   latency breaches, single recovery record on the way back
//! - **Scheduler**: fixed-period parallel probe sweeps plus on-demand checks
//! - **Retention**: background pruning of aged measurements and alerts
//!
//! # Example
//!
//! ```no_run
//! use netpulse::engine::{MonitorConfig, MonitorEngine};
//! use netpulse::model::OwnerId;
//!
//! # async fn demo() -> Result<(), netpulse::engine::MonitorError> {
//! let engine = MonitorEngine::new(MonitorConfig::default());
//! let owner = OwnerId::from("local");
//!
//! let endpoint = engine.create_endpoint(&owner, "api", "https://example.com/health")?;
//! let report = engine.measure_now(&owner, endpoint.id).await?;
//! println!("status: {}", report.measurement.status);
//!
//! let stats = engine.stats(&owner, endpoint.id, 24)?;
//! println!("uptime: {:?}", stats.uptime_percent);
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod engine;
pub mod model;
pub mod probe;
pub mod retention;
pub mod scheduler;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use engine::{CheckReport, MonitorConfig, MonitorEngine, MonitorError};
pub use model::{Endpoint, EndpointId, Measurement, OwnerId, ProbeStatus};
pub use stats::StatsSnapshot;
