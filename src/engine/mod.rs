//! Monitoring engine facade and its configuration

mod config;
mod error;
mod monitor;
mod registry;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use monitor::{CheckReport, EndpointChange, MonitorEngine, PruneStats};
pub use registry::EndpointRegistry;
