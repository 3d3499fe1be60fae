//! Alert Evaluator: per-endpoint hysteresis state machine and alert history

mod config;
mod evaluator;
mod history;

pub use config::{AlertConfig, AlertConfigUpdate, ConfigError};
pub use evaluator::evaluate;
pub use history::{AlertHistory, AlertKind, AlertRecord};
