//! Engine error taxonomy
//!
//! Validation failures are rejected before any state mutation. An endpoint
//! owned by someone else is indistinguishable from a missing one. Probe
//! failures never appear here: they are recorded as DOWN measurements.

use crate::alerts::ConfigError;
use crate::probe::ProbeError;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Endpoint not found")]
    NotFound,

    #[error("Endpoint name must not be empty")]
    EmptyName,

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Stats window must be at least 1 hour")]
    ZeroWindow,

    #[error(transparent)]
    Url(#[from] ProbeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
