//! Core value types shared across the engine

mod endpoint;
mod measurement;

pub use endpoint::{Endpoint, EndpointId, EndpointSummary, OwnerId};
pub use measurement::{Measurement, ProbeStatus};
