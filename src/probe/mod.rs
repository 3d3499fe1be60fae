//! Health Prober: issues one bounded network check against an endpoint URL

mod http;

pub use http::{validate_url, HttpProber, ProbeError, ProbeOutcome, Prober};
