//! Stats Aggregator: rolling uptime and latency over a trailing window

mod aggregator;
mod cache;

pub use aggregator::{compute_stats, StatsSnapshot};
pub use cache::StatsCache;
