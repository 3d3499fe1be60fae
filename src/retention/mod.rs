//! Retention: background pruning of aged measurements and alert records

mod worker;

pub use worker::{run_retention_pass, RetentionWorker};
