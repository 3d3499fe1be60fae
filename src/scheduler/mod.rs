//! Scheduler: periodic probe sweep over all registered endpoints

mod worker;

pub use worker::{run_cycle, CycleSummary, SchedulerWorker};
