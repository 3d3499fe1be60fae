//! Measurement Store: per-endpoint bounded, append-only probe history

mod measurements;

pub use measurements::MeasurementStore;
