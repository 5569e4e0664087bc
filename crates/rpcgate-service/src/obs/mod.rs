//! Lightweight in-process metrics for the dispatch stack (dependency-free).

pub mod metrics;

pub use metrics::DispatchMetrics;
