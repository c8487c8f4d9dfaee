//! # Observability
//!
//! Prometheus metrics for monitoring the operator.

pub mod metrics;
