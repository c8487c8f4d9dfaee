//! # Controller Metrics
//!
//! Metrics for reconciliations, configuration validation and requeues.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{Histogram, IntCounter, IntCounterVec, IntGauge};
use std::sync::LazyLock;

// Reconciliation metrics
static RECONCILIATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "registry_operator_reconciliations_total",
        "Total number of reconciliations",
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "registry_operator_reconciliation_errors_total",
        "Total number of reconciliation errors",
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "registry_operator_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

// Configuration metrics
static CONFIGURATION_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "registry_operator_configuration_errors_total",
        "Total number of rejected configuration values",
    )
    .expect("Failed to create CONFIGURATION_ERRORS_TOTAL metric - this should never happen")
});

static ENV_CHANGES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "registry_operator_env_changes_total",
        "Total number of reconciliations that changed the registry environment",
    )
    .expect("Failed to create ENV_CHANGES_TOTAL metric - this should never happen")
});

static REGISTRIES_MANAGED: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "registry_operator_registries_managed",
        "Current number of registries with a configuration store",
    )
    .expect("Failed to create REGISTRIES_MANAGED metric - this should never happen")
});

// Requeue metrics
static REQUEUES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "registry_operator_requeues_total",
            "Total number of reconciliation requeues",
        ),
        &["reason"],
    )
    .expect("Failed to create REQUEUES_TOTAL metric - this should never happen")
});

/// Register controller metrics with the registry
pub(crate) fn register_controller_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(CONFIGURATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ENV_CHANGES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REGISTRIES_MANAGED.clone()))?;
    REGISTRY.register(Box::new(REQUEUES_TOTAL.clone()))?;
    Ok(())
}

pub fn increment_reconciliations() {
    RECONCILIATIONS_TOTAL.inc();
}

pub fn increment_reconciliation_errors() {
    RECONCILIATION_ERRORS_TOTAL.inc();
}

pub fn observe_reconciliation_duration(duration: f64) {
    RECONCILIATION_DURATION.observe(duration);
}

pub fn increment_configuration_errors(count: usize) {
    #[allow(clippy::cast_possible_truncation, reason = "Error counts per pass are tiny")]
    let count_u64 = count as u64;
    CONFIGURATION_ERRORS_TOTAL.inc_by(count_u64);
}

pub fn increment_env_changes() {
    ENV_CHANGES_TOTAL.inc();
}

pub fn set_registries_managed(count: usize) {
    #[allow(clippy::cast_possible_wrap, reason = "Store count never approaches i64::MAX")]
    let count_i64 = count as i64;
    REGISTRIES_MANAGED.set(count_i64);
}

pub fn increment_requeues_total(reason: &str) {
    REQUEUES_TOTAL.with_label_values(&[reason]).inc();
}
