//! # Error Policy
//!
//! Requeue decision for failed reconciliations.

use crate::controller::reconciler::{Reconciler, ReconcilerError};
use crate::crd::ApicurioRegistry;
use crate::observability;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use tracing::{error, info};

/// Handle reconciliation errors with a fixed requeue delay
///
/// Kubernetes API failures are transient from the operator's point of view;
/// the next pass recomputes everything from the latest resource.
pub fn handle_reconciliation_error(
    registry: Arc<ApicurioRegistry>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = registry.name_any();
    let namespace = registry.namespace().unwrap_or_default();

    error!(
        resource.name = %name,
        resource.namespace = %namespace,
        error = %error,
        "Reconciliation error"
    );
    observability::metrics::increment_reconciliation_errors();

    let delay = ctx.config.error_requeue();
    info!(
        "Retrying {}/{} in {}s (trigger source: error-requeue)",
        namespace,
        name,
        delay.as_secs()
    );

    observability::metrics::increment_requeues_total("error");
    Action::requeue(delay)
}
