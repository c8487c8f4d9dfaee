//! # Watch Loop
//!
//! Runs the kube-runtime controller for ApicurioRegistry resources.

use crate::controller::reconciler::{reconcile, Reconciler};
use crate::crd::ApicurioRegistry;
use crate::runtime::error_policy::handle_reconciliation_error;
use anyhow::Result;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use kube::Api;
use kube_runtime::{watcher, Controller};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Watch registries and the Deployments they own until shutdown
///
/// Deployment changes requeue the owning registry, so replica counts in
/// status follow the rollout.
pub async fn run_watch_loop(
    registries: Api<ApicurioRegistry>,
    deployments: Api<Deployment>,
    reconciler: Arc<Reconciler>,
) -> Result<()> {
    info!("Starting ApicurioRegistry watch loop");

    Controller::new(registries, watcher::Config::default())
        .owns(deployments, watcher::Config::default())
        .shutdown_on_signal()
        .run(reconcile, handle_reconciliation_error, reconciler)
        .for_each(|result| async move {
            match result {
                Ok((object, _action)) => {
                    debug!(
                        resource.name = %object.name,
                        resource.namespace = ?object.namespace,
                        "reconciliation.success"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Controller stream error");
                }
            }
        })
        .await;

    info!("Watch loop stopped");
    Ok(())
}
