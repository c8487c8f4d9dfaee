//! # Reconcile
//!
//! One reconciliation pass of an ApicurioRegistry resource: re-derive the
//! configuration, report validation errors, apply the managed objects and
//! write the observed state back into status. Deletion releases the
//! resource's store before the finalizer is dropped.

use crate::constants::FIELD_MANAGER;
use crate::controller::configuration::{ConfigKey, Configuration};
use crate::controller::deployment::{
    deployment_name, render_deployment, render_service, service_name,
};
use crate::controller::reconciler::{finalizer, status};
use crate::controller::reconciler::types::{Reconciler, ReconcilerError};
use crate::crd::ApicurioRegistry;
use crate::observability;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::api::{Patch, PatchParams};
use kube::{Api, Resource, ResourceExt};
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};

/// Reconcile one ApicurioRegistry
///
/// Invalid configuration is not an error: it is reported through the Ready
/// condition and the resource is requeued at the normal interval.
pub async fn reconcile(
    registry: Arc<ApicurioRegistry>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let span = tracing::info_span!(
        "registry.reconcile",
        resource.name = %registry.name_any(),
        resource.namespace = %registry.namespace().unwrap_or_default(),
        resource.generation = ?registry.metadata.generation,
    );
    let start = Instant::now();
    observability::metrics::increment_reconciliations();

    let result = reconcile_registry(registry, &ctx).instrument(span).await;

    observability::metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());
    result
}

/// What a pass does with the resource as observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RegistryAction {
    /// First sighting: add the finalizer, then sync
    Create,
    /// Regular pass
    Sync,
    /// Being deleted: release the store, then the finalizer if we hold it
    Delete { remove_finalizer: bool },
}

pub(crate) fn determine_action(registry: &ApicurioRegistry) -> RegistryAction {
    if registry.meta().deletion_timestamp.is_some() {
        RegistryAction::Delete {
            remove_finalizer: finalizer::has_finalizer(registry),
        }
    } else if finalizer::has_finalizer(registry) {
        RegistryAction::Sync
    } else {
        RegistryAction::Create
    }
}

/// Outcome of deriving the configuration for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PassPlan {
    /// Validation failed; report in status and leave the managed objects alone
    ReportInvalid,
    /// Apply the managed objects
    Apply { env_changed: bool },
}

pub(crate) fn plan_pass(configuration: &Configuration) -> PassPlan {
    if configuration.pass_errors().is_empty() {
        PassPlan::Apply {
            env_changed: configuration.env_changed(),
        }
    } else {
        PassPlan::ReportInvalid
    }
}

async fn reconcile_registry(
    registry: Arc<ApicurioRegistry>,
    ctx: &Reconciler,
) -> Result<Action, ReconcilerError> {
    let name = registry.name_any();
    let namespace = registry
        .namespace()
        .ok_or(ReconcilerError::MissingObjectKey("metadata.namespace"))?;
    let key = format!("{namespace}/{name}");

    match determine_action(&registry) {
        RegistryAction::Delete { remove_finalizer } => {
            info!("Registry is being deleted, dropping its configuration");
            ctx.stores.forget(&key);
            if remove_finalizer {
                finalizer::remove(&ctx.client, &registry).await?;
            }
            return Ok(Action::await_change());
        }
        RegistryAction::Create => {
            debug!("Adding finalizer");
            finalizer::add(&ctx.client, &registry).await?;
        }
        RegistryAction::Sync => {}
    }

    let store = ctx.stores.store_for(&key, registry.meta().uid.as_deref());
    let mut configuration = store.lock().await;
    configuration.update(Arc::clone(&registry));

    match plan_pass(&configuration) {
        PassPlan::ReportInvalid => {
            let pass_errors = configuration.pass_errors();
            for error in pass_errors {
                warn!(error = %error, "Registry configuration rejected");
            }
            observability::metrics::increment_configuration_errors(pass_errors.len());
            let status = status::invalid_status(
                pass_errors,
                registry.status.as_ref(),
                registry.metadata.generation,
            );
            status::patch_status(&ctx.client, &registry, &status).await?;
            observability::metrics::increment_requeues_total("invalid-configuration");
            return Ok(Action::requeue(ctx.config.reconcile_interval()));
        }
        PassPlan::Apply { env_changed: true } => {
            info!("Registry environment changed, pods will be rolled");
            observability::metrics::increment_env_changes();
        }
        PassPlan::Apply { env_changed: false } => {}
    }

    let owner = registry.controller_owner_ref(&());
    let params = PatchParams::apply(FIELD_MANAGER).force();

    let deployment_name = deployment_name(&name);
    let deployments: Api<Deployment> = Api::namespaced(ctx.client.clone(), &namespace);
    let deployment = render_deployment(&configuration, owner.as_ref());
    let applied = deployments
        .patch(&deployment_name, &params, &Patch::Apply(&deployment))
        .await?;
    debug!(deployment = %deployment_name, "Applied registry deployment");

    let service_name = service_name(&name);
    let services: Api<Service> = Api::namespaced(ctx.client.clone(), &namespace);
    let service = render_service(&configuration, owner.as_ref());
    services
        .patch(&service_name, &params, &Patch::Apply(&service))
        .await?;
    debug!(service = %service_name, "Applied registry service");

    // Write the observed state back so status reporting reads one source
    let image = configuration.image();
    configuration.set_config(ConfigKey::StatusImage, image);
    configuration.set_config(ConfigKey::StatusDeploymentName, deployment_name);
    configuration.set_config(ConfigKey::StatusServiceName, service_name);
    configuration.clear_config(ConfigKey::StatusIngressName);
    let available_replicas = applied
        .status
        .and_then(|s| s.available_replicas)
        .unwrap_or(0);
    configuration.set_config_i32(ConfigKey::StatusReplicaCount, available_replicas);
    let route = configuration.get_config(ConfigKey::Route).to_string();
    if route.is_empty() {
        configuration.clear_config(ConfigKey::StatusRoute);
    } else {
        configuration.set_config(ConfigKey::StatusRoute, route);
    }

    let status = status::ready_status(
        &configuration,
        registry.status.as_ref(),
        registry.metadata.generation,
    );
    status::patch_status(&ctx.client, &registry, &status).await?;

    observability::metrics::increment_requeues_total("periodic");
    Ok(Action::requeue(ctx.config.reconcile_interval()))
}
