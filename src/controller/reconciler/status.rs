//! # Status Management
//!
//! Derives ApicurioRegistry status from the configuration store and patches it.

use crate::constants::FIELD_MANAGER;
use crate::controller::configuration::{ConfigKey, Configuration, ConfigurationError};
use crate::controller::reconciler::types::ReconcilerError;
use crate::crd::{ApicurioRegistry, ApicurioRegistryStatus, Condition};
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use tracing::debug;

pub const CONDITION_READY: &str = "Ready";
pub const REASON_RECONCILED: &str = "ReconciliationSucceeded";
pub const REASON_CONFIGURATION_INVALID: &str = "ConfigurationInvalid";

/// Build the Ready condition, keeping the previous transition time when the
/// condition status did not change
fn ready_condition(
    ready: bool,
    reason: &str,
    message: String,
    previous: Option<&ApicurioRegistryStatus>,
) -> Condition {
    let status = if ready { "True" } else { "False" };
    let last_transition_time = previous
        .and_then(|p| p.condition(CONDITION_READY))
        .filter(|c| c.status == status)
        .and_then(|c| c.last_transition_time.clone())
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

    Condition {
        r#type: CONDITION_READY.to_string(),
        status: status.to_string(),
        last_transition_time: Some(last_transition_time),
        reason: Some(reason.to_string()),
        message: Some(message),
    }
}

/// Status after a pass whose configuration was accepted
///
/// Scalar fields come from the store's status keys.
pub fn ready_status(
    configuration: &Configuration,
    previous: Option<&ApicurioRegistryStatus>,
    generation: Option<i64>,
) -> ApicurioRegistryStatus {
    let replica_count = configuration.get_config_i32(ConfigKey::StatusReplicaCount);
    let message = format!(
        "Registry is running {} with {} available replicas",
        configuration.get_config(ConfigKey::StatusImage),
        replica_count
    );

    ApicurioRegistryStatus {
        image: configuration.get_config(ConfigKey::StatusImage).to_string(),
        deployment_name: configuration
            .get_config(ConfigKey::StatusDeploymentName)
            .to_string(),
        service_name: configuration
            .get_config(ConfigKey::StatusServiceName)
            .to_string(),
        ingress_name: configuration
            .get_config(ConfigKey::StatusIngressName)
            .to_string(),
        replica_count,
        route: configuration.get_config(ConfigKey::StatusRoute).to_string(),
        conditions: vec![ready_condition(true, REASON_RECONCILED, message, previous)],
        observed_generation: generation,
    }
}

/// Status after a pass that recorded validation errors
///
/// Observed values from earlier passes are kept; only the condition changes.
pub fn invalid_status(
    errors: &[ConfigurationError],
    previous: Option<&ApicurioRegistryStatus>,
    generation: Option<i64>,
) -> ApicurioRegistryStatus {
    let message = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    ApicurioRegistryStatus {
        conditions: vec![ready_condition(
            false,
            REASON_CONFIGURATION_INVALID,
            message,
            previous,
        )],
        observed_generation: generation,
        ..previous.cloned().unwrap_or_default()
    }
}

/// Patch the resource status
/// Skipped when the status is unchanged, so no watch event is triggered
pub async fn patch_status(
    client: &Client,
    registry: &ApicurioRegistry,
    status: &ApicurioRegistryStatus,
) -> Result<(), ReconcilerError> {
    if registry.status.as_ref() == Some(status) {
        debug!("Skipping status update - status unchanged");
        return Ok(());
    }

    let namespace = registry
        .namespace()
        .ok_or(ReconcilerError::MissingObjectKey("metadata.namespace"))?;
    let api: Api<ApicurioRegistry> = Api::namespaced(client.clone(), &namespace);

    let patch = serde_json::json!({
        "status": serde_json::to_value(status)?
    });

    api.patch_status(
        &registry.name_any(),
        &PatchParams::apply(FIELD_MANAGER),
        &Patch::Merge(patch),
    )
    .await?;

    Ok(())
}
