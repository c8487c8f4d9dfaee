//! # Finalizer
//!
//! Adds and removes the operator finalizer on ApicurioRegistry resources.
//! Merge patches replace the whole list, so other finalizers are carried over.

use crate::constants::FINALIZER;
use crate::controller::reconciler::types::ReconcilerError;
use crate::crd::ApicurioRegistry;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, Resource, ResourceExt};
use serde_json::json;

/// Whether the resource carries the operator finalizer
pub fn has_finalizer(registry: &ApicurioRegistry) -> bool {
    registry.finalizers().iter().any(|f| f == FINALIZER)
}

/// Finalizer list with the operator finalizer appended
fn with_finalizer(registry: &ApicurioRegistry) -> Vec<String> {
    let mut finalizers = registry.finalizers().to_vec();
    if !has_finalizer(registry) {
        finalizers.push(FINALIZER.to_string());
    }
    finalizers
}

/// Finalizer list with the operator finalizer removed
fn without_finalizer(registry: &ApicurioRegistry) -> Vec<String> {
    registry
        .finalizers()
        .iter()
        .filter(|f| f.as_str() != FINALIZER)
        .cloned()
        .collect()
}

pub async fn add(client: &Client, registry: &ApicurioRegistry) -> Result<(), ReconcilerError> {
    patch_finalizers(client, registry, with_finalizer(registry)).await
}

pub async fn remove(client: &Client, registry: &ApicurioRegistry) -> Result<(), ReconcilerError> {
    patch_finalizers(client, registry, without_finalizer(registry)).await
}

async fn patch_finalizers(
    client: &Client,
    registry: &ApicurioRegistry,
    finalizers: Vec<String>,
) -> Result<(), ReconcilerError> {
    let namespace = registry
        .namespace()
        .ok_or(ReconcilerError::MissingObjectKey("metadata.namespace"))?;
    let api: Api<ApicurioRegistry> = Api::namespaced(client.clone(), &namespace);

    let mut patch = json!({ "metadata": { "finalizers": finalizers } });
    // resourceVersion guards against dropping a finalizer added concurrently
    if let Some(resource_version) = &registry.meta().resource_version {
        patch["metadata"]["resourceVersion"] = json!(resource_version);
    }
    api.patch(&registry.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::ApicurioRegistrySpec;

    fn registry(finalizers: &[&str]) -> ApicurioRegistry {
        let mut registry = ApicurioRegistry::new("example", ApicurioRegistrySpec::default());
        registry.metadata.finalizers = Some(finalizers.iter().map(ToString::to_string).collect());
        registry
    }

    #[test]
    fn test_add_keeps_foreign_finalizers() {
        let registry = registry(&["example.com/other"]);
        assert!(!has_finalizer(&registry));
        assert_eq!(
            with_finalizer(&registry),
            vec!["example.com/other".to_string(), FINALIZER.to_string()]
        );
    }

    #[test]
    fn test_add_is_idempotent() {
        let registry = registry(&[FINALIZER]);
        assert!(has_finalizer(&registry));
        assert_eq!(with_finalizer(&registry), vec![FINALIZER.to_string()]);
    }

    #[test]
    fn test_remove_only_drops_own_finalizer() {
        let registry = registry(&[FINALIZER, "example.com/other"]);
        assert_eq!(without_finalizer(&registry), vec!["example.com/other".to_string()]);
    }
}
