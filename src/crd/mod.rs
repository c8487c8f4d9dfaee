//! # Custom Resource Definitions
//!
//! CRD types for the Apicurio Registry operator.
//!
//! Every spec field is optional on the wire and defaults to an empty value.
//! Defaulting and validation happen in the configuration store during
//! reconciliation, not in the API server, so the schema stays permissive.

mod status;

pub use status::{ApicurioRegistryStatus, Condition};

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// ApicurioRegistry Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: apicur.io/v1alpha1
/// kind: ApicurioRegistry
/// metadata:
///   name: example-registry
///   namespace: default
/// spec:
///   image:
///     registry: quay.io/apicurio
///     version: 1.2.0.Final
///   configuration:
///     persistence: streams
///     streams:
///       bootstrapServers: my-cluster-kafka-bootstrap:9092
///       applicationId: example-registry
///   deployment:
///     replicas: 2
/// ```
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ApicurioRegistry",
    group = "apicur.io",
    version = "v1alpha1",
    namespaced,
    status = "ApicurioRegistryStatus",
    shortname = "ar",
    printcolumn = r#"{"name":"Image", "type":"string", "jsonPath":".status.image"}, {"name":"Replicas", "type":"integer", "jsonPath":".status.replicaCount"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[serde(rename_all = "camelCase", default)]
pub struct ApicurioRegistrySpec {
    /// Container image selection
    pub image: ImageSpec,
    /// Persistence and connection settings
    pub configuration: ConfigurationSpec,
    /// Deployment shape: replicas, route and resources
    pub deployment: DeploymentOptions,
}

/// Container image selection
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSpec {
    /// Image registry, e.g. "quay.io/apicurio"
    pub registry: String,
    /// Image tag, e.g. "1.2.0.Final"
    pub version: String,
    /// Full image reference used verbatim instead of registry/version
    #[serde(rename = "override")]
    pub override_image: String,
}

/// Persistence configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationSpec {
    /// Storage backend: one of "mem", "jpa", "kafka", "streams"
    pub persistence: String,
    /// JDBC settings, only read when persistence is "jpa"
    pub data_source: DataSourceSpec,
    /// Kafka settings, only read when persistence is "kafka"
    pub kafka: KafkaSpec,
    /// Kafka Streams settings, only read when persistence is "streams"
    pub streams: StreamsSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSourceSpec {
    pub url: String,
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct KafkaSpec {
    pub bootstrap_servers: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamsSpec {
    pub bootstrap_servers: String,
    /// Kafka Streams application id, must be unique per registry cluster
    pub application_id: String,
    /// Port used for interactive queries between replicas (default "9000")
    pub application_server_port: String,
}

/// Deployment shape
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentOptions {
    /// Number of registry pods; 0 means 1
    pub replicas: i32,
    /// Externally visible host for the registry, empty when not exposed
    pub route: String,
    pub resources: ResourcesSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcesSpec {
    /// CPU requests/limit (defaults "0.1" / "1")
    pub cpu: ResourceBounds,
    /// Memory requests/limit (defaults "600Mi" / "1300Mi")
    pub memory: ResourceBounds,
}

/// Kubernetes quantity strings for one resource
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceBounds {
    pub requests: String,
    pub limit: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    #[test]
    fn test_spec_deserializes_with_missing_fields() {
        let spec: ApicurioRegistrySpec = serde_json::from_value(serde_json::json!({
            "image": { "registry": "quay.io/apicurio" },
            "configuration": { "persistence": "kafka" }
        }))
        .unwrap();

        assert_eq!(spec.image.registry, "quay.io/apicurio");
        assert_eq!(spec.image.version, "");
        assert_eq!(spec.configuration.persistence, "kafka");
        assert_eq!(spec.deployment.replicas, 0);
        assert_eq!(spec.deployment.resources.cpu.requests, "");
    }

    #[test]
    fn test_image_override_uses_wire_name() {
        let spec: ApicurioRegistrySpec = serde_json::from_value(serde_json::json!({
            "image": { "override": "custom/image:latest" }
        }))
        .unwrap();
        assert_eq!(spec.image.override_image, "custom/image:latest");

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["image"]["override"], "custom/image:latest");
    }

    #[test]
    fn test_streams_fields_are_camel_case() {
        let spec: ApicurioRegistrySpec = serde_json::from_value(serde_json::json!({
            "configuration": {
                "persistence": "streams",
                "streams": {
                    "bootstrapServers": "kafka:9092",
                    "applicationId": "registry",
                    "applicationServerPort": "9001"
                },
                "dataSource": { "userName": "sa" }
            }
        }))
        .unwrap();
        assert_eq!(spec.configuration.streams.bootstrap_servers, "kafka:9092");
        assert_eq!(spec.configuration.streams.application_id, "registry");
        assert_eq!(spec.configuration.streams.application_server_port, "9001");
        assert_eq!(spec.configuration.data_source.user_name, "sa");
    }

    #[test]
    fn test_crd_metadata() {
        let crd = ApicurioRegistry::crd();
        assert_eq!(crd.spec.group, "apicur.io");
        assert_eq!(crd.spec.names.kind, "ApicurioRegistry");
        assert_eq!(crd.spec.scope, "Namespaced");
        assert_eq!(
            crd.spec.names.short_names,
            Some(vec!["ar".to_string()])
        );
    }
}
