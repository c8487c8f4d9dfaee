//! # Configuration Store Tests
//!
//! Behavioral tests for the per-resource configuration store.
//!
//! These tests verify:
//! - Keys derived for each persistence mode
//! - Idempotent updates and environment change detection
//! - Image reference composition
//! - Defaulting and validation error reporting
//! - Contract violations

use k8s_openapi::api::core::v1::EnvVar;
use registry_operator::controller::configuration::{ConfigKey, Configuration, EnvVarName};
use registry_operator::crd::{ApicurioRegistry, ApicurioRegistrySpec};
use std::sync::Arc;

fn registry(spec: ApicurioRegistrySpec) -> Arc<ApicurioRegistry> {
    let mut registry = ApicurioRegistry::new("example", spec);
    registry.metadata.namespace = Some("registry".to_string());
    Arc::new(registry)
}

fn base_spec(persistence: &str) -> ApicurioRegistrySpec {
    let mut spec = ApicurioRegistrySpec::default();
    spec.image.registry = "quay.io/example".to_string();
    spec.image.version = "1.0".to_string();
    spec.configuration.persistence = persistence.to_string();
    spec
}

fn kafka_spec(bootstrap_servers: &str) -> ApicurioRegistrySpec {
    let mut spec = base_spec("kafka");
    spec.configuration.kafka.bootstrap_servers = bootstrap_servers.to_string();
    spec
}

fn streams_spec() -> ApicurioRegistrySpec {
    let mut spec = base_spec("streams");
    spec.configuration.streams.bootstrap_servers = "kafka:9092".to_string();
    spec.configuration.streams.application_id = "registry-app".to_string();
    spec
}

fn updated(spec: ApicurioRegistrySpec) -> Configuration {
    let mut configuration = Configuration::new();
    configuration.update(registry(spec));
    configuration
}

fn env_entry<'a>(env: &'a [EnvVar], name: EnvVarName) -> Option<&'a EnvVar> {
    env.iter().find(|e| e.name == name.as_str())
}

#[test]
fn test_jpa_mode_derives_datasource_env() {
    let mut spec = base_spec("jpa");
    spec.configuration.data_source.url = "jdbc:postgresql://db:5432/registry".to_string();
    spec.configuration.data_source.user_name = "registry".to_string();
    spec.configuration.data_source.password = "secret".to_string();
    let configuration = updated(spec);

    assert!(configuration.pass_errors().is_empty());
    let env = configuration.env_snapshot();
    assert_eq!(env["QUARKUS_PROFILE"], "prod");
    assert_eq!(env["QUARKUS_DATASOURCE_URL"], "jdbc:postgresql://db:5432/registry");
    assert_eq!(env["QUARKUS_DATASOURCE_USERNAME"], "registry");
    assert_eq!(env["QUARKUS_DATASOURCE_PASSWORD"], "secret");
    assert!(!env.contains_key("KAFKA_BOOTSTRAP_SERVERS"));
    assert!(!env.contains_key("APPLICATION_ID"));
}

#[test]
fn test_kafka_mode_only_derives_bootstrap_servers() {
    let configuration = updated(kafka_spec("kafka:9092"));

    let env = configuration.env_snapshot();
    assert_eq!(env.len(), 2);
    assert_eq!(env["KAFKA_BOOTSTRAP_SERVERS"], "kafka:9092");
    assert!(!env.contains_key("QUARKUS_DATASOURCE_URL"));
    assert!(!env.contains_key("APPLICATION_SERVER_PORT"));
    assert!(env_entry(&configuration.env(), EnvVarName::ApplicationServerHost).is_none());
}

#[test]
fn test_mem_mode_only_derives_profile() {
    let configuration = updated(base_spec("mem"));

    let env = configuration.env_snapshot();
    assert_eq!(env.len(), 1);
    assert_eq!(env["QUARKUS_PROFILE"], "prod");
    assert_eq!(configuration.get_config(ConfigKey::PersistenceType), "mem");
}

#[test]
fn test_general_keys_are_derived() {
    let mut spec = kafka_spec("kafka:9092");
    spec.deployment.replicas = 2;
    spec.deployment.route = "registry.example.com".to_string();
    let configuration = updated(spec);

    assert_eq!(configuration.get_config(ConfigKey::ImageRegistry), "quay.io/example");
    assert_eq!(configuration.get_config(ConfigKey::ImageVersion), "1.0");
    assert_eq!(configuration.get_config(ConfigKey::Replicas), "2");
    assert_eq!(configuration.get_config(ConfigKey::Route), "registry.example.com");
    assert_eq!(configuration.get_config(ConfigKey::CpuRequests), "0.1");
    assert_eq!(configuration.get_config(ConfigKey::CpuLimit), "1");
    assert_eq!(configuration.get_config(ConfigKey::MemoryRequests), "600Mi");
    assert_eq!(configuration.get_config(ConfigKey::MemoryLimit), "1300Mi");
}

#[test]
fn test_explicit_resources_are_kept() {
    let mut spec = kafka_spec("kafka:9092");
    spec.deployment.resources.cpu.requests = "250m".to_string();
    spec.deployment.resources.memory.limit = "2Gi".to_string();
    let configuration = updated(spec);

    assert_eq!(configuration.get_config(ConfigKey::CpuRequests), "250m");
    assert_eq!(configuration.get_config(ConfigKey::CpuLimit), "1");
    assert_eq!(configuration.get_config(ConfigKey::MemoryLimit), "2Gi");
}

#[test]
fn test_update_with_unchanged_spec_is_idempotent() {
    let mut configuration = Configuration::new();
    configuration.update(registry(streams_spec()));
    let config = configuration
        .config_snapshot()
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect::<Vec<_>>();
    let env = configuration
        .env_snapshot()
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect::<Vec<_>>();

    configuration.update(registry(streams_spec()));

    assert!(!configuration.env_changed());
    let config_again: Vec<_> = configuration
        .config_snapshot()
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    let env_again: Vec<_> = configuration
        .env_snapshot()
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    assert_eq!(config, config_again);
    assert_eq!(env, env_again);
}

#[test]
fn test_env_changed_compares_against_previous_pass_only() {
    let mut configuration = Configuration::new();

    configuration.update(registry(kafka_spec("kafka-a:9092")));
    assert!(configuration.env_changed(), "first pass adds entries");

    configuration.update(registry(kafka_spec("kafka-b:9092")));
    assert!(configuration.env_changed());

    configuration.update(registry(kafka_spec("kafka-a:9092")));
    assert!(configuration.env_changed(), "reverting is still a change");

    configuration.update(registry(kafka_spec("kafka-a:9092")));
    assert!(!configuration.env_changed());
}

#[test]
fn test_general_changes_do_not_mark_env_changed() {
    let mut configuration = Configuration::new();
    configuration.update(registry(kafka_spec("kafka:9092")));

    let mut spec = kafka_spec("kafka:9092");
    spec.deployment.replicas = 5;
    configuration.update(registry(spec));

    assert!(!configuration.env_changed());
    assert_eq!(configuration.get_config_i32(ConfigKey::Replicas), 5);
}

#[test]
fn test_image_is_composed_from_registry_persistence_and_version() {
    let configuration = updated(kafka_spec("kafka:9092"));
    assert_eq!(configuration.image(), "quay.io/example/apicurio-registry-kafka:1.0");
}

#[test]
fn test_image_override_is_returned_verbatim() {
    let mut spec = kafka_spec("kafka:9092");
    spec.image.override_image = "custom/image:latest".to_string();
    spec.image.registry = String::new();
    let configuration = updated(spec);

    assert_eq!(configuration.image(), "custom/image:latest");
}

#[test]
fn test_zero_replicas_defaults_to_one() {
    let mut spec = kafka_spec("kafka:9092");
    spec.deployment.replicas = 0;
    let configuration = updated(spec);

    assert_eq!(configuration.get_config(ConfigKey::Replicas), "1");
    assert_eq!(configuration.get_config_i32(ConfigKey::Replicas), 1);
}

#[test]
fn test_streams_port_defaults_and_pod_ip_entry() {
    let configuration = updated(streams_spec());

    assert!(configuration.pass_errors().is_empty());
    let env = configuration.env_snapshot();
    assert_eq!(env["APPLICATION_SERVER_PORT"], "9000");
    assert_eq!(env["APPLICATION_ID"], "registry-app");
    assert_eq!(env["KAFKA_BOOTSTRAP_SERVERS"], "kafka:9092");

    let exported = configuration.env();
    let host = env_entry(&exported, EnvVarName::ApplicationServerHost)
        .expect("streams mode exports the pod IP entry");
    assert!(host.value.is_none());
    let field_ref = host
        .value_from
        .as_ref()
        .and_then(|source| source.field_ref.as_ref())
        .expect("pod IP entry is a field reference");
    assert_eq!(field_ref.field_path, "status.podIP");
}

#[test]
fn test_streams_missing_application_id_is_reported() {
    let mut spec = streams_spec();
    spec.configuration.streams.application_id = String::new();
    let configuration = updated(spec);

    let errors: Vec<String> = configuration
        .pass_errors()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        errors,
        vec!["Value '' for key 'APPLICATION_ID' is not valid: Value is empty."]
    );
    assert!(!configuration.env_snapshot().contains_key("APPLICATION_ID"));
    assert_eq!(configuration.env_snapshot()["APPLICATION_SERVER_PORT"], "9000");
}

#[test]
fn test_unknown_persistence_lists_allowed_values() {
    let configuration = updated(base_spec("cassandra"));

    let messages: Vec<String> = configuration
        .errors()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        messages,
        vec!["Value 'cassandra' for key 'PERSISTENCE_TYPE' is not valid: Value is not one of 'mem, jpa, kafka, streams'."]
    );
    assert!(!configuration.config_snapshot().contains_key("PERSISTENCE_TYPE"));
}

#[test]
fn test_errors_accumulate_while_pass_errors_reset() {
    let mut configuration = Configuration::new();
    configuration.update(registry(kafka_spec("")));
    assert_eq!(configuration.errors().len(), 1);
    assert_eq!(configuration.pass_errors().len(), 1);

    configuration.update(registry(kafka_spec("")));
    assert_eq!(configuration.errors().len(), 2);
    assert_eq!(configuration.pass_errors().len(), 1);

    configuration.update(registry(kafka_spec("kafka:9092")));
    assert_eq!(configuration.errors().len(), 2);
    assert!(configuration.pass_errors().is_empty());
}

#[test]
fn test_rejected_env_value_does_not_mark_env_changed() {
    let mut configuration = Configuration::new();
    configuration.update(registry(kafka_spec("kafka:9092")));

    configuration.update(registry(kafka_spec("")));

    assert_eq!(configuration.env_snapshot()["KAFKA_BOOTSTRAP_SERVERS"], "kafka:9092");
    assert!(!configuration.env_changed());
}

#[test]
fn test_status_writeback_round_trips() {
    let mut configuration = updated(kafka_spec("kafka:9092"));

    configuration.set_config(ConfigKey::StatusDeploymentName, "example-deployment");
    configuration.set_config_i32(ConfigKey::StatusReplicaCount, 3);
    assert_eq!(
        configuration.get_config(ConfigKey::StatusDeploymentName),
        "example-deployment"
    );
    assert_eq!(configuration.get_config_i32(ConfigKey::StatusReplicaCount), 3);

    configuration.clear_config(ConfigKey::StatusDeploymentName);
    assert_eq!(configuration.get_config(ConfigKey::StatusDeploymentName), "");
}

#[test]
fn test_identity_passthrough() {
    let configuration = updated(base_spec("mem"));
    assert_eq!(configuration.spec_name(), "example");
    assert_eq!(configuration.spec_namespace(), "registry");
}

#[test]
#[should_panic(expected = "not found")]
fn test_reading_underived_key_panics() {
    // Only the status keys exist before the first update
    let configuration = Configuration::new();
    configuration.get_config(ConfigKey::PersistenceType);
}

#[test]
fn test_negative_replicas_are_stored_verbatim() {
    // Only zero is coerced; the API server rejects negative counts on apply
    let mut spec = kafka_spec("kafka:9092");
    spec.deployment.replicas = -2;
    let configuration = updated(spec);

    assert!(configuration.pass_errors().is_empty());
    assert_eq!(configuration.get_config(ConfigKey::Replicas), "-2");
    assert_eq!(configuration.get_config_i32(ConfigKey::Replicas), -2);
}
