//! # Configuration Store
//!
//! Derives the runtime configuration of a registry from its
//! [`ApicurioRegistry`] resource once per reconciliation pass.
//!
//! The store keeps two maps:
//! - the general map ([`ConfigKey`]) read by the manifest renderers and
//!   status reporting
//! - the environment map ([`EnvVarName`]) injected into the registry container
//!
//! Every pass re-derives every entry from the resource. Field validation
//! failures never abort a pass; they are recorded as [`ConfigurationError`]s
//! and the caller decides what to do with them after [`Configuration::update`]
//! returns. Reading a key that was never written, or reading the resource
//! before the first update, is a programming error and panics.

mod keys;
mod validator;

pub use keys::{ConfigKey, EnvVarName};
pub use validator::{ConfigurationError, ValidationError, Validator};

use crate::constants::{
    DEFAULT_APPLICATION_SERVER_PORT, DEFAULT_CPU_LIMIT, DEFAULT_CPU_REQUESTS,
    DEFAULT_MEMORY_LIMIT, DEFAULT_MEMORY_REQUESTS, DEFAULT_REPLICAS, IMAGE_NAME_PREFIX,
    PERSISTENCE_JPA, PERSISTENCE_KAFKA, PERSISTENCE_STREAMS, PERSISTENCE_TYPES,
    POD_IP_FIELD_PATH, QUARKUS_PROFILE,
};
use crate::crd::ApicurioRegistry;
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, ObjectFieldSelector};
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Derived configuration of one ApicurioRegistry resource
///
/// Owned by a single reconciler; not meant to be shared between
/// concurrent reconciliations.
#[derive(Debug)]
pub struct Configuration {
    spec: Option<Arc<ApicurioRegistry>>,
    config: BTreeMap<ConfigKey, String>,
    env_config: BTreeMap<EnvVarName, String>,
    prev_env_config: BTreeMap<EnvVarName, String>,
    errors: Vec<ConfigurationError>,
    pass_start: usize,
}

impl Configuration {
    /// Create an uninitialized store with the status keys seeded empty
    pub fn new() -> Self {
        let mut configuration = Self {
            spec: None,
            config: BTreeMap::new(),
            env_config: BTreeMap::new(),
            prev_env_config: BTreeMap::new(),
            errors: Vec::new(),
            pass_start: 0,
        };
        for key in ConfigKey::STATUS {
            configuration.set_general(key, String::new(), Validator::PassThrough);
        }
        configuration
    }

    /// Advance to a new desired state
    ///
    /// Snapshots the environment map, replaces the resource and re-derives
    /// every entry. Errors recorded by this pass are available through
    /// [`Configuration::pass_errors`].
    pub fn update(&mut self, spec: Arc<ApicurioRegistry>) {
        self.prev_env_config = self.env_config.clone();
        self.pass_start = self.errors.len();
        self.spec = Some(spec);
        self.derive();
    }

    fn derive(&mut self) {
        let registry = Arc::clone(self.registry());
        let spec = &registry.spec;
        let persistence = spec.configuration.persistence.as_str();

        self.set_env(
            EnvVarName::QuarkusProfile,
            QUARKUS_PROFILE.to_string(),
            Validator::Required,
        );

        self.set_general(
            ConfigKey::ImageRegistry,
            spec.image.registry.clone(),
            Validator::Required,
        );
        self.set_general(
            ConfigKey::ImageVersion,
            spec.image.version.clone(),
            Validator::Required,
        );

        self.set_general(
            ConfigKey::PersistenceType,
            persistence.to_string(),
            Validator::OneOf(PERSISTENCE_TYPES),
        );

        if persistence == PERSISTENCE_JPA {
            let data_source = &spec.configuration.data_source;
            self.set_env(
                EnvVarName::DatasourceUrl,
                data_source.url.clone(),
                Validator::Required,
            );
            self.set_env(
                EnvVarName::DatasourceUsername,
                data_source.user_name.clone(),
                Validator::Required,
            );
            self.set_env(
                EnvVarName::DatasourcePassword,
                data_source.password.clone(),
                Validator::Required,
            );
        }
        if persistence == PERSISTENCE_KAFKA {
            self.set_env(
                EnvVarName::KafkaBootstrapServers,
                spec.configuration.kafka.bootstrap_servers.clone(),
                Validator::Required,
            );
        }
        if persistence == PERSISTENCE_STREAMS {
            let streams = &spec.configuration.streams;
            self.set_env(
                EnvVarName::KafkaBootstrapServers,
                streams.bootstrap_servers.clone(),
                Validator::Required,
            );
            self.set_env(
                EnvVarName::ApplicationServerPort,
                streams.application_server_port.clone(),
                Validator::DefaultTo(DEFAULT_APPLICATION_SERVER_PORT),
            );
            self.set_env(
                EnvVarName::ApplicationId,
                streams.application_id.clone(),
                Validator::Required,
            );
        }

        let deployment = &spec.deployment;
        let replicas = if deployment.replicas == 0 {
            DEFAULT_REPLICAS
        } else {
            deployment.replicas
        };
        self.set_general(ConfigKey::Replicas, replicas.to_string(), Validator::Required);
        self.set_general(
            ConfigKey::Route,
            deployment.route.clone(),
            Validator::PassThrough,
        );

        let resources = &deployment.resources;
        self.set_general(
            ConfigKey::CpuRequests,
            resources.cpu.requests.clone(),
            Validator::DefaultTo(DEFAULT_CPU_REQUESTS),
        );
        self.set_general(
            ConfigKey::CpuLimit,
            resources.cpu.limit.clone(),
            Validator::DefaultTo(DEFAULT_CPU_LIMIT),
        );
        self.set_general(
            ConfigKey::MemoryRequests,
            resources.memory.requests.clone(),
            Validator::DefaultTo(DEFAULT_MEMORY_REQUESTS),
        );
        self.set_general(
            ConfigKey::MemoryLimit,
            resources.memory.limit.clone(),
            Validator::DefaultTo(DEFAULT_MEMORY_LIMIT),
        );
    }

    fn set_general(&mut self, key: ConfigKey, value: String, validator: Validator) {
        store(&mut self.config, &mut self.errors, key, value, validator);
    }

    fn set_env(&mut self, key: EnvVarName, value: String, validator: Validator) {
        store(&mut self.env_config, &mut self.errors, key, value, validator);
    }

    fn registry(&self) -> &Arc<ApicurioRegistry> {
        match &self.spec {
            Some(spec) => spec,
            None => panic!("Configuration read before the first update; call 'update' after constructing a new instance"),
        }
    }

    /// Whether at least one update has been applied
    pub fn is_active(&self) -> bool {
        self.spec.is_some()
    }

    /// Write a general value; rejected when empty
    pub fn set_config(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.set_general(key, value.into(), Validator::Required);
    }

    /// Reset a general value to the empty string
    pub fn clear_config(&mut self, key: ConfigKey) {
        self.set_general(key, String::new(), Validator::PassThrough);
    }

    /// Write an integer as its decimal representation
    pub fn set_config_i32(&mut self, key: ConfigKey, value: i32) {
        self.set_general(key, value.to_string(), Validator::Required);
    }

    /// Read a general value
    ///
    /// # Panics
    ///
    /// Panics if the key was never written. Every key read by a consumer must
    /// be seeded at construction or derived by [`Configuration::update`].
    pub fn get_config(&self, key: ConfigKey) -> &str {
        match self.config.get(&key) {
            Some(value) => value,
            None => panic!("Configuration key '{key}' not found"),
        }
    }

    /// Read a general value as an integer
    ///
    /// A value that does not parse yields 0.
    // TODO: surface parse failures once status consumers stop relying on the zero fallback
    pub fn get_config_i32(&self, key: ConfigKey) -> i32 {
        let raw = self.get_config(key);
        raw.parse().unwrap_or_else(|e| {
            debug!(key = %key, value = raw, error = %e, "configuration value is not an integer, using 0");
            0
        })
    }

    /// Fully qualified container image reference
    ///
    /// The explicit override wins; otherwise
    /// `<registry>/apicurio-registry-<persistence>:<version>`.
    pub fn image(&self) -> String {
        let spec = &self.registry().spec;
        if !spec.image.override_image.is_empty() {
            return spec.image.override_image.clone();
        }
        format!(
            "{}/{}{}:{}",
            spec.image.registry,
            IMAGE_NAME_PREFIX,
            spec.configuration.persistence.to_lowercase(),
            spec.image.version
        )
    }

    /// Environment variables for the registry container
    ///
    /// Streams persistence additionally gets `APPLICATION_SERVER_HOST`
    /// resolved from the pod IP.
    pub fn env(&self) -> Vec<EnvVar> {
        let mut env: Vec<EnvVar> = self
            .env_config
            .iter()
            .map(|(name, value)| EnvVar {
                name: name.to_string(),
                value: Some(value.clone()),
                ..Default::default()
            })
            .collect();

        if self.config.get(&ConfigKey::PersistenceType).map(String::as_str)
            == Some(PERSISTENCE_STREAMS)
        {
            env.push(EnvVar {
                name: EnvVarName::ApplicationServerHost.to_string(),
                value_from: Some(EnvVarSource {
                    field_ref: Some(ObjectFieldSelector {
                        field_path: POD_IP_FIELD_PATH.to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            });
        }
        env
    }

    /// Whether the environment map differs from its value before the last update
    pub fn env_changed(&self) -> bool {
        self.prev_env_config.len() != self.env_config.len()
            || self
                .env_config
                .iter()
                .any(|(name, value)| self.prev_env_config.get(name) != Some(value))
    }

    /// Every validation error recorded over the store's lifetime
    pub fn errors(&self) -> &[ConfigurationError] {
        &self.errors
    }

    /// Validation errors recorded since the start of the last update
    pub fn pass_errors(&self) -> &[ConfigurationError] {
        &self.errors[self.pass_start..]
    }

    /// Name of the current resource
    pub fn spec_name(&self) -> String {
        self.registry().name_any()
    }

    /// Namespace of the current resource, empty when cluster scoped
    pub fn spec_namespace(&self) -> String {
        self.registry().namespace().unwrap_or_default()
    }

    /// General map keyed by wire name
    pub fn config_snapshot(&self) -> BTreeMap<&'static str, &str> {
        snapshot(&self.config, |key| key.as_str())
    }

    /// Environment map keyed by wire name, without synthesized entries
    pub fn env_snapshot(&self) -> BTreeMap<&'static str, &str> {
        snapshot(&self.env_config, |name| name.as_str())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

fn store<K>(
    map: &mut BTreeMap<K, String>,
    errors: &mut Vec<ConfigurationError>,
    key: K,
    value: String,
    validator: Validator,
) where
    K: Ord + Copy + fmt::Display,
{
    match validator.validate(value.clone()) {
        Ok(accepted) => {
            map.insert(key, accepted);
        }
        Err(reason) => {
            warn!(key = %key, value = %value, reason = %reason, "invalid configuration value");
            errors.push(ConfigurationError::new(key, value, reason));
        }
    }
}

fn snapshot<K: Ord + Copy>(
    map: &BTreeMap<K, String>,
    name: impl Fn(K) -> &'static str,
) -> BTreeMap<&'static str, &str> {
    map.iter()
        .map(|(key, value)| (name(*key), value.as_str()))
        .collect()
}
