//! # Configuration Keys
//!
//! Typed names for every entry the store can hold. The general map and the
//! environment map use distinct key types, so an environment variable can
//! never be read through the general accessors.

use std::fmt;

/// Key of the general configuration map (image, deployment and status values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    PersistenceType,
    ImageRegistry,
    ImageVersion,
    Replicas,
    Route,
    CpuRequests,
    CpuLimit,
    MemoryRequests,
    MemoryLimit,
    StatusImage,
    StatusDeploymentName,
    StatusServiceName,
    StatusIngressName,
    StatusReplicaCount,
    StatusRoute,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 15] = [
        ConfigKey::PersistenceType,
        ConfigKey::ImageRegistry,
        ConfigKey::ImageVersion,
        ConfigKey::Replicas,
        ConfigKey::Route,
        ConfigKey::CpuRequests,
        ConfigKey::CpuLimit,
        ConfigKey::MemoryRequests,
        ConfigKey::MemoryLimit,
        ConfigKey::StatusImage,
        ConfigKey::StatusDeploymentName,
        ConfigKey::StatusServiceName,
        ConfigKey::StatusIngressName,
        ConfigKey::StatusReplicaCount,
        ConfigKey::StatusRoute,
    ];

    /// Status keys seeded with empty values when the store is created
    pub const STATUS: [ConfigKey; 6] = [
        ConfigKey::StatusImage,
        ConfigKey::StatusDeploymentName,
        ConfigKey::StatusServiceName,
        ConfigKey::StatusIngressName,
        ConfigKey::StatusReplicaCount,
        ConfigKey::StatusRoute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::PersistenceType => "PERSISTENCE_TYPE",
            ConfigKey::ImageRegistry => "IMAGE_REGISTRY",
            ConfigKey::ImageVersion => "IMAGE_VERSION",
            ConfigKey::Replicas => "REPLICAS",
            ConfigKey::Route => "ROUTE",
            ConfigKey::CpuRequests => "CPU_REQUESTS",
            ConfigKey::CpuLimit => "CPU_LIMIT",
            ConfigKey::MemoryRequests => "MEMORY_REQUESTS",
            ConfigKey::MemoryLimit => "MEMORY_LIMIT",
            ConfigKey::StatusImage => "CFG_STA_IMAGE",
            ConfigKey::StatusDeploymentName => "CFG_STA_DEPLOYMENT_NAME",
            ConfigKey::StatusServiceName => "CFG_STA_SERVICE_NAME",
            ConfigKey::StatusIngressName => "CFG_STA_INGRESS_NAME",
            ConfigKey::StatusReplicaCount => "CFG_STA_REPLICA_COUNT",
            ConfigKey::StatusRoute => "CFG_STA_ROUTE",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment variable injected into the registry container
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnvVarName {
    QuarkusProfile,
    DatasourceUrl,
    DatasourceUsername,
    DatasourcePassword,
    KafkaBootstrapServers,
    /// Only ever synthesized from the pod IP, never stored
    ApplicationServerHost,
    ApplicationServerPort,
    ApplicationId,
}

impl EnvVarName {
    pub const ALL: [EnvVarName; 8] = [
        EnvVarName::QuarkusProfile,
        EnvVarName::DatasourceUrl,
        EnvVarName::DatasourceUsername,
        EnvVarName::DatasourcePassword,
        EnvVarName::KafkaBootstrapServers,
        EnvVarName::ApplicationServerHost,
        EnvVarName::ApplicationServerPort,
        EnvVarName::ApplicationId,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnvVarName::QuarkusProfile => "QUARKUS_PROFILE",
            EnvVarName::DatasourceUrl => "QUARKUS_DATASOURCE_URL",
            EnvVarName::DatasourceUsername => "QUARKUS_DATASOURCE_USERNAME",
            EnvVarName::DatasourcePassword => "QUARKUS_DATASOURCE_PASSWORD",
            EnvVarName::KafkaBootstrapServers => "KAFKA_BOOTSTRAP_SERVERS",
            EnvVarName::ApplicationServerHost => "APPLICATION_SERVER_HOST",
            EnvVarName::ApplicationServerPort => "APPLICATION_SERVER_PORT",
            EnvVarName::ApplicationId => "APPLICATION_ID",
        }
    }
}

impl fmt::Display for EnvVarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_names_are_non_empty_and_unique() {
        let config_names: HashSet<_> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(config_names.len(), ConfigKey::ALL.len());
        assert!(config_names.iter().all(|name| !name.is_empty()));

        let env_names: HashSet<_> = EnvVarName::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(env_names.len(), EnvVarName::ALL.len());
        assert!(env_names.iter().all(|name| !name.is_empty()));
    }

    #[test]
    fn test_status_keys_use_status_prefix() {
        for key in ConfigKey::STATUS {
            assert!(key.as_str().starts_with("CFG_STA_"), "{key}");
        }
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(ConfigKey::Replicas.to_string(), "REPLICAS");
        assert_eq!(
            EnvVarName::KafkaBootstrapServers.to_string(),
            "KAFKA_BOOTSTRAP_SERVERS"
        );
    }
}
