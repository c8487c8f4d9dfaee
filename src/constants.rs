//! # Constants
//!
//! Shared names and defaults for the Apicurio Registry operator.

/// Field manager used for server-side apply and status patches
pub const FIELD_MANAGER: &str = "apicurio-registry-operator";

/// Finalizer that keeps a registry around until its store is released
pub const FINALIZER: &str = "apicur.io/registry-finalizer";

/// Label used to select the registry pods
pub const APP_LABEL: &str = "app";

/// Name of the registry container inside the managed Deployment
pub const REGISTRY_CONTAINER_NAME: &str = "registry";

/// HTTP port exposed by the registry container and its Service
pub const REGISTRY_HTTP_PORT: i32 = 8080;

/// Image repository prefix; the lowercased persistence type is appended
pub const IMAGE_NAME_PREFIX: &str = "apicurio-registry-";

/// Quarkus profile injected into every registry container
pub const QUARKUS_PROFILE: &str = "prod";

/// Accepted persistence types
pub const PERSISTENCE_MEM: &str = "mem";
pub const PERSISTENCE_JPA: &str = "jpa";
pub const PERSISTENCE_KAFKA: &str = "kafka";
pub const PERSISTENCE_STREAMS: &str = "streams";
pub const PERSISTENCE_TYPES: &[&str] = &[
    PERSISTENCE_MEM,
    PERSISTENCE_JPA,
    PERSISTENCE_KAFKA,
    PERSISTENCE_STREAMS,
];

// Defaults applied when the resource leaves a field empty
pub const DEFAULT_APPLICATION_SERVER_PORT: &str = "9000";
pub const DEFAULT_CPU_REQUESTS: &str = "0.1";
pub const DEFAULT_CPU_LIMIT: &str = "1";
pub const DEFAULT_MEMORY_REQUESTS: &str = "600Mi";
pub const DEFAULT_MEMORY_LIMIT: &str = "1300Mi";
pub const DEFAULT_REPLICAS: i32 = 1;

/// Downward API field resolving to the pod's own IP
pub const POD_IP_FIELD_PATH: &str = "status.podIP";

// Controller defaults
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_ERROR_REQUEUE_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "registry_operator=info";

// Server defaults
pub const DEFAULT_METRICS_PORT: u16 = 8080;
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;
