//! # ApicurioRegistry Status
//!
//! Status types reporting the observed state of the managed registry.

use serde::{Deserialize, Serialize};

/// Status of the ApicurioRegistry resource
///
/// The scalar fields mirror the store's status keys and are written back
/// once the managed objects exist.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApicurioRegistryStatus {
    /// Image currently deployed
    #[serde(default)]
    pub image: String,
    /// Name of the managed Deployment
    #[serde(default)]
    pub deployment_name: String,
    /// Name of the managed Service
    #[serde(default)]
    pub service_name: String,
    /// Name of the managed Ingress, empty when none exists
    #[serde(default)]
    pub ingress_name: String,
    /// Number of available registry replicas
    #[serde(default)]
    pub replica_count: i32,
    /// Externally visible host, empty when not exposed
    #[serde(default)]
    pub route: String,
    /// Conditions represent the latest available observations
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Generation of the spec the status was computed from
    #[serde(default)]
    pub observed_generation: Option<i64>,
}

/// Condition represents a condition of a resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: String,
    /// Last transition time
    #[serde(default)]
    pub last_transition_time: Option<String>,
    /// Reason for the condition
    #[serde(default)]
    pub reason: Option<String>,
    /// Message describing the condition
    #[serde(default)]
    pub message: Option<String>,
}

impl ApicurioRegistryStatus {
    /// Find a condition by type
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.r#type == condition_type)
    }
}
