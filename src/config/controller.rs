//! # Controller Configuration
//!
//! Reconciliation settings loaded from environment variables.

use super::{env_lookup, var_or_default};
use crate::constants::{DEFAULT_ERROR_REQUEUE_SECS, DEFAULT_RECONCILE_INTERVAL_SECS};
use std::time::Duration;

/// Reconciliation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Namespace to watch; all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Requeue delay after a successful or invalid pass (seconds)
    pub reconcile_interval_secs: u64,
    /// Requeue delay after a failed pass (seconds)
    pub error_requeue_secs: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            watch_namespace: None,
            reconcile_interval_secs: DEFAULT_RECONCILE_INTERVAL_SECS,
            error_requeue_secs: DEFAULT_ERROR_REQUEUE_SECS,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            watch_namespace: lookup("WATCH_NAMESPACE")
                .map(|ns| ns.trim().to_string())
                .filter(|ns| !ns.is_empty()),
            reconcile_interval_secs: var_or_default(
                &lookup,
                "RECONCILE_INTERVAL_SECS",
                DEFAULT_RECONCILE_INTERVAL_SECS,
            ),
            error_requeue_secs: var_or_default(
                &lookup,
                "ERROR_REQUEUE_SECS",
                DEFAULT_ERROR_REQUEUE_SECS,
            ),
        }
    }

    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_secs)
    }

    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = ControllerConfig::from_lookup(|_| None);
        assert_eq!(config, ControllerConfig::default());
        assert_eq!(config.reconcile_interval(), Duration::from_secs(300));
        assert_eq!(config.error_requeue(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = ControllerConfig::from_lookup(|key| match key {
            "WATCH_NAMESPACE" => Some(" registry ".to_string()),
            "RECONCILE_INTERVAL_SECS" => Some("60".to_string()),
            "ERROR_REQUEUE_SECS" => Some("5".to_string()),
            _ => None,
        });
        assert_eq!(config.watch_namespace.as_deref(), Some("registry"));
        assert_eq!(config.reconcile_interval_secs, 60);
        assert_eq!(config.error_requeue_secs, 5);
    }

    #[test]
    fn test_blank_namespace_means_all() {
        let config = ControllerConfig::from_lookup(|key| {
            (key == "WATCH_NAMESPACE").then(|| "  ".to_string())
        });
        assert_eq!(config.watch_namespace, None);
    }
}
