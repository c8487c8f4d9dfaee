//! # Reconciler Types
//!
//! Shared reconciler context, the per-resource store registry and the
//! reconciliation error type.

use crate::config::ControllerConfig;
use crate::controller::configuration::Configuration;
use crate::observability;
use kube::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Errors surfaced to the controller's error policy
///
/// Configuration validation failures are not errors here; they are reported
/// through the resource status.
#[derive(Debug, thiserror::Error)]
pub enum ReconcilerError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    #[error("Failed to serialize status: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Resource is missing {0}")]
    MissingObjectKey(&'static str),
}

/// Handle to one resource's configuration store
///
/// The async mutex serializes reconciliations of the same resource.
pub type SharedConfiguration = Arc<tokio::sync::Mutex<Configuration>>;

/// One registered store and the uid of the resource it was built for
#[derive(Debug)]
struct StoreEntry {
    uid: Option<String>,
    store: SharedConfiguration,
}

/// Configuration stores keyed by `namespace/name`
///
/// A resource recreated under the same name has a new uid and gets a fresh
/// store, so nothing derived for the old object leaks into the new one.
#[derive(Debug, Default)]
pub struct ConfigurationStores {
    stores: Mutex<HashMap<String, StoreEntry>>,
}

impl ConfigurationStores {
    /// Store for `key`, created on first use or when `uid` changed
    pub fn store_for(&self, key: &str, uid: Option<&str>) -> SharedConfiguration {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        let reusable = stores
            .get(key)
            .filter(|entry| entry.uid.as_deref() == uid)
            .map(|entry| Arc::clone(&entry.store));

        let store = match reusable {
            Some(store) => store,
            None => {
                debug!(resource = key, uid = ?uid, "Creating configuration store");
                let store = Arc::new(tokio::sync::Mutex::new(Configuration::new()));
                stores.insert(
                    key.to_string(),
                    StoreEntry {
                        uid: uid.map(ToString::to_string),
                        store: Arc::clone(&store),
                    },
                );
                store
            }
        };
        observability::metrics::set_registries_managed(stores.len());
        store
    }

    /// Drop the store for `key`; the next pass starts from a fresh store
    pub fn forget(&self, key: &str) {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        if stores.remove(key).is_some() {
            debug!(resource = key, "Dropped configuration store");
        }
        observability::metrics::set_registries_managed(stores.len());
    }

    pub fn len(&self) -> usize {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Context shared by every reconciliation
pub struct Reconciler {
    pub client: Client,
    pub config: ControllerConfig,
    pub stores: ConfigurationStores,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("stores", &self.stores)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(client: Client, config: ControllerConfig) -> Self {
        Self {
            client,
            config,
            stores: ConfigurationStores::default(),
        }
    }
}
