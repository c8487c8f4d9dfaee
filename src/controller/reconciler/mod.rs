//! # Reconciler
//!
//! Reconciles ApicurioRegistry resources against the cluster.

pub mod finalizer;
pub mod reconcile;
pub mod status;
pub mod types;

pub use reconcile::reconcile;
pub use types::{ConfigurationStores, Reconciler, ReconcilerError, SharedConfiguration};
