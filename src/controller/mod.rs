//! # Controller
//!
//! Configuration derivation, manifest rendering, reconciliation and the
//! probe/metrics HTTP server.

pub mod configuration;
pub mod deployment;
pub mod reconciler;
pub mod server;
