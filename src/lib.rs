//! # Apicurio Registry Operator
//!
//! A Kubernetes operator that turns `ApicurioRegistry` resources into a
//! running Apicurio Registry Deployment and Service.
//!
//! ## Overview
//!
//! Each reconciliation feeds the latest resource into a per-resource
//! [`Configuration`](controller::configuration::Configuration) store, which:
//!
//! 1. **Validates and defaults** every setting of the active persistence mode
//! 2. **Derives the environment** the registry container runs with
//! 3. **Detects environment changes** between passes
//! 4. **Computes the container image** from registry, persistence and version
//!
//! The rendered manifests are server-side applied and the outcome is written
//! back to the resource status.
//!
//! ## Usage
//!
//! See the [README.md](../README.md) for deployment instructions.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod runtime;
