//! # Apicurio Registry Operator
//!
//! Operator binary: initializes the runtime and runs the watch loop until a
//! shutdown signal arrives.

use anyhow::Result;
use registry_operator::runtime::{initialize, run_watch_loop};
use std::sync::atomic::Ordering;

#[tokio::main]
async fn main() -> Result<()> {
    let init_result = initialize().await?;

    run_watch_loop(
        init_result.registries,
        init_result.deployments,
        init_result.reconciler,
    )
    .await?;

    init_result.server_state.is_ready.store(false, Ordering::Relaxed);
    Ok(())
}
