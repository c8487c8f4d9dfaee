//! Prints the ApicurioRegistry CustomResourceDefinition as YAML.
//!
//! ```sh
//! cargo run --bin crdgen > config/crd/apicurioregistry.yaml
//! ```

use anyhow::Result;
use kube::CustomResourceExt;
use registry_operator::crd::ApicurioRegistry;

fn main() -> Result<()> {
    print!("{}", serde_yaml::to_string(&ApicurioRegistry::crd())?);
    Ok(())
}
