//! Configuration module for the client
//!
//! Configuration comes from an optional YAML file and is then overlaid by
//! command-line flags and environment variables in the binary.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests;

use crate::errors::ClientResult;
use std::path::Path;

/// Load a configuration from a YAML file
pub async fn load_config<P: AsRef<Path>>(path: P) -> ClientResult<ClientConfig> {
    ConfigLoader::from_file(path).await
}
