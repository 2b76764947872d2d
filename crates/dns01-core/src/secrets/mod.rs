// # Secret Store Implementations
//
// This module provides implementations of the SecretStore trait for
// different credential sources.

pub mod file;
pub mod memory;

pub use file::{FileSecretStore, FileSecretStoreFactory};
pub use memory::{MemorySecretStore, MemorySecretStoreFactory};

use crate::config::SecretStoreConfig;
use crate::traits::{SecretStore, SecretStoreFactory};
use crate::{Error, Result};

/// Build one of the built-in secret stores from configuration
pub fn build_secret_store(config: &SecretStoreConfig) -> Result<Box<dyn SecretStore>> {
    config.validate()?;

    let store = match config {
        SecretStoreConfig::File { .. } => FileSecretStoreFactory.create(config),
        SecretStoreConfig::Memory { .. } => MemorySecretStoreFactory.create(config),
    }
    .map_err(|e| match e {
        Error::Config(msg) => Error::config(format!(
            "unable to construct {} secret store: {}",
            config.type_name(),
            msg
        )),
        other => other,
    })?;

    tracing::debug!("Secret store initialized: {}", store.store_type());
    Ok(store)
}
