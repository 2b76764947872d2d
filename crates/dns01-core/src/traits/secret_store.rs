// # Secret Store Trait
//
// Defines the interface for credential lookup.
//
// ## Purpose
//
// Solvers never hold API keys in their own configuration. Each challenge
// names a secret (namespace + name) and a key inside it; the secret store
// resolves that reference at call time.
//
// ## Implementations
//
// - Memory: `MemorySecretStore` (tests, embedded use)
// - File: `FileSecretStore` (JSON document, re-read per lookup)
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::SecretStore;
//
// let secret = store.get_secret("cert-manager", "desec-token").await?;
// let api_key = secret.get("api-key");
// ```

use async_trait::async_trait;
use std::collections::HashMap;

/// The key/value contents of one secret
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretData {
    entries: HashMap<String, String>,
}

impl SecretData {
    /// Wrap a key/value map
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Look up one key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Key names, for diagnostics (values are never exposed)
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl From<HashMap<String, String>> for SecretData {
    fn from(entries: HashMap<String, String>) -> Self {
        Self::new(entries)
    }
}

// Secret values must never reach log output
impl std::fmt::Debug for SecretData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretData")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Canonical "<namespace>/<name>" reference used by store backends
pub fn secret_ref(namespace: &str, name: &str) -> String {
    format!("{}/{}", namespace, name)
}

/// Trait for secret store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Trust Level: Trusted (Core Component)
///
/// ## Allowed Capabilities
/// - ✅ Perform I/O to read credentials
/// - ✅ Implement locking for thread safety
///
/// ## Forbidden Capabilities
/// - ❌ Log secret values
/// - ❌ Call provider APIs (owned by the solver)
/// - ❌ Cache credentials across lookups (rotations must be visible)
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by namespace and name
    ///
    /// # Returns
    ///
    /// - `Ok(Some(SecretData))`: the secret exists
    /// - `Ok(None)`: no such secret
    /// - `Err(Error)`: storage error
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<SecretData>, crate::Error>;

    /// Store type name (for logging/debugging)
    fn store_type(&self) -> &'static str;
}

/// Helper trait for constructing secret stores from configuration
pub trait SecretStoreFactory: Send + Sync {
    /// Create a SecretStore instance from configuration
    fn create(
        &self,
        config: &crate::config::SecretStoreConfig,
    ) -> Result<Box<dyn SecretStore>, crate::Error>;
}
