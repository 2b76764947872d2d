// # Memory Secret Store
//
// In-memory implementation of SecretStore.
//
// ## When to Use
//
// - Testing environments
// - Embedding the solver in a host that already holds credentials

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::config::SecretStoreConfig;
use crate::traits::secret_store::{SecretData, SecretStore, SecretStoreFactory, secret_ref};

/// In-memory secret store implementation
///
/// Secrets are kept in a HashMap keyed by "<namespace>/<name>" and protected
/// by a RwLock. Clones share the same underlying map.
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::MemorySecretStore;
/// use dns01_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemorySecretStore::new();
///     store.insert_secret("cert-manager", "desec-token", [("api-key", "t0k3n")]).await;
///
///     let secret = store.get_secret("cert-manager", "desec-token").await?;
///     assert_eq!(secret.unwrap().get("api-key"), Some("t0k3n"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemorySecretStore {
    inner: Arc<RwLock<HashMap<String, SecretData>>>,
}

impl MemorySecretStore {
    /// Create a new empty memory secret store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store pre-populated from "<namespace>/<name>" → key/value maps
    pub fn from_entries(entries: HashMap<String, HashMap<String, String>>) -> Self {
        let secrets = entries
            .into_iter()
            .map(|(reference, data)| (reference, SecretData::new(data)))
            .collect();

        Self {
            inner: Arc::new(RwLock::new(secrets)),
        }
    }

    /// Insert or replace a secret
    pub async fn insert_secret<K, V>(
        &self,
        namespace: &str,
        name: &str,
        entries: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<String>,
    {
        let data: HashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut guard = self.inner.write().await;
        guard.insert(secret_ref(namespace, name), SecretData::new(data));
    }

    /// Remove a secret
    pub async fn remove_secret(&self, namespace: &str, name: &str) {
        let mut guard = self.inner.write().await;
        guard.remove(&secret_ref(namespace, name));
    }

    /// Get the number of secrets in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl Default for MemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<SecretData>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(&secret_ref(namespace, name)).cloned())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

/// Factory for memory secret stores
pub struct MemorySecretStoreFactory;

impl SecretStoreFactory for MemorySecretStoreFactory {
    fn create(&self, config: &SecretStoreConfig) -> Result<Box<dyn SecretStore>, Error> {
        match config {
            SecretStoreConfig::Memory { secrets } => {
                Ok(Box::new(MemorySecretStore::from_entries(secrets.clone())))
            }
            _ => Err(Error::config("Invalid config for memory secret store")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemorySecretStore::new();

        // Initially empty
        assert!(store.is_empty().await);

        store
            .insert_secret("cert-manager", "desec-token", [("api-key", "abc")])
            .await;
        assert_eq!(store.len().await, 1);

        let secret = store.get_secret("cert-manager", "desec-token").await.unwrap();
        assert_eq!(secret.unwrap().get("api-key"), Some("abc"));

        // Namespaces are isolated
        let other = store.get_secret("default", "desec-token").await.unwrap();
        assert!(other.is_none());

        store.remove_secret("cert-manager", "desec-token").await;
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_factory_builds_from_config() {
        let mut data = HashMap::new();
        data.insert("api-key".to_string(), "abc".to_string());
        let mut secrets = HashMap::new();
        secrets.insert("cert-manager/desec-token".to_string(), data);

        let store = MemorySecretStoreFactory
            .create(&SecretStoreConfig::Memory { secrets })
            .unwrap();
        assert_eq!(store.store_type(), "memory");

        let secret = block_on(store.get_secret("cert-manager", "desec-token")).unwrap();
        assert_eq!(secret.unwrap().get("api-key"), Some("abc"));
    }

    #[test]
    fn test_factory_rejects_other_config() {
        let config = SecretStoreConfig::File {
            path: "/tmp/secrets.json".to_string(),
        };
        assert!(MemorySecretStoreFactory.create(&config).is_err());
    }
}
