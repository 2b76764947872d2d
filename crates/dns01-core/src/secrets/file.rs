// # File Secret Store
//
// File-based implementation of SecretStore.
//
// ## Purpose
//
// Reads credentials from a JSON document, typically mounted into the
// container from the cluster's secret store. The file is re-read on every
// lookup so rotated keys are picked up without a restart.
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "secrets": {
//     "cert-manager/desec-token": {
//       "api-key": "..."
//     }
//   }
// }
// ```
//
// ## Corruption
//
// A malformed file is an error, never an empty store: treating it as empty
// would turn a broken mount into "secret not found" for every challenge.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::config::SecretStoreConfig;
use crate::traits::secret_store::{SecretData, SecretStore, SecretStoreFactory, secret_ref};

/// Secrets file format version
const SECRETS_FILE_VERSION: &str = "1.0";

/// Serializable secrets file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SecretsFileFormat {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    secrets: HashMap<String, HashMap<String, String>>,
}

fn default_version() -> String {
    SECRETS_FILE_VERSION.to_string()
}

/// File-based secret store
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::FileSecretStore;
/// use dns01_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileSecretStore::new("/etc/dns01/secrets.json")?;
///     let secret = store.get_secret("cert-manager", "desec-token").await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Open a file secret store
    ///
    /// Fails if the file does not exist; the contents are only parsed on lookup.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if !path.is_file() {
            return Err(Error::config(format!(
                "Secrets file does not exist: {}",
                path.display()
            )));
        }

        Ok(Self { path })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the secrets file
    async fn load(&self) -> Result<HashMap<String, HashMap<String, String>>, Error> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::secret_store(format!(
                "Failed to read secrets file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let file: SecretsFileFormat = serde_json::from_str(&content).map_err(|e| {
            Error::secret_store(format!(
                "Failed to parse secrets file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if file.version != SECRETS_FILE_VERSION {
            tracing::warn!(
                "Secrets file version mismatch: expected {}, got {}. \
                Attempting to read anyway.",
                SECRETS_FILE_VERSION,
                file.version
            );
        }

        tracing::trace!(
            "Loaded secrets file {}: {} secret(s)",
            self.path.display(),
            file.secrets.len()
        );
        Ok(file.secrets)
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<SecretData>, Error> {
        let mut secrets = self.load().await?;
        Ok(secrets
            .remove(&secret_ref(namespace, name))
            .map(SecretData::new))
    }

    fn store_type(&self) -> &'static str {
        "file"
    }
}

/// Factory for file secret stores
pub struct FileSecretStoreFactory;

impl SecretStoreFactory for FileSecretStoreFactory {
    fn create(&self, config: &SecretStoreConfig) -> Result<Box<dyn SecretStore>, Error> {
        match config {
            SecretStoreConfig::File { path } => Ok(Box::new(FileSecretStore::new(path)?)),
            _ => Err(Error::config("Invalid config for file secret store")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "version": "1.0",
        "secrets": {
            "cert-manager/desec-token": { "api-key": "first" }
        }
    }"#;

    #[tokio::test]
    async fn test_file_store_lookup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, SAMPLE).await.unwrap();

        let store = FileSecretStore::new(&path).unwrap();
        let secret = store
            .get_secret("cert-manager", "desec-token")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(secret.get("api-key"), Some("first"));

        let missing = store.get_secret("cert-manager", "other").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_file_store_sees_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, SAMPLE).await.unwrap();

        let store = FileSecretStore::new(&path).unwrap();

        fs::write(&path, SAMPLE.replace("first", "second")).await.unwrap();

        let secret = store
            .get_secret("cert-manager", "desec-token")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(secret.get("api-key"), Some("second"));
    }

    #[tokio::test]
    async fn test_file_store_corruption_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, b"corrupted json data").await.unwrap();

        let store = FileSecretStore::new(&path).unwrap();
        let err = store.get_secret("cert-manager", "desec-token").await.unwrap_err();
        assert!(matches!(err, Error::SecretStore(_)));
    }

    #[tokio::test]
    async fn test_file_removed_after_open_is_secret_store_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, SAMPLE).await.unwrap();

        let store = FileSecretStore::new(&path).unwrap();
        fs::remove_file(&path).await.unwrap();

        let err = store.get_secret("cert-manager", "desec-token").await.unwrap_err();
        match err {
            Error::SecretStore(message) => assert!(message.contains("Failed to read secrets file")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempdir().unwrap();
        let err = FileSecretStore::new(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
