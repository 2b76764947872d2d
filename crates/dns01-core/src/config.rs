//! Configuration types for the DNS-01 solver
//!
//! Three layers of configuration exist:
//!
//! - [`SolverConfig`]: the small JSON object the host attaches to every
//!   challenge (`apiUrl`, `domainName`, `secretName`, `secretKeyName`)
//! - [`ProviderConfig`]: the resolved, immutable per-invocation view with the
//!   API key filled in from the secret store
//! - [`SecretStoreConfig`]: how `initialize` builds the credential client

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-challenge solver configuration, as supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Provider API base URL (e.g. "https://desec.io/api/v1")
    #[serde(default)]
    pub api_url: String,

    /// Registered domain managed at the provider (e.g. "example.com")
    #[serde(default)]
    pub domain_name: String,

    /// Name of the secret holding the API key
    #[serde(default)]
    pub secret_name: String,

    /// Key inside the secret whose value is the API key
    #[serde(default)]
    pub secret_key_name: String,
}

impl SolverConfig {
    /// Decode the raw per-challenge JSON
    ///
    /// A missing (`None` or JSON `null`) config decodes to the empty default,
    /// which [`SolverConfig::validate`] then rejects with a precise message.
    pub fn from_json(raw: Option<&serde_json::Value>) -> Result<Self, crate::Error> {
        match raw {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                crate::Error::config(format!("error decoding solver config: {}", e))
            }),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_url.is_empty() {
            return Err(crate::Error::config("solver config is missing apiUrl"));
        }
        if !self.api_url.starts_with("https://") && !self.api_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "apiUrl must use HTTP or HTTPS scheme. Got: {}",
                self.api_url
            )));
        }
        if self.domain_name.is_empty() {
            return Err(crate::Error::config("solver config is missing domainName"));
        }
        if self.secret_name.is_empty() {
            return Err(crate::Error::config("solver config is missing secretName"));
        }
        if self.secret_key_name.is_empty() {
            return Err(crate::Error::config("solver config is missing secretKeyName"));
        }
        Ok(())
    }
}

/// Resolved provider configuration for a single invocation
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API base URL without trailing slash
    pub api_base_url: String,
    /// Registered domain name, without trailing dot
    pub domain_name: String,
    /// API key
    /// ⚠️ NEVER log this value
    pub api_key: String,
}

impl ProviderConfig {
    /// Create a provider config, normalizing the base URL and domain name
    pub fn new(
        api_base_url: impl Into<String>,
        domain_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let api_base_url: String = api_base_url.into();
        let domain_name: String = domain_name.into();

        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            domain_name: domain_name.trim_end_matches('.').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_base_url.is_empty() {
            return Err(crate::Error::config("Provider API URL cannot be empty"));
        }
        if self.domain_name.is_empty() {
            return Err(crate::Error::config("Provider domain name cannot be empty"));
        }
        if self.api_key.is_empty() {
            return Err(crate::Error::config("Provider API key cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_base_url", &self.api_base_url)
            .field("domain_name", &self.domain_name)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

/// Secret store configuration
///
/// This is the "host client config" handed to `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretStoreConfig {
    /// JSON file re-read on every lookup
    File {
        /// Path to the secrets file
        path: String,
    },

    /// In-memory secrets (not persistent)
    Memory {
        /// Secrets keyed by "<namespace>/<name>"
        #[serde(default)]
        secrets: HashMap<String, HashMap<String, String>>,
    },
}

impl SecretStoreConfig {
    /// Validate the secret store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            SecretStoreConfig::File { path } => {
                if path.is_empty() {
                    return Err(crate::Error::config("Secret store file path cannot be empty"));
                }
                Ok(())
            }
            SecretStoreConfig::Memory { .. } => Ok(()),
        }
    }

    /// Get the store type name used for registry lookups
    pub fn type_name(&self) -> &'static str {
        match self {
            SecretStoreConfig::File { .. } => "file",
            SecretStoreConfig::Memory { .. } => "memory",
        }
    }
}

impl Default for SecretStoreConfig {
    fn default() -> Self {
        SecretStoreConfig::Memory {
            secrets: HashMap::new(),
        }
    }
}

/// Write mode for a solver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverMode {
    /// Reads and writes against the provider
    #[default]
    Live,
    /// Reads and decides, logs the write, never sends it
    DryRun,
}

impl SolverMode {
    /// Parse the `DNS01_MODE` value ("live" or "dry-run"), defaulting to live
    pub fn from_env_value(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dry-run" | "dryrun" => SolverMode::DryRun,
            _ => SolverMode::Live,
        }
    }

    /// Whether writes are suppressed
    pub fn is_dry_run(&self) -> bool {
        matches!(self, SolverMode::DryRun)
    }
}
