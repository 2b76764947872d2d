//! Per-challenge provider configuration resolution
//!
//! Turns the challenge's raw config JSON plus a secret-store lookup into an
//! immutable [`ProviderConfig`]. Every failure here is an
//! [`Error::Config`](crate::Error::Config): it is fatal to the call and
//! surfaced to the host.

use crate::challenge::ChallengeRequest;
use crate::config::{ProviderConfig, SolverConfig};
use crate::error::{Error, Result};
use crate::traits::SecretStore;

/// Resolve the provider configuration for one challenge
pub async fn resolve_provider_config(
    store: &dyn SecretStore,
    request: &ChallengeRequest,
) -> Result<ProviderConfig> {
    let solver_config = SolverConfig::from_json(request.config.as_ref())?;
    solver_config.validate()?;

    let namespace = &request.resource_namespace;
    let secret_name = &solver_config.secret_name;
    let key_name = &solver_config.secret_key_name;

    let secret = store
        .get_secret(namespace, secret_name)
        .await
        .map_err(|e| {
            Error::config(format!(
                "unable to get secret `{}/{}`; {}",
                namespace, secret_name, e
            ))
        })?
        .ok_or_else(|| {
            Error::config(format!(
                "unable to get secret `{}/{}`; secret not found",
                namespace, secret_name
            ))
        })?;

    let api_key = secret.get(key_name).ok_or_else(|| {
        Error::config(format!(
            "unable to get api-key from secret `{}/{}`; key {:?} not found in secret data",
            namespace, secret_name, key_name
        ))
    })?;

    let config = ProviderConfig::new(
        solver_config.api_url.as_str(),
        solver_config.domain_name.as_str(),
        api_key,
    );
    config.validate()?;

    tracing::debug!(
        namespace = %namespace,
        secret = %secret_name,
        domain = %config.domain_name,
        "Resolved provider configuration"
    );
    Ok(config)
}
