//! Challenge protocol types exchanged with the ACME host
//!
//! These mirror cert-manager's webhook `ChallengePayload` JSON: a `request`
//! describing one DNS-01 challenge and a `response` the solver fills in.

use serde::{Deserialize, Serialize};

/// API version of the challenge payload
pub const CHALLENGE_API_VERSION: &str = "acme.cert-manager.io/v1alpha1";

/// Kind of the challenge payload
pub const CHALLENGE_KIND: &str = "ChallengePayload";

/// Which lifecycle event the host is reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    /// The token must be published
    Present,
    /// The token must be withdrawn
    CleanUp,
}

/// A single DNS-01 challenge, as supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Host-assigned identifier, echoed in the response
    #[serde(default)]
    pub uid: String,

    /// Lifecycle event
    pub action: ChallengeAction,

    /// Challenge type (always "dns-01" here)
    #[serde(default, rename = "type")]
    pub challenge_type: String,

    /// Name being validated (e.g. "example.com" or "*.example.com")
    #[serde(default)]
    pub dns_name: String,

    /// The token value that must appear in the TXT record set
    pub key: String,

    /// Namespace used to resolve secrets
    #[serde(default)]
    pub resource_namespace: String,

    /// Fully-qualified record name, always with a trailing dot
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Zone the host resolved for the record, with a trailing dot
    #[serde(default)]
    pub resolved_zone: String,

    /// Whether ambient credentials may be used (ignored by this solver)
    #[serde(default)]
    pub allow_ambient_credentials: bool,

    /// Raw per-challenge solver configuration
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// Failure description attached to an unsuccessful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeStatus {
    /// Human-readable error message
    pub message: String,
}

/// The solver's answer to a [`ChallengeRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// Echo of the request uid
    pub uid: String,
    /// Whether the operation completed without a surfaced error
    pub success: bool,
    /// Failure details, set only when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ChallengeStatus>,
}

impl ChallengeResponse {
    /// Successful response for `uid`
    pub fn success(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            success: true,
            status: None,
        }
    }

    /// Failed response for `uid` carrying `message`
    pub fn failure(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            success: false,
            status: Some(ChallengeStatus {
                message: message.into(),
            }),
        }
    }
}

/// Envelope the host sends and expects back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// API version
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Kind
    #[serde(default = "default_kind")]
    pub kind: String,
    /// The challenge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,
    /// The solver's answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

fn default_api_version() -> String {
    CHALLENGE_API_VERSION.to_string()
}

fn default_kind() -> String {
    CHALLENGE_KIND.to_string()
}

/// Strip the trailing dot of a fully-qualified name
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Derive the subdomain label of `fqdn` relative to `domain`
///
/// `"_acme-challenge.www.example.com."` under `"example.com"` yields
/// `"_acme-challenge.www"`. The domain must be a proper suffix of the name,
/// separated by a dot; anything else is rejected rather than truncated.
pub fn subdomain_label(fqdn: &str, domain: &str) -> Result<String, crate::Error> {
    let name = un_fqdn(fqdn);
    let domain = un_fqdn(domain);

    if domain.is_empty() {
        return Err(crate::Error::config("domain name cannot be empty"));
    }

    let label = name
        .strip_suffix(domain)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|label| !label.is_empty())
        .ok_or_else(|| {
            crate::Error::invalid_input(format!(
                "FQDN {} is not a subdomain of {}",
                fqdn, domain
            ))
        })?;

    Ok(label.to_string())
}
