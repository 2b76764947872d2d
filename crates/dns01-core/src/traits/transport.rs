// # Transport Trait
//
// Defines the interface for authenticated provider API calls.
//
// ## Implementations
//
// - reqwest-backed: `dns01-provider-desec` crate (`HttpTransport`)
// - Test doubles: recording transports in the provider's contract tests
//
// ## Status Classification
//
// Providers use HTTP status as a state signal. For GET, a 404 means "no
// record set" and is passed through to the caller as a normal response.
// For every other method only 2xx is accepted. Implementations route every
// response through [`classify`] so this rule lives in one place.

use async_trait::async_trait;
use std::fmt;

use crate::config::ProviderConfig;

/// HTTP methods used against the provider API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Read
    Get,
    /// Create
    Post,
    /// Replace
    Put,
    /// Remove
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single provider API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Method
    pub method: HttpMethod,
    /// Absolute URL
    pub url: String,
    /// Optional JSON body
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// GET without a body
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    /// Request with a JSON body
    pub fn with_body(method: HttpMethod, url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method,
            url: url.into(),
            body: Some(body),
        }
    }

    /// DELETE without a body
    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            url: url.into(),
            body: None,
        }
    }
}

/// An accepted provider response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl ApiResponse {
    /// Whether the provider reported "not found"
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Whether `status` is a non-error outcome for `method`
pub fn is_accepted_status(method: HttpMethod, status: u16) -> bool {
    let success = (200..300).contains(&status);
    match method {
        HttpMethod::Get => success || status == 404,
        _ => success,
    }
}

/// Turn a raw (status, body) pair into an accepted response or a transport error
pub fn classify(request: &ApiRequest, status: u16, body: String) -> Result<ApiResponse, crate::Error> {
    if is_accepted_status(request.method, status) {
        Ok(ApiResponse { status, body })
    } else {
        Err(crate::Error::transport(
            status,
            request.method.as_str(),
            request.url.clone(),
            body,
        ))
    }
}

/// Trait for provider transports
///
/// # Trust Level: Untrusted
///
/// Transports are single-shot: one request per call, no retry, no backoff,
/// no caching. The host re-invokes present/clean-up on its own schedule.
///
/// # Security
///
/// The API key from `config` authenticates the request and must never be
/// logged.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: the status was accepted (see [`is_accepted_status`])
    /// - `Err(Error::Transport)`: any other status, with status, method, URL and body
    /// - `Err(Error::Network)`: the request could not be completed
    async fn execute(
        &self,
        request: ApiRequest,
        config: &ProviderConfig,
    ) -> Result<ApiResponse, crate::Error>;
}
