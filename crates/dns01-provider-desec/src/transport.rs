//! reqwest-backed transport for the deSEC REST API
//!
//! Every request carries `Authorization: Token <api key>` and a JSON content
//! type. No timeout is configured beyond the HTTP stack default: overall
//! deadlines belong to the ACME host.

use async_trait::async_trait;
use dns01_core::traits::{ApiRequest, ApiResponse, HttpMethod, Transport, classify};
use dns01_core::{Error, ProviderConfig, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

/// User agent sent with every request
const USER_AGENT: &str = concat!("dns01-provider-desec/", env!("CARGO_PKG_VERSION"));

/// HTTP transport
///
/// # Trust Level: Untrusted
///
/// Single-shot: one HTTP request per `execute`, no retry, no caching.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Short explanation of a rejected status, for log output
fn describe_status(status: u16) -> &'static str {
    match status {
        401 | 403 => "authentication failed: invalid API token or insufficient permissions",
        404 => "resource not found",
        409 => "conflict: record set changed concurrently",
        429 => "rate limit exceeded",
        500..=599 => "provider server error (transient)",
        _ => "request rejected",
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest, config: &ProviderConfig) -> Result<ApiResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "Calling provider API");

        let mut builder = self
            .client
            .request(reqwest_method(request.method), &request.url)
            .header(AUTHORIZATION, format!("Token {}", config.api_key))
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            Error::network(format!(
                "{} {} failed: {}",
                request.method, request.url, e
            ))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        let result = classify(&request, status, body);
        if let Err(e) = &result {
            tracing::error!(
                method = %request.method,
                url = %request.url,
                status,
                "Provider API call failed ({}): {}",
                describe_status(status),
                e
            );
        }
        result
    }
}
