//! Test doubles and common utilities for solver contract tests
//!
//! `FakeDesec` is an in-memory stand-in for the deSEC rrset API. It keeps one
//! TXT record set, answers GET/POST/PUT/DELETE the way the real API does, and
//! records every call so tests can assert on exactly what was sent.

#![allow(dead_code)]

use async_trait::async_trait;
use dns01_core::traits::{ApiRequest, ApiResponse, HttpMethod, Transport, classify};
use dns01_core::{
    ChallengeAction, ChallengeRequest, ProviderConfig, Result, SecretStoreConfig, SolverMode,
};
use dns01_provider_desec::DesecSolver;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const API_BASE: &str = "https://desec.test/api/v1";
pub const DOMAIN: &str = "example.com";
pub const NAMESPACE: &str = "cert-manager";
pub const SECRET_NAME: &str = "desec-token";
pub const SECRET_KEY: &str = "api-key";
pub const API_KEY: &str = "test-api-key-0123456789";
pub const SUBNAME: &str = "_acme-challenge";

/// A call the solver made
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub api_key: String,
}

impl RecordedCall {
    /// `records` array of the payload, if any
    pub fn records(&self) -> Option<Vec<String>> {
        let records = self.body.as_ref()?.get("records")?.as_array()?;
        Some(
            records
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }
}

#[derive(Default)]
struct FakeState {
    /// Wire-encoded values, `None` when the record set does not exist
    records: Option<Vec<String>>,
    calls: Vec<RecordedCall>,
    /// Canned (status, body) per method, consumed once
    overrides: HashMap<HttpMethod, (u16, String)>,
}

/// In-memory deSEC rrset API
#[derive(Clone, Default)]
pub struct FakeDesec {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDesec {
    /// No record set exists
    pub fn absent() -> Self {
        Self::default()
    }

    /// A record set exists with these decoded values
    pub fn with_values(values: &[&str]) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().records =
            Some(values.iter().map(|v| format!("\"{}\"", v)).collect());
        fake
    }

    /// Answer the next `method` call with a canned response
    pub fn respond_once(&self, method: HttpMethod, status: u16, body: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .overrides
            .insert(method, (status, body.into()));
    }

    /// Every call, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls with `method`
    pub fn calls_with(&self, method: HttpMethod) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    /// Number of non-GET calls
    pub fn write_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method != HttpMethod::Get)
            .count()
    }

    /// Current decoded values, `None` when absent
    pub fn values(&self) -> Option<Vec<String>> {
        self.state.lock().unwrap().records.as_ref().map(|records| {
            records
                .iter()
                .map(|v| v.trim_matches('"').to_string())
                .collect()
        })
    }

    fn rrset_body(records: &[String]) -> String {
        json!({
            "created": "2024-03-01T12:00:00.000000Z",
            "domain": DOMAIN,
            "subname": SUBNAME,
            "name": format!("{}.{}.", SUBNAME, DOMAIN),
            "type": "TXT",
            "records": records,
            "ttl": 3600,
            "touched": "2024-03-01T12:00:00.000000Z"
        })
        .to_string()
    }

    fn payload_records(body: &Option<serde_json::Value>) -> Vec<String> {
        body.as_ref()
            .and_then(|b| b.get("records"))
            .and_then(|r| r.as_array())
            .map(|r| {
                r.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn handle(state: &mut FakeState, request: &ApiRequest) -> (u16, String) {
        if let Some(canned) = state.overrides.remove(&request.method) {
            return canned;
        }

        match request.method {
            HttpMethod::Get => match &state.records {
                Some(records) => (200, Self::rrset_body(records)),
                None => (404, r#"{"detail":"Not found."}"#.to_string()),
            },
            HttpMethod::Post => {
                if state.records.is_some() {
                    return (400, r#"{"non_field_errors":["Another RRset exists."]}"#.to_string());
                }
                let records = Self::payload_records(&request.body);
                let body = Self::rrset_body(&records);
                state.records = Some(records);
                (201, body)
            }
            HttpMethod::Put => {
                if state.records.is_none() {
                    return (404, r#"{"detail":"Not found."}"#.to_string());
                }
                let records = Self::payload_records(&request.body);
                let body = Self::rrset_body(&records);
                state.records = Some(records);
                (200, body)
            }
            HttpMethod::Delete => {
                state.records = None;
                (204, String::new())
            }
        }
    }
}

#[async_trait]
impl Transport for FakeDesec {
    async fn execute(&self, request: ApiRequest, config: &ProviderConfig) -> Result<ApiResponse> {
        let (status, body) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(RecordedCall {
                method: request.method,
                url: request.url.clone(),
                body: request.body.clone(),
                api_key: config.api_key.clone(),
            });
            Self::handle(&mut state, &request)
        };

        classify(&request, status, body)
    }
}

/// Secret store configuration holding the test API key
pub fn secret_store_config() -> SecretStoreConfig {
    let mut data = HashMap::new();
    data.insert(SECRET_KEY.to_string(), API_KEY.to_string());
    let mut secrets = HashMap::new();
    secrets.insert(format!("{}/{}", NAMESPACE, SECRET_NAME), data);
    SecretStoreConfig::Memory { secrets }
}

/// An initialized live solver over `fake`
pub fn solver_over(fake: &FakeDesec) -> DesecSolver {
    solver_with_mode(fake, SolverMode::Live)
}

/// An initialized solver over `fake` in `mode`
pub fn solver_with_mode(fake: &FakeDesec, mode: SolverMode) -> DesecSolver {
    use dns01_core::ChallengeSolver;

    let mut solver = DesecSolver::with_transport(Arc::new(fake.clone()), mode);
    solver
        .initialize(&secret_store_config())
        .expect("memory secret store initializes");
    solver
}

/// Per-challenge solver config JSON
pub fn solver_config_json() -> serde_json::Value {
    json!({
        "apiUrl": API_BASE,
        "domainName": DOMAIN,
        "secretName": SECRET_NAME,
        "secretKeyName": SECRET_KEY
    })
}

/// A challenge for `token` at `_acme-challenge.example.com.`
pub fn challenge(action: ChallengeAction, token: &str) -> ChallengeRequest {
    ChallengeRequest {
        uid: "9a0e4f1c-test".to_string(),
        action,
        challenge_type: "dns-01".to_string(),
        dns_name: DOMAIN.to_string(),
        key: token.to_string(),
        resource_namespace: NAMESPACE.to_string(),
        resolved_fqdn: format!("{}.{}.", SUBNAME, DOMAIN),
        resolved_zone: format!("{}.", DOMAIN),
        allow_ambient_credentials: false,
        config: Some(solver_config_json()),
    }
}

/// Subname-scoped URL the solver must use
pub fn rrset_url() -> String {
    format!("{}/domains/{}/rrsets/{}/TXT/", API_BASE, DOMAIN, SUBNAME)
}

/// Collection URL the solver must use for creates
pub fn rrsets_url() -> String {
    format!("{}/domains/{}/rrsets/", API_BASE, DOMAIN)
}

/// Wire-encode decoded values
pub fn quoted(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| format!("\"{}\"", v)).collect()
}
