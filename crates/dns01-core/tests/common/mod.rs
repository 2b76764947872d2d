//! Test doubles and common utilities for reconciliation contract tests

#![allow(dead_code)]

use dns01_core::reconcile::{self, PlainCodec};
use dns01_core::record::RECORD_TYPE_TXT;
use dns01_core::{Action, ChallengeAction, ChallengeRequest, Intent, RecordSet, RemoteRecordSet};
use std::collections::HashMap;

/// In-process stand-in for a provider's record set
///
/// Applies actions the way a well-behaved provider would and counts writes
/// so tests can assert on single-shot behavior.
#[derive(Debug, Default)]
pub struct SimulatedRemote {
    records: Option<Vec<String>>,
    pub creates: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl SimulatedRemote {
    /// No record set
    pub fn absent() -> Self {
        Self::default()
    }

    /// Record set holding `values`
    pub fn with_values(values: &[&str]) -> Self {
        Self {
            records: Some(values.iter().map(|v| v.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Current state as the reader would report it
    pub fn read(&self) -> RemoteRecordSet {
        match &self.records {
            None => RemoteRecordSet::Absent,
            Some(records) => RemoteRecordSet::Present(RecordSet {
                name: Some("_acme-challenge.example.com.".to_string()),
                domain: Some("example.com".to_string()),
                subname: "_acme-challenge".to_string(),
                record_type: RECORD_TYPE_TXT.to_string(),
                records: records.clone(),
                ttl: Some(3600),
                created: None,
            }),
        }
    }

    /// Apply `action`, panicking on calls a real provider would reject
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::Create(values) => {
                assert!(self.records.is_none(), "create over an existing record set");
                assert!(!values.is_empty(), "create with no values");
                self.records = Some(values.clone());
                self.creates += 1;
            }
            Action::Update(values) => {
                assert!(self.records.is_some(), "update of a missing record set");
                assert!(!values.is_empty(), "update with no values");
                self.records = Some(values.clone());
                self.updates += 1;
            }
            Action::Delete => {
                assert!(self.records.is_some(), "delete of a missing record set");
                self.records = None;
                self.deletes += 1;
            }
            Action::Noop(_) => {}
        }
    }

    /// Read, decide and apply once
    pub fn reconcile(&mut self, intent: &Intent) -> Action {
        let action = reconcile::plan(&self.read(), intent, &PlainCodec);
        self.apply(&action);
        action
    }

    /// Current values, `None` when absent
    pub fn values(&self) -> Option<&[String]> {
        self.records.as_deref()
    }

    /// Total number of writes
    pub fn writes(&self) -> usize {
        self.creates + self.updates + self.deletes
    }
}

pub fn add(token: &str) -> Intent {
    Intent::AddToken(token.to_string())
}

pub fn remove(token: &str) -> Intent {
    Intent::RemoveToken(token.to_string())
}

/// Secrets keyed the way the stores expect, holding one API key
pub fn secrets_with_key(namespace: &str, name: &str, key: &str, value: &str) -> HashMap<String, HashMap<String, String>> {
    let mut data = HashMap::new();
    data.insert(key.to_string(), value.to_string());

    let mut secrets = HashMap::new();
    secrets.insert(format!("{}/{}", namespace, name), data);
    secrets
}

/// A present challenge carrying `config`
pub fn challenge(namespace: &str, config: Option<serde_json::Value>) -> ChallengeRequest {
    ChallengeRequest {
        uid: "c0ffee".to_string(),
        action: ChallengeAction::Present,
        challenge_type: "dns-01".to_string(),
        dns_name: "example.com".to_string(),
        key: "token-value".to_string(),
        resource_namespace: namespace.to_string(),
        resolved_fqdn: "_acme-challenge.example.com.".to_string(),
        resolved_zone: "example.com.".to_string(),
        allow_ambient_credentials: false,
        config,
    }
}
