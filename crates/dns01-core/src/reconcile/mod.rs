//! TXT record set reconciliation
//!
//! Given the current remote state and the requested intent, compute the single
//! provider call that moves the record set toward the desired state.
//!
//! ## Transition table
//!
//! | Current            | Intent        | Action                         |
//! |--------------------|---------------|--------------------------------|
//! | Absent             | `Add(t)`      | Create `[t]`                   |
//! | Absent             | `Remove(t)`   | Noop                           |
//! | Present(vs)        | `Add(t)`      | Update `vs ++ [t]`             |
//! | Present(vs), t∈vs  | `Remove(t)`   | Update `vs` without any `t`, or Delete if empty |
//! | Present(vs), t∉vs  | `Remove(t)`   | Noop                           |
//!
//! [`decide`] works purely on decoded values. [`plan`] wraps it with a
//! [`ValueCodec`] so provider wire conventions never reach the table.

use crate::record::RemoteRecordSet;

/// Encode/decode pair for provider wire values
///
/// Values are decoded exactly once after a read and encoded exactly once
/// before a write.
pub trait ValueCodec: Send + Sync {
    /// Domain value → wire value
    fn encode(&self, value: &str) -> String;

    /// Wire value → domain value
    fn decode(&self, wire: &str) -> String;
}

/// Identity codec for providers that send values verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl ValueCodec for PlainCodec {
    fn encode(&self, value: &str) -> String {
        value.to_string()
    }

    fn decode(&self, wire: &str) -> String {
        wire.to_string()
    }
}

/// What the caller wants to be true for a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The token must be among the record values
    AddToken(String),
    /// One occurrence of the token must be withdrawn
    RemoveToken(String),
}

impl Intent {
    /// The token this intent is about
    pub fn token(&self) -> &str {
        match self {
            Intent::AddToken(token) | Intent::RemoveToken(token) => token,
        }
    }
}

/// Why no write is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    /// Nothing to remove, the record set does not exist
    Absent,
    /// The token is not among the current values
    TokenNotPresent,
}

/// The next provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Insert a new record set with these values
    Create(Vec<String>),
    /// Replace the whole record set with these values
    Update(Vec<String>),
    /// Remove the whole record set
    Delete,
    /// No write
    Noop(NoopReason),
}

impl Action {
    /// HTTP-style verb used in log lines
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Create(_) => "create",
            Action::Update(_) => "update",
            Action::Delete => "delete",
            Action::Noop(_) => "noop",
        }
    }

    /// Whether this action writes to the provider
    pub fn is_write(&self) -> bool {
        !matches!(self, Action::Noop(_))
    }

    /// Values carried by a create or update
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Action::Create(values) | Action::Update(values) => Some(values.as_slice()),
            Action::Delete | Action::Noop(_) => None,
        }
    }

    fn map_values(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Action::Create(values) => Action::Create(values.iter().map(|v| f(v.as_str())).collect()),
            Action::Update(values) => Action::Update(values.iter().map(|v| f(v.as_str())).collect()),
            other => other,
        }
    }
}

/// Decide the next action from decoded values
///
/// `current` is `None` when the record set is absent. Additions append and
/// keep duplicates. Removal withdraws every occurrence of the token, so a
/// present retried after a successful write never leaves a stale value.
pub fn decide(current: Option<&[String]>, intent: &Intent) -> Action {
    match (current, intent) {
        (None, Intent::AddToken(token)) => Action::Create(vec![token.clone()]),
        (None, Intent::RemoveToken(_)) => Action::Noop(NoopReason::Absent),
        (Some(values), Intent::AddToken(token)) => {
            let mut next = values.to_vec();
            next.push(token.clone());
            Action::Update(next)
        }
        (Some(values), Intent::RemoveToken(token)) => {
            let next: Vec<String> = values.iter().filter(|v| *v != token).cloned().collect();
            if next.len() == values.len() {
                return Action::Noop(NoopReason::TokenNotPresent);
            }

            if next.is_empty() {
                Action::Delete
            } else {
                Action::Update(next)
            }
        }
    }
}

/// Decide the next action from the remote state, handling wire encoding
///
/// Values returned in `Create`/`Update` are wire-encoded and ready to be
/// placed in the write payload.
pub fn plan(remote: &RemoteRecordSet, intent: &Intent, codec: &dyn ValueCodec) -> Action {
    let decoded: Option<Vec<String>> = remote
        .record_set()
        .map(|set| set.records.iter().map(|v| codec.decode(v)).collect());

    decide(decoded.as_deref(), intent).map_values(|v| codec.encode(v))
}
