//! TXT record set types
//!
//! A [`RecordSet`] is the provider's complete state for one
//! (subname, type) pair. It is read fresh for every reconciliation and never
//! cached.
//!
//! `records` holds values exactly as they travel on the wire. For deSEC that
//! means each TXT value is wrapped in literal `"` characters; decoding happens
//! at the provider boundary through a [`ValueCodec`](crate::reconcile::ValueCodec).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The only record type this solver manages
pub const RECORD_TYPE_TXT: &str = "TXT";

/// TTL written with every create/update
pub const DEFAULT_TTL: u32 = 3600;

/// A provider record set, as returned by a read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Fully-qualified name, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Domain the record set belongs to, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Subdomain label
    #[serde(default)]
    pub subname: String,

    /// Record type
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: String,

    /// Wire-encoded values, in provider order
    pub records: Vec<String>,

    /// Time-to-live
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Creation timestamp, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

fn default_record_type() -> String {
    RECORD_TYPE_TXT.to_string()
}

/// The remote state of a record set, from the reconciler's point of view
///
/// A provider 404 is the `Absent` state, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRecordSet {
    /// No record set exists for the subname
    Absent,
    /// A record set exists
    Present(RecordSet),
}

impl RemoteRecordSet {
    /// Whether a record set exists
    pub fn is_present(&self) -> bool {
        matches!(self, RemoteRecordSet::Present(_))
    }

    /// Borrow the record set, if present
    pub fn record_set(&self) -> Option<&RecordSet> {
        match self {
            RemoteRecordSet::Present(set) => Some(set),
            RemoteRecordSet::Absent => None,
        }
    }
}

/// Body of a create (POST) or replace (PUT) request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSetPayload {
    /// Subdomain label
    pub subname: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Time-to-live
    pub ttl: u32,
    /// Wire-encoded values
    pub records: Vec<String>,
}

impl RecordSetPayload {
    /// TXT payload for `subname` with the default TTL
    pub fn txt(subname: impl Into<String>, records: Vec<String>) -> Self {
        Self {
            subname: subname.into(),
            record_type: RECORD_TYPE_TXT.to_string(),
            ttl: DEFAULT_TTL,
            records,
        }
    }
}
