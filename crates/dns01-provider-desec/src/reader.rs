//! Record set reads
//!
//! ## API Calls
//!
//! ```http
//! GET {base}/domains/{domain}/rrsets/{subname}/TXT/
//! Authorization: Token <key>
//! ```
//!
//! - 200 + valid body → `RemoteRecordSet::Present`
//! - 404 → `RemoteRecordSet::Absent` (no challenge record yet)
//! - 200 + unparseable body, or any other status → `Error::Fetch`

use dns01_core::record::RECORD_TYPE_TXT;
use dns01_core::traits::{ApiRequest, Transport};
use dns01_core::{Error, ProviderConfig, RecordSet, RemoteRecordSet, Result};
use std::sync::Arc;

/// Collection URL, target of creates
pub fn rrsets_url(config: &ProviderConfig) -> String {
    format!(
        "{}/domains/{}/rrsets/",
        config.api_base_url, config.domain_name
    )
}

/// Subname-scoped URL, target of reads, replaces and deletes
pub fn rrset_url(config: &ProviderConfig, subname: &str) -> String {
    format!(
        "{}/domains/{}/rrsets/{}/{}/",
        config.api_base_url, config.domain_name, subname, RECORD_TYPE_TXT
    )
}

/// Reads the current TXT record set for a subname
#[derive(Clone)]
pub struct RecordSetReader {
    transport: Arc<dyn Transport>,
}

impl RecordSetReader {
    /// Create a reader over `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch the record set for `subname`
    pub async fn fetch(&self, config: &ProviderConfig, subname: &str) -> Result<RemoteRecordSet> {
        let url = rrset_url(config, subname);

        let response = self
            .transport
            .execute(ApiRequest::get(url.as_str()), config)
            .await
            .map_err(|e| match e {
                Error::Transport { status, url, body, .. } => Error::fetch(status, url, body),
                other => other,
            })?;

        match response.status {
            404 => {
                tracing::debug!(subname, "No TXT record set found");
                Ok(RemoteRecordSet::Absent)
            }
            200 => {
                let set: RecordSet = serde_json::from_str(&response.body).map_err(|e| {
                    Error::fetch(
                        response.status,
                        url.as_str(),
                        format!("invalid record set body ({}): {}", e, response.body),
                    )
                })?;

                tracing::debug!(subname, values = set.records.len(), "TXT record set found");
                Ok(RemoteRecordSet::Present(set))
            }
            status => Err(Error::fetch(status, url, response.body)),
        }
    }
}
