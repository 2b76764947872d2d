// # dns01-core
//
// Core library for ACME DNS-01 TXT record reconciliation.
//
// ## Architecture Overview
//
// - **Transport**: Trait for authenticated, single-shot provider API calls
// - **SecretStore**: Trait for credential lookup by namespace + name
// - **ChallengeSolver**: Trait for the present / clean-up entry points
// - **reconcile**: The transition table from (remote state, intent) to the next call
// - **SolverRegistry**: Plugin-based registry of solvers by name
//
// ## Design Principles
//
// 1. **404 is a state**: a missing record set is `RemoteRecordSet::Absent`, not an error
// 2. **Wire formats at the edge**: value quoting lives behind `ValueCodec`
// 3. **Single-shot**: one read and at most one write per call, no retry
// 4. **No shared state**: every call reads the remote record set fresh

pub mod challenge;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod secrets;
pub mod traits;

// Re-export core types for convenience
pub use challenge::{
    ChallengeAction, ChallengePayload, ChallengeRequest, ChallengeResponse, subdomain_label,
};
pub use config::{ProviderConfig, SecretStoreConfig, SolverConfig, SolverMode};
pub use error::{Error, Result};
pub use reconcile::{Action, Intent, NoopReason, ValueCodec};
pub use record::{RecordSet, RecordSetPayload, RemoteRecordSet};
pub use registry::SolverRegistry;
pub use secrets::{FileSecretStore, MemorySecretStore};
pub use traits::{ChallengeSolver, ReconcileOutcome, SecretStore, Transport};
