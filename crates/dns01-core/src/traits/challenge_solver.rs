// # Challenge Solver Trait
//
// Defines the interface the ACME host drives for DNS-01 challenges.
//
// ## Implementations
//
// - deSEC: `dns01-provider-desec` crate
//
// ## Lifecycle
//
// 1. `initialize` once, with the secret store configuration
// 2. `present` when a challenge needs its token published
// 3. `clean_up` when the challenge is finished (successfully or not)
//
// The host may call `present`/`clean_up` again after a failure; each call
// re-reads the remote state, so repeated calls converge.

use async_trait::async_trait;

use crate::challenge::ChallengeRequest;
use crate::config::{SecretStoreConfig, SolverMode};
use crate::reconcile::Action;

/// What a present/clean-up call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Subdomain label the record set lives under
    pub subname: String,
    /// The action decided (values wire-encoded)
    pub action: Action,
    /// Whether the write was suppressed by dry-run mode
    pub dry_run: bool,
}

/// Trait for DNS-01 challenge solvers
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ One record-set read and at most one write per call
/// - ✅ Credential lookups through the configured secret store
///
/// ## Forbidden Capabilities
/// - ❌ Retry or backoff (owned by the host)
/// - ❌ Poll for DNS propagation (owned by the host)
/// - ❌ Cache record sets between calls
/// - ❌ Spawn background tasks
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Globally unique solver name the host routes by
    fn name(&self) -> &'static str;

    /// Build the credential client
    ///
    /// A failure here is a configuration error and fatal for the process.
    fn initialize(&mut self, host_config: &SecretStoreConfig) -> Result<(), crate::Error>;

    /// Ensure the challenge token is present in the TXT record set
    async fn present(&self, request: &ChallengeRequest) -> Result<ReconcileOutcome, crate::Error>;

    /// Ensure every occurrence of the challenge token is gone from the TXT record set
    async fn clean_up(&self, request: &ChallengeRequest)
    -> Result<ReconcileOutcome, crate::Error>;
}

/// Helper trait for constructing solvers by name
pub trait ChallengeSolverFactory: Send + Sync {
    /// Create an uninitialized solver
    fn create(&self, mode: SolverMode) -> Result<Box<dyn ChallengeSolver>, crate::Error>;
}
