//! Core traits for the DNS-01 solver
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Transport`]: Authenticated provider API calls
//! - [`SecretStore`]: Credential lookup by namespace + name
//! - [`ChallengeSolver`]: The entry points the ACME host drives

pub mod challenge_solver;
pub mod secret_store;
pub mod transport;

pub use challenge_solver::{ChallengeSolver, ChallengeSolverFactory, ReconcileOutcome};
pub use secret_store::{SecretData, SecretStore, SecretStoreFactory, secret_ref};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, Transport, classify, is_accepted_status};
