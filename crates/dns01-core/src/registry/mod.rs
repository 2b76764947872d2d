//! Plugin-based solver registry
//!
//! The host routes challenges by solver name. Solver crates register a
//! factory under their name; the daemon looks the name up at startup instead
//! of hard-coding an if-else chain.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dns01_core::registry::SolverRegistry;
//! use dns01_core::config::SolverMode;
//!
//! let registry = SolverRegistry::new();
//! dns01_provider_desec::register(&registry);
//!
//! let solver = registry.create_solver("desec-http", SolverMode::Live)?;
//! ```

use crate::config::SolverMode;
use crate::error::{Error, Result};
use crate::traits::{ChallengeSolver, ChallengeSolverFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry of challenge solver factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct SolverRegistry {
    solvers: RwLock<HashMap<String, Box<dyn ChallengeSolverFactory>>>,
}

impl SolverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a solver factory under `name`
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_solver(&self, name: impl Into<String>, factory: Box<dyn ChallengeSolverFactory>) {
        let name = name.into();
        let mut solvers = self
            .solvers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        solvers.insert(name, factory);
    }

    /// Create an uninitialized solver by name
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ChallengeSolver>)`: created solver
    /// - `Err(Error::Config)`: no solver registered under that name
    pub fn create_solver(&self, name: &str, mode: SolverMode) -> Result<Box<dyn ChallengeSolver>> {
        let solvers = self
            .solvers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let factory = solvers.get(name).ok_or_else(|| {
            let mut known: Vec<&str> = solvers.keys().map(String::as_str).collect();
            known.sort_unstable();
            Error::config(format!(
                "Unknown solver: {}. Registered solvers: {}",
                name,
                known.join(", ")
            ))
        })?;

        factory.create(mode)
    }

    /// List all registered solver names
    pub fn list_solvers(&self) -> Vec<String> {
        let solvers = self
            .solvers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        solvers.keys().cloned().collect()
    }

    /// Check if a solver name is registered
    pub fn has_solver(&self, name: &str) -> bool {
        let solvers = self
            .solvers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        solvers.contains_key(name)
    }
}
