// # deSEC DNS-01 Challenge Solver
//
// This crate provides a deSEC (https://desec.io) implementation of the
// `ChallengeSolver` trait.
//
// ## Flow (per present / clean-up call)
//
// 1. Resolve provider configuration (challenge config JSON + secret lookup)
// 2. Derive the subdomain label from the resolved FQDN
// 3. Read the TXT record set (404 = absent)
// 4. Decide the next call with the reconciler
// 5. Execute at most one write (POST / PUT / DELETE)
//
// - ✅ One read and at most one write per call
// - ✅ Full error propagation to the host (host handles retries)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (owned by the host)
// - ❌ NO propagation polling (owned by the host)
// - ❌ NO caching of record sets
//
// ## Security Requirements
//
// - API key NEVER appears in logs
// - API key is resolved per call from the secret store
//
// ## API Reference
//
// - deSEC API: https://desec.readthedocs.io/en/latest/dns/rrsets.html
// - Create RRset: POST `/domains/:domain/rrsets/`
// - Retrieve / Replace / Delete RRset: GET / PUT / DELETE `/domains/:domain/rrsets/:subname/:type/`

pub mod codec;
pub mod reader;
pub mod transport;

pub use codec::QuotedTxtCodec;
pub use reader::{RecordSetReader, rrset_url, rrsets_url};
pub use transport::HttpTransport;

use async_trait::async_trait;
use dns01_core::reconcile::{self, Action, Intent};
use dns01_core::resolver::resolve_provider_config;
use dns01_core::secrets::build_secret_store;
use dns01_core::traits::{
    ApiRequest, ChallengeSolver, ChallengeSolverFactory, HttpMethod, ReconcileOutcome,
    SecretStore, Transport,
};
use dns01_core::{
    ChallengeRequest, Error, ProviderConfig, RecordSetPayload, Result, SecretStoreConfig,
    SolverMode, SolverRegistry, subdomain_label,
};
use std::sync::Arc;

/// Solver name the host routes challenges by
pub const SOLVER_NAME: &str = "desec-http";

/// Default deSEC API base URL
pub const DESEC_API_BASE: &str = "https://desec.io/api/v1";

/// deSEC challenge solver
///
/// # Dry-Run Mode
///
/// When `mode` is [`SolverMode::DryRun`], the solver will:
/// - Resolve configuration and read the record set
/// - Decide and log the intended write with its payload
/// - **NOT** send the write
pub struct DesecSolver {
    transport: Arc<dyn Transport>,
    reader: RecordSetReader,
    codec: QuotedTxtCodec,
    secret_store: Option<Box<dyn SecretStore>>,
    mode: SolverMode,
}

// Custom Debug implementation: transport and store are opaque trait objects
impl std::fmt::Debug for DesecSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesecSolver")
            .field("initialized", &self.secret_store.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

impl DesecSolver {
    /// Create a solver talking HTTP to the provider
    pub fn new(mode: SolverMode) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new()?), mode))
    }

    /// Create a solver over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>, mode: SolverMode) -> Self {
        Self {
            reader: RecordSetReader::new(Arc::clone(&transport)),
            transport,
            codec: QuotedTxtCodec,
            secret_store: None,
            mode,
        }
    }

    /// Use an already-constructed secret store instead of `initialize`
    pub fn with_secret_store(mut self, store: Box<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    /// Current write mode
    pub fn mode(&self) -> SolverMode {
        self.mode
    }

    /// Run one reconciliation for `request` with `intent`
    async fn reconcile(&self, request: &ChallengeRequest, intent: Intent) -> Result<ReconcileOutcome> {
        let store = self
            .secret_store
            .as_deref()
            .ok_or_else(|| Error::config("solver used before initialize"))?;

        let config = resolve_provider_config(store, request).await?;
        let subname = subdomain_label(&request.resolved_fqdn, &config.domain_name)?;

        let remote = self.reader.fetch(&config, &subname).await?;
        let action = reconcile::plan(&remote, &intent, &self.codec);

        tracing::info!(
            subname = %subname,
            present = remote.is_present(),
            action = action.verb(),
            "Reconciling TXT record set"
        );

        self.apply(&config, &subname, &action).await?;

        Ok(ReconcileOutcome {
            subname,
            action,
            dry_run: self.mode.is_dry_run(),
        })
    }

    /// Execute the write for `action`, if any
    async fn apply(&self, config: &ProviderConfig, subname: &str, action: &Action) -> Result<()> {
        let request = match action {
            Action::Create(records) => ApiRequest::with_body(
                HttpMethod::Post,
                rrsets_url(config),
                serde_json::to_value(RecordSetPayload::txt(subname, records.clone()))?,
            ),
            Action::Update(records) => ApiRequest::with_body(
                HttpMethod::Put,
                rrset_url(config, subname),
                serde_json::to_value(RecordSetPayload::txt(subname, records.clone()))?,
            ),
            Action::Delete => ApiRequest::delete(rrset_url(config, subname)),
            Action::Noop(reason) => {
                tracing::info!(subname, ?reason, "No write needed");
                return Ok(());
            }
        };

        let payload = request
            .body
            .as_ref()
            .map(|b| b.to_string())
            .unwrap_or_default();

        if self.mode.is_dry_run() {
            tracing::info!(
                "[DRY-RUN] Would send {} request to {} with payload: {}",
                request.method,
                request.url,
                payload
            );
            return Ok(());
        }

        tracing::debug!(method = %request.method, "JSON payload is: {}", payload);

        let response = self.transport.execute(request, config).await?;
        tracing::debug!(status = response.status, "Write result: {}", response.body);
        Ok(())
    }

    async fn run(&self, operation: &str, request: &ChallengeRequest, intent: Intent) -> Result<ReconcileOutcome> {
        tracing::info!(
            namespace = %request.resource_namespace,
            zone = %request.resolved_zone,
            fqdn = %request.resolved_fqdn,
            "call function {}",
            operation
        );

        match self.reconcile(request, intent).await {
            Ok(outcome) => {
                tracing::info!(
                    fqdn = %request.resolved_fqdn,
                    action = outcome.action.verb(),
                    dry_run = outcome.dry_run,
                    "{} finished",
                    operation
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(
                    namespace = %request.resource_namespace,
                    zone = %request.resolved_zone,
                    fqdn = %request.resolved_fqdn,
                    transient = e.is_transient(),
                    "{} failed: {}",
                    operation,
                    e
                );
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ChallengeSolver for DesecSolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    fn initialize(&mut self, host_config: &SecretStoreConfig) -> Result<()> {
        let store = build_secret_store(host_config)?;
        tracing::info!(store = store.store_type(), "Initialized {} solver", SOLVER_NAME);
        self.secret_store = Some(store);
        Ok(())
    }

    async fn present(&self, request: &ChallengeRequest) -> Result<ReconcileOutcome> {
        self.run("present", request, Intent::AddToken(request.key.clone()))
            .await
    }

    async fn clean_up(&self, request: &ChallengeRequest) -> Result<ReconcileOutcome> {
        self.run("clean_up", request, Intent::RemoveToken(request.key.clone()))
            .await
    }
}

/// Factory for creating deSEC solvers
pub struct DesecFactory;

impl ChallengeSolverFactory for DesecFactory {
    fn create(&self, mode: SolverMode) -> Result<Box<dyn ChallengeSolver>> {
        if mode.is_dry_run() {
            tracing::warn!("deSEC solver running in DRY-RUN mode - no changes will be made");
        }

        Ok(Box::new(DesecSolver::new(mode)?))
    }
}

/// Register the deSEC solver with a registry
///
/// # Example
///
/// ```rust
/// use dns01_core::SolverRegistry;
///
/// let registry = SolverRegistry::new();
/// dns01_provider_desec::register(&registry);
/// assert!(registry.has_solver("desec-http"));
/// ```
pub fn register(registry: &SolverRegistry) {
    registry.register_solver(SOLVER_NAME, Box::new(DesecFactory));
}
