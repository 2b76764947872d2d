// # dns01d - DNS-01 challenge runner
//
// This is a THIN integration layer:
// - No record-set logic here, the solver crates own it
// - No retry logic here, the ACME host retries by calling again
// - Configuration is via environment variables only
//
// The runner is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering solvers and creating the configured one
// 4. Running one challenge payload through `present` or `clean_up`
// 5. Writing the payload back with the response attached
//
// ## Configuration
//
// - `GROUP_NAME`: API group the webhook is served under (required)
// - `DNS01_SOLVER`: Solver name (default: desec-http)
// - `DNS01_SECRET_STORE_TYPE`: Secret store type (file; default: file)
// - `DNS01_SECRET_STORE_PATH`: Path to the secrets file (required)
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `DNS01_MODE`: live or dry-run (default: live)
//
// ## Example
//
// ```bash
// export GROUP_NAME=acme.example.com
// export DNS01_SECRET_STORE_PATH=/var/run/secrets/dns01/secrets.json
//
// dns01d challenge.json > response.json
// ```
//
// Without a file argument the payload is read from stdin.

use anyhow::{Context, Result};
use dns01_core::{
    ChallengeAction, ChallengePayload, ChallengeResponse, ChallengeSolver, SecretStoreConfig,
    SolverMode, SolverRegistry,
};
use std::env;
use std::io::{Read, Write};
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the runner
///
/// - 0: Challenge handled
/// - 1: Configuration or startup error
/// - 2: Runtime error or failed challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dns01ExitCode {
    /// Response written with success
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Unreadable payload or failed challenge
    RuntimeError = 2,
}

impl From<Dns01ExitCode> for ExitCode {
    fn from(code: Dns01ExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Runner configuration
#[derive(Debug)]
struct Config {
    group_name: String,
    solver_name: String,
    secret_store_type: String,
    secret_store_path: Option<String>,
    mode: SolverMode,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            group_name: lookup("GROUP_NAME").context(
                "GROUP_NAME is required. Set it via: export GROUP_NAME=acme.example.com",
            )?,
            solver_name: lookup("DNS01_SOLVER").unwrap_or_else(|| "desec-http".to_string()),
            secret_store_type: lookup("DNS01_SECRET_STORE_TYPE")
                .unwrap_or_else(|| "file".to_string()),
            secret_store_path: lookup("DNS01_SECRET_STORE_PATH"),
            mode: lookup("DNS01_MODE")
                .map(|m| SolverMode::from_env_value(&m))
                .unwrap_or_default(),
            log_level: lookup("DNS01_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.group_name.trim().is_empty() {
            anyhow::bail!("GROUP_NAME cannot be empty");
        }

        if self.solver_name.trim().is_empty() {
            anyhow::bail!("DNS01_SOLVER cannot be empty");
        }

        match self.secret_store_type.as_str() {
            "file" => match &self.secret_store_path {
                Some(path) if !path.is_empty() => {}
                _ => anyhow::bail!(
                    "DNS01_SECRET_STORE_PATH is required when DNS01_SECRET_STORE_TYPE=file. \
                    Set it via: export DNS01_SECRET_STORE_PATH=/var/run/secrets/dns01/secrets.json"
                ),
            },
            // An in-memory store would start empty in a one-shot process
            "memory" => anyhow::bail!(
                "DNS01_SECRET_STORE_TYPE=memory has no secret source in dns01d. \
                Use DNS01_SECRET_STORE_TYPE=file with DNS01_SECRET_STORE_PATH"
            ),
            other => anyhow::bail!(
                "DNS01_SECRET_STORE_TYPE '{}' is not supported. \
                Supported types: file",
                other
            ),
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNS01_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Secret store configuration handed to `initialize`
    fn secret_store_config(&self) -> SecretStoreConfig {
        SecretStoreConfig::File {
            path: self.secret_store_path.clone().unwrap_or_default(),
        }
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    // Logs go to stderr, stdout carries the response payload
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    info!(
        group = %config.group_name,
        solver = %config.solver_name,
        store = %config.secret_store_type,
        "Starting dns01d"
    );

    let registry = SolverRegistry::new();
    register_solvers(&registry);

    let mut solver = match registry.create_solver(&config.solver_name, config.mode) {
        Ok(solver) => solver,
        Err(e) => {
            error!("Failed to create solver: {}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    if let Err(e) = solver.initialize(&config.secret_store_config()) {
        error!("Failed to initialize solver {}: {}", config.solver_name, e);
        return Dns01ExitCode::ConfigError.into();
    }

    let payload = match read_payload(env::args().nth(1).as_deref()) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to read challenge payload: {:#}", e);
            return Dns01ExitCode::RuntimeError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Dns01ExitCode::RuntimeError.into();
        }
    };

    let answered = rt.block_on(handle_payload(solver.as_ref(), payload));
    let succeeded = answered.response.as_ref().is_some_and(|r| r.success);

    if let Err(e) = write_payload(&answered) {
        error!("Failed to write response: {:#}", e);
        return Dns01ExitCode::RuntimeError.into();
    }

    if succeeded {
        Dns01ExitCode::Success.into()
    } else {
        Dns01ExitCode::RuntimeError.into()
    }
}

/// Register built-in solvers
fn register_solvers(registry: &SolverRegistry) {
    #[cfg(feature = "desec")]
    {
        info!("Registering deSEC solver");
        dns01_provider_desec::register(registry);
    }

    if registry.list_solvers().is_empty() {
        warn!("No solvers compiled in");
    }
}

/// Read the challenge payload from `path`, or stdin when absent
fn read_payload(path: Option<&str>) -> Result<ChallengePayload> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {}", path))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read payload from stdin")?;
            raw
        }
    };

    serde_json::from_str(&raw).context("Challenge payload is not valid JSON")
}

/// Write the answered payload to stdout
fn write_payload(payload: &ChallengePayload) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

/// Run the payload's request through `solver` and attach the response
async fn handle_payload(solver: &dyn ChallengeSolver, mut payload: ChallengePayload) -> ChallengePayload {
    let response = match &payload.request {
        None => {
            error!("Challenge payload carries no request");
            ChallengeResponse::failure("", "challenge payload carries no request")
        }
        Some(request) => {
            let result = match request.action {
                ChallengeAction::Present => solver.present(request).await,
                ChallengeAction::CleanUp => solver.clean_up(request).await,
            };

            match result {
                Ok(outcome) => {
                    info!(
                        uid = %request.uid,
                        subname = %outcome.subname,
                        action = outcome.action.verb(),
                        dry_run = outcome.dry_run,
                        "Challenge handled"
                    );
                    ChallengeResponse::success(request.uid.as_str())
                }
                Err(e) => ChallengeResponse::failure(request.uid.as_str(), e.to_string()),
            }
        }
    };

    payload.response = Some(response);
    payload
}
