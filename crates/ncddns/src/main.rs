// # ncddns - one-shot dynamic-DNS updater
//
// The ncddns binary is a thin integration layer around ncddns-core. It is
// responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the date-stamped log sink
// 3. Building the runtime and running exactly one update pass
// 4. Mapping the outcome to an exit code
//
// There is no daemon loop. Schedulers (cron, systemd timers) re-run the
// binary; the cached address in the settings file keeps repeat runs cheap.
// Overlapping invocations are not guarded against: schedule runs so they
// cannot overlap.
//
// ## Configuration
//
// All configuration is done via environment variables; the binary takes
// no arguments:
//
// - `NCDDNS_ENV_FILE`: settings file path (default `.env`)
// - `NCDDNS_LOG_DIR`: log directory (default `log`)
// - `NCDDNS_LOG_LEVEL`: trace|debug|info|warn|error (default `debug`)
// - `NCDDNS_IP_ENDPOINTS`: comma-separated discovery URL override
// - `NCDDNS_HTTP_TIMEOUT_SECS`: per-request timeout override (1-300)
//
// ## Exit codes
//
// - 0: pass completed (per-domain failures are logged, not fatal)
// - 1: configuration error (environment or settings file)
// - 2: every discovery endpoint failed; nothing was updated
//
// ## Example
//
// ```bash
// export NCDDNS_ENV_FILE=/etc/ncddns/.env
// export NCDDNS_LOG_DIR=/var/log/ncddns
//
// ncddns
// ```

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use ncddns_core::{EnvFileStore, Error, RunOutcome, UpdateEngine};
use ncddns_ip_http::{HttpIpSource, DEFAULT_ENDPOINTS};
use ncddns_provider_namecheap::NamecheapProvider;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Pass completed (domain failures are in the log, not the exit code)
/// - 1: Configuration error (environment or settings file)
/// - 2: External address could not be determined
#[derive(Debug, Clone, Copy)]
enum UpdaterExitCode {
    /// Pass completed
    Completed = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Every discovery endpoint failed
    NoAddress = 2,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    env_file: String,
    log_dir: String,
    log_level: String,
    endpoints: Vec<String>,
    http_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            env_file: env::var("NCDDNS_ENV_FILE").unwrap_or_else(|_| ".env".to_string()),
            log_dir: env::var("NCDDNS_LOG_DIR").unwrap_or_else(|_| "log".to_string()),
            log_level: env::var("NCDDNS_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
            endpoints: match env::var("NCDDNS_IP_ENDPOINTS") {
                Ok(raw) => raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                Err(_) => DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            },
            http_timeout_secs: match env::var("NCDDNS_HTTP_TIMEOUT_SECS") {
                Ok(raw) => Some(raw.parse().map_err(|_| {
                    anyhow::anyhow!(
                        "NCDDNS_HTTP_TIMEOUT_SECS must be an integer number of seconds. Got: {}",
                        raw
                    )
                })?),
                Err(_) => None,
            },
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.env_file.is_empty() {
            anyhow::bail!(
                "NCDDNS_ENV_FILE cannot be empty. \
                Set it via: export NCDDNS_ENV_FILE=/etc/ncddns/.env"
            );
        }

        if self.log_dir.is_empty() {
            anyhow::bail!(
                "NCDDNS_LOG_DIR cannot be empty. \
                Set it via: export NCDDNS_LOG_DIR=/var/log/ncddns"
            );
        }

        // Validate log level
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "NCDDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        // Validate discovery endpoints
        if self.endpoints.is_empty() {
            anyhow::bail!(
                "NCDDNS_IP_ENDPOINTS must contain at least one URL. \
                Set it via: export NCDDNS_IP_ENDPOINTS=http://icanhazip.com"
            );
        }

        for endpoint in &self.endpoints {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                anyhow::bail!(
                    "Discovery endpoints must use HTTP or HTTPS scheme. Got: {}",
                    endpoint
                );
            }
        }

        // Validate numeric ranges
        if let Some(timeout) = self.http_timeout_secs
            && !(1..=300).contains(&timeout)
        {
            anyhow::bail!(
                "NCDDNS_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                timeout
            );
        }

        Ok(())
    }

    /// Tracing level for the configured log level
    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::DEBUG,
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return UpdaterExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return UpdaterExitCode::ConfigError.into();
    }

    // One date-stamped file per day (YYYY-MM-DD.log) in the log directory
    let appender = match tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_suffix("log")
        .build(&config.log_dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to open log directory {}: {}", config.log_dir, e);
            return UpdaterExitCode::ConfigError.into();
        }
    };

    // The guard flushes buffered log lines when main returns
    let (writer, _guard) = tracing_appender::non_blocking(appender);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level())
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return UpdaterExitCode::ConfigError.into();
    }

    info!("Starting ncddns");
    info!(
        env_file = %config.env_file,
        endpoints = config.endpoints.len(),
        "Configuration loaded"
    );

    // One pass needs no worker threads
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return UpdaterExitCode::ConfigError.into();
        }
    };

    match rt.block_on(run_once(&config)) {
        Ok(outcome) => {
            match &outcome {
                RunOutcome::NoChange { ip } => {
                    info!(%ip, "Pass complete, address unchanged");
                }
                RunOutcome::Updated { ip, failures, .. } => {
                    info!(
                        %ip,
                        failed = failures.len(),
                        "Pass complete, address updated"
                    );
                }
            }
            UpdaterExitCode::Completed.into()
        }
        Err(Error::NoIpAvailable { attempted }) => {
            error!(attempted, "Could not determine the external address");
            UpdaterExitCode::NoAddress.into()
        }
        Err(e) => {
            error!("Updater failed: {}", e);
            UpdaterExitCode::ConfigError.into()
        }
    }
}

/// Build the store, IP source, and provider, then run one pass
async fn run_once(config: &Config) -> ncddns_core::Result<RunOutcome> {
    let store = EnvFileStore::new(&config.env_file);

    let (ip_source, provider) = match config.http_timeout_secs {
        Some(secs) => {
            let timeout = Duration::from_secs(secs);
            (
                HttpIpSource::with_timeout(config.endpoints.clone(), timeout),
                NamecheapProvider::with_timeout(timeout),
            )
        }
        None => (
            HttpIpSource::new(config.endpoints.clone()),
            NamecheapProvider::new(),
        ),
    };

    let engine = UpdateEngine::new(Box::new(store), Box::new(ip_source), Box::new(provider));
    engine.run().await
}
