// # dockdnsd - container DNS endpoint daemon
//
// This daemon is a THIN integration layer only. All label interpretation,
// grouping and record inference lives in dockdns-core.
//
// The dockdnsd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building a ContainerSource over a runtime client
// 4. Resolving endpoint records once, or every interval until shutdown
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `DOCKDNS_SNAPSHOT_PATH`: Path to the runtime snapshot JSON (required)
// - `DOCKDNS_CLUSTER_MODE`: Group task containers by cluster service (true/false)
// - `DOCKDNS_INTERVAL_SECS`: Resolve every N seconds (unset: resolve once)
// - `DOCKDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// Each cycle's records are written to stdout as one JSON array.
//
// ## Example
//
// ```bash
// export DOCKDNS_SNAPSHOT_PATH=/var/lib/dockdns/snapshot.json
// export DOCKDNS_CLUSTER_MODE=true
// export DOCKDNS_INTERVAL_SECS=30
//
// dockdnsd
// ```

use anyhow::Result;
use dockdns_core::{ContainerSource, SnapshotFileClient, SourceConfig};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DockdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DockdnsExitCode> for ExitCode {
    fn from(code: DockdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    snapshot_path: String,
    cluster_mode: bool,
    interval_secs: Option<u64>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let snapshot_path = env::var("DOCKDNS_SNAPSHOT_PATH").map_err(|_| {
            anyhow::anyhow!(
                "DOCKDNS_SNAPSHOT_PATH is required. \
                Set it via: export DOCKDNS_SNAPSHOT_PATH=/var/lib/dockdns/snapshot.json"
            )
        })?;

        let cluster_mode = match env::var("DOCKDNS_CLUSTER_MODE") {
            Ok(value) => parse_bool(&value).ok_or_else(|| {
                anyhow::anyhow!(
                    "DOCKDNS_CLUSTER_MODE must be true or false. Got: {}",
                    value
                )
            })?,
            Err(_) => false,
        };

        let interval_secs = match env::var("DOCKDNS_INTERVAL_SECS") {
            Ok(value) => Some(value.trim().parse().map_err(|_| {
                anyhow::anyhow!("DOCKDNS_INTERVAL_SECS must be a number. Got: {}", value)
            })?),
            Err(_) => None,
        };

        Ok(Self {
            snapshot_path,
            cluster_mode,
            interval_secs,
            log_level: env::var("DOCKDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.snapshot_path.trim().is_empty() {
            anyhow::bail!("DOCKDNS_SNAPSHOT_PATH cannot be empty");
        }

        if let Some(interval) = self.interval_secs
            && !(1..=3600).contains(&interval)
        {
            anyhow::bail!(
                "DOCKDNS_INTERVAL_SECS must be between 1 and 3600 seconds. Got: {}",
                interval
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DOCKDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DockdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DockdnsExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdout carries the records
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DockdnsExitCode::ConfigError.into();
    }

    info!("Starting dockdnsd");

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DockdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DockdnsExitCode::RuntimeError
        } else {
            DockdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let client = Arc::new(SnapshotFileClient::new(&config.snapshot_path));
    let snapshot_path = client.path().display().to_string();
    let source_config = SourceConfig::new().with_cluster_mode(config.cluster_mode);
    let source = ContainerSource::new(client, source_config)?;
    info!(
        "Reading snapshots from {} (cluster mode: {})",
        snapshot_path,
        source.cluster_mode()
    );

    let Some(interval_secs) = config.interval_secs else {
        return resolve_cycle(&source).await;
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A failed cycle is reported; the next tick starts a fresh one
                if let Err(e) = resolve_cycle(&source).await {
                    error!("Resolution cycle failed: {}", e);
                }
            }
            signal = &mut shutdown => {
                info!("Received shutdown signal: {}", signal?);
                break;
            }
        }
    }

    info!("Shutting down daemon");
    Ok(())
}

/// Resolve one cycle and print its records
async fn resolve_cycle(source: &ContainerSource) -> Result<()> {
    let endpoints = source.endpoints().await?;
    info!("Resolved {} endpoint(s)", endpoints.len());
    println!("{}", serde_json::to_string(&endpoints)?);
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
