// # domwatchd - domwatch daemon
//
// Thin integration layer: all persistence logic lives in domwatch-core.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging
// 3. Opening every store once against the base directory
// 4. Holding the stores until shutdown, then flushing them
//
// ## Configuration
//
// - `DOMWATCH_BASE_DIR`: Directory holding config.yaml, domain.yaml and
//   whois-cache.yaml (default: current directory)
// - `DOMWATCH_CACHE_RETENTION_SECS`: Age after which cached lookups are
//   reported as stale (default: 86400)
// - `DOMWATCH_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// ## Example
//
// ```bash
// export DOMWATCH_BASE_DIR=/var/lib/domwatch
// domwatchd
// ```

use anyhow::{Context, Result};
use domwatch_core::{DomainStore, LookupCache, LookupCacheStore, SettingsStore, StoreConfig};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error (including corrupt store files)
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DomwatchExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DomwatchExitCode> for ExitCode {
    fn from(code: DomwatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Daemon configuration
struct Config {
    stores: StoreConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let mut stores = match env::var("DOMWATCH_BASE_DIR") {
            Ok(dir) if !dir.trim().is_empty() => StoreConfig::new(dir.trim()),
            _ => StoreConfig::default(),
        };

        if let Ok(raw) = env::var("DOMWATCH_CACHE_RETENTION_SECS") {
            stores.cache_retention_secs = raw.trim().parse().with_context(|| {
                format!("DOMWATCH_CACHE_RETENTION_SECS must be a number of seconds. Got: {raw}")
            })?;
        }

        Ok(Self {
            stores,
            log_level: env::var("DOMWATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.stores.validate()?;

        if self.stores.base_dir.exists() && !self.stores.base_dir.is_dir() {
            anyhow::bail!(
                "DOMWATCH_BASE_DIR is not a directory: {}",
                self.stores.base_dir.display()
            );
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DOMWATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

/// The stores a running daemon holds for its lifetime
struct Stores {
    settings: SettingsStore,
    domains: DomainStore,
    cache: LookupCacheStore,
}

impl Stores {
    /// Open every store against the configured base directory
    async fn open(config: &StoreConfig) -> domwatch_core::Result<Self> {
        Ok(Self {
            settings: SettingsStore::load(config).await?,
            domains: DomainStore::load(config).await?,
            cache: LookupCacheStore::load(config).await?,
        })
    }

    async fn flush(&self) -> domwatch_core::Result<()> {
        self.settings.flush().await?;
        self.domains.flush().await?;
        self.cache.flush().await
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DomwatchExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DomwatchExitCode::ConfigError.into();
    }

    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DomwatchExitCode::ConfigError.into();
    }

    info!("Starting domwatchd");
    info!("Base directory: {}", config.stores.base_dir.display());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DomwatchExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let stores = match Stores::open(&config.stores).await {
            Ok(stores) => stores,
            Err(e) => {
                error!("Failed to open stores: {}", e);
                return DomwatchExitCode::ConfigError;
            }
        };

        match run_daemon(&config, &stores).await {
            Ok(()) => DomwatchExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {:#}", e);
                DomwatchExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Report what was loaded, then hold the stores until shutdown
async fn run_daemon(config: &Config, stores: &Stores) -> Result<()> {
    let settings = stores.settings.settings().await;
    if settings.alert_recipient.is_empty() {
        warn!(
            "No alert recipient configured in {}",
            stores.settings.path().display()
        );
    }

    info!(
        "Monitoring {} of {} domain(s)",
        stores.domains.enabled_domains().await.len(),
        stores.domains.len().await
    );

    let stale = stores
        .cache
        .stale_keys(config.stores.cache_retention())
        .await?;
    info!(
        "Whois cache: {} entries, {} stale",
        stores.cache.len().await,
        stale.len()
    );

    info!("Stores ready");

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);

    stores.flush().await.context("final flush failed")?;
    info!("Shutting down domwatchd");
    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(received)
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
