//! Startup orchestration.
//!
//! # Responsibilities
//! - Locate, load and validate configuration
//! - Apply command-line overrides
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Overrides are validated together with the file contents

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::assemble::VersionToken;
use crate::config::{load_config, validate_config, ConfigError, SattoConfig};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

const BANNER: &str = concat!(
    "  ____        _   _        \n",
    " / ___|  __ _| |_| |_ ___  \n",
    " \\___ \\ / _` | __| __/ _ \\ \n",
    "  ___) | (_| | |_| || (_) |\n",
    " |____/ \\__,_|\\__|\\__\\___/ \n",
);

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "satto.toml";

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to build server: {0}")]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub bind_address: Option<String>,
}

/// Build the effective configuration.
///
/// An explicit `path` must exist. Without one, `satto.toml` in the working
/// directory is used if present and defaults otherwise.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<SattoConfig, StartupError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            load_config(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => SattoConfig::default(),
    };

    if let Some(root) = &overrides.root {
        config.project.root = root.clone();
    }
    if let Some(bind) = &overrides.bind_address {
        config.listener.bind_address = bind.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Serve `config` until SIGINT or SIGTERM.
pub async fn start(config: SattoConfig, version: VersionToken) -> Result<(), StartupError> {
    tracing::info!("\n{}", BANNER);

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let root = config.project.root.clone();
    let server = HttpServer::new(config, version)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        asset_version = %version,
        root = %root.display(),
        routes = server.routes().len(),
        "satto starting"
    );

    let shutdown = Shutdown::new();
    let signal_task = signals::spawn_signal_listener(shutdown.clone());

    let result = server.run(listener, shutdown.subscribe()).await;
    signal_task.abort();
    result.map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
