//! satto server (v1)
//!
//! Renders directive-markup pages on the server and serves them as
//! complete HTML documents.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ page? ──no──▶ static asset fallback
//!                                       │
//!                                      yes
//!                                       ▼
//!                     markup ──▶ template::transform ──▶ fetch (SSR data)
//!                                                           │
//!                                                           ▼
//!     Client Response             assemble ◀── render (directive tree)
//!     ◀──────────────────────── (shell + fragment + versioned assets)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use satto::lifecycle::startup::{self, Overrides};
use satto::observability::logging;
use satto::VersionToken;

#[derive(Parser)]
#[command(name = "satto")]
#[command(about = "Server-side rendering for directive markup pages", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the TOML config file (default: ./satto.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root containing the shell and the app/ directory
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:3000
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let overrides = Overrides {
        root: args.root,
        bind_address: args.bind,
    };

    let config = match startup::resolve_config(args.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("satto: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);

    let version = VersionToken::capture();
    match startup::start(config, version).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            ExitCode::FAILURE
        }
    }
}
