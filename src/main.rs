//! Geo redirect service.
//!
//! Redirects every HTTP client to the nearest configured regional
//! endpoint, located from the client IP through a MaxMind city database.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ──────────────▶ http::server ──▶ http::request (X-Forwarded-For / peer)
//!                                        │
//!                                        ▼
//!                                  geo::lookup ──▶ geo::maxmind (v4 / v6)
//!                                        │
//!                                        ▼
//!                                  routing::selector ──▶ geo::distance
//!                                        │
//!   302 Location / 400 / 500             ▼
//!   ◀───────────────────────────── http::response
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use geo_redirect::config::load_with_env;
use geo_redirect::lifecycle::startup;
use geo_redirect::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "geo-redirect")]
#[command(about = "Redirect clients to the nearest regional endpoint", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "GEO_REDIRECT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_with_env(cli.config.as_deref(), |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("geo-redirect: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("geo-redirect v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        regions = config.regions.len(),
        ipv4_db = %config.geo_db.ipv4_path.display(),
        ipv6_db = %config.geo_db.ipv6_path.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
