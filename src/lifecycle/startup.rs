//! Startup orchestration.
//!
//! # Responsibilities
//! - Make sure the geo databases exist (download if missing)
//! - Open the database readers
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when databases are ready)

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RedirectConfig;
use crate::geo::bootstrap::{ensure_databases, BootstrapError};
use crate::geo::maxmind::OpenError;
use crate::geo::{GeoLocator, MaxMindDatabases};
use crate::http::HttpServer;
use crate::lifecycle::signals::spawn_signal_watcher;
use crate::lifecycle::Shutdown;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Database(#[from] OpenError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bring the service up and serve until SIGINT/SIGTERM.
pub async fn run(config: RedirectConfig) -> Result<(), StartupError> {
    ensure_databases(&config.geo_db).await?;
    let databases = MaxMindDatabases::open(&config.geo_db)?;
    let locator = GeoLocator::new(databases);

    let listener = TcpListener::bind(config.listener.bind_address.as_str())
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let watcher = spawn_signal_watcher(shutdown.clone());

    let server = HttpServer::new(config, locator);
    tracing::info!(
        address = %server.config().listener.bind_address,
        cache_max_age_secs = server.config().redirect.cache_max_age_secs,
        "Geo redirect ready"
    );
    let result = server.run(listener, server_shutdown).await;
    watcher.abort();

    result.map_err(StartupError::Serve)
}
