//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect handler on every path
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use axum::{routing::any, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RedirectConfig;
use crate::geo::GeoLocator;
use crate::http::redirect::{redirect, AppState};
use crate::http::request::UuidRequestId;
use crate::http::response::cache_control;
use crate::routing::RegionTable;

/// HTTP server for the redirect service.
pub struct HttpServer {
    router: Router,
    config: RedirectConfig,
}

impl HttpServer {
    /// Create a new HTTP server from validated configuration and an opened
    /// locator.
    pub fn new(config: RedirectConfig, locator: GeoLocator) -> Self {
        let regions = RegionTable::from_config(config.regions.clone());
        tracing::info!(
            regions = regions.len(),
            names = ?regions.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "Region table built"
        );

        let state = AppState {
            regions: Arc::new(regions),
            locator: Arc::new(locator),
            cache_control: cache_control(config.redirect.cache_max_age_secs),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(redirect))
            .route("/{*path}", any(redirect))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }
}
