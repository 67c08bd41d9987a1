//! The redirect handler.
//!
//! ```text
//! ExtractIP → Lookup → Select → Respond (302)
//!     │          │        │
//!     └── 500    └── 400  └── 500
//! ```
//!
//! Each request runs the pipeline once; nothing is retried or remembered
//! between requests.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{request::Parts, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::geo::GeoLocator;
use crate::http::request::{client_ip, peer_addr, request_id};
use crate::http::response::{redirect_to, RedirectError};
use crate::observability::metrics;
use crate::routing::RegionTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub regions: Arc<RegionTable>,
    pub locator: Arc<GeoLocator>,
    pub cache_control: HeaderValue,
}

/// Redirect the client to its nearest region.
pub async fn redirect(State(state): State<AppState>, mut parts: Parts) -> Response {
    let start_time = Instant::now();
    let peer = peer_addr(&mut parts, &state).await;
    let client = client_ip(&parts.headers, peer);
    let request_id = request_id(&parts.headers);

    match decide(&state, client.as_deref()) {
        Ok((response, region)) => {
            tracing::info!(
                request_id = %request_id,
                client_ip = client.as_deref().unwrap_or_default(),
                region = %region,
                "Redirecting client"
            );
            metrics::record_redirect(&region, start_time);
            response
        }
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!(
                    request_id = %request_id,
                    client_ip = client.as_deref().unwrap_or("none"),
                    stage = err.stage(),
                    error = %err,
                    "Redirect failed"
                );
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    client_ip = client.as_deref().unwrap_or("none"),
                    stage = err.stage(),
                    error = %err,
                    "Client could not be located"
                );
            }
            metrics::record_failure(err.stage(), status.as_u16(), start_time);
            err.into_response()
        }
    }
}

fn decide(state: &AppState, client: Option<&str>) -> Result<(Response, String), RedirectError> {
    let ip = client.ok_or(RedirectError::AddressExtraction)?;

    let location = state.locator.locate(ip)?;
    tracing::debug!(
        client_ip = ip,
        city = %location.city,
        country = %location.country_code,
        state = %location.state,
        timezone = %location.timezone,
        "Client located"
    );

    let region = state.regions.nearest(location.coordinate)?;
    tracing::debug!(
        region = %region.name,
        city = %region.display_city(),
        endpoint = %region.endpoint,
        "Nearest region selected"
    );

    let response = redirect_to(region, &state.cache_control)?;
    Ok((response, region.name.clone()))
}
