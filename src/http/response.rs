//! Response construction.
//!
//! # Responsibilities
//! - Build the redirect response (Location, Cache-Control)
//! - Map redirect failures to HTTP status codes
//!
//! # Design Decisions
//! - Bad, local or unknown client addresses are client errors (400)
//! - Database faults, missing regions and failing to determine the client
//!   address at all are server errors (500)
//! - Error bodies are the plain-text error message

use axum::http::header::{CACHE_CONTROL, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::geo::LookupError;
use crate::routing::{Region, SelectError};

/// Why a request could not be redirected.
#[derive(Debug, Error)]
pub enum RedirectError {
    /// Neither X-Forwarded-For nor the peer address gave a client address.
    #[error("unable to determine IP address")]
    AddressExtraction,

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Selection(#[from] SelectError),

    /// The selected region's endpoint cannot be sent as a header.
    #[error("region {0:?} has an invalid endpoint")]
    InvalidEndpoint(String),
}

impl RedirectError {
    pub fn status(&self) -> StatusCode {
        match self {
            RedirectError::Lookup(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Pipeline stage that failed, for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            RedirectError::AddressExtraction => "extract_ip",
            RedirectError::Lookup(_) => "lookup",
            RedirectError::Selection(_) => "select",
            RedirectError::InvalidEndpoint(_) => "respond",
        }
    }
}

impl IntoResponse for RedirectError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// `302 Found` to the region endpoint, cacheable for `cache_control`.
pub fn redirect_to(
    region: &Region,
    cache_control: &HeaderValue,
) -> Result<Response, RedirectError> {
    let location = HeaderValue::from_str(&region.endpoint)
        .map_err(|_| RedirectError::InvalidEndpoint(region.name.clone()))?;

    Ok((
        StatusCode::FOUND,
        [(LOCATION, location), (CACHE_CONTROL, cache_control.clone())],
    )
        .into_response())
}

/// `Cache-Control` value for a max-age in seconds.
pub fn cache_control(max_age_secs: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("max-age={max_age_secs}"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}
