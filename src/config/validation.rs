//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check region names are unique and coordinates in range
//! - Check endpoints can be sent as a `Location` header
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::RedirectConfig;
use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("no regions configured")]
    NoRegions,

    #[error("region name must not be empty")]
    EmptyRegionName,

    #[error("duplicate region {0:?}")]
    DuplicateRegion(String),

    #[error("region {region:?} has invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        region: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("region {0:?} has an empty endpoint")]
    EmptyEndpoint(String),

    #[error("region {0:?} endpoint is not a valid header value")]
    InvalidEndpoint(String),

    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),

    #[error("geo database paths must not be empty")]
    EmptyDatabasePath,

    #[error("invalid geo database base_url {0:?}")]
    InvalidBaseUrl(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RedirectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.geo_db.ipv4_path.as_os_str().is_empty()
        || config.geo_db.ipv6_path.as_os_str().is_empty()
    {
        errors.push(ValidationError::EmptyDatabasePath);
    }

    if let Some(base_url) = &config.geo_db.base_url {
        if url::Url::parse(base_url).is_err() {
            errors.push(ValidationError::InvalidBaseUrl(base_url.clone()));
        }
    }

    if config.regions.is_empty() {
        errors.push(ValidationError::NoRegions);
    }

    let mut seen = HashSet::new();
    for region in &config.regions {
        if region.name.is_empty() {
            errors.push(ValidationError::EmptyRegionName);
        } else if !seen.insert(region.name.as_str()) {
            errors.push(ValidationError::DuplicateRegion(region.name.clone()));
        }

        if !Coordinate::new(region.latitude, region.longitude).is_valid() {
            errors.push(ValidationError::InvalidCoordinate {
                region: region.name.clone(),
                latitude: region.latitude,
                longitude: region.longitude,
            });
        }

        if region.endpoint.trim().is_empty() {
            errors.push(ValidationError::EmptyEndpoint(region.name.clone()));
        } else if HeaderValue::from_str(&region.endpoint).is_err() {
            errors.push(ValidationError::InvalidEndpoint(region.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
