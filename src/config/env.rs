//! Environment variable overrides.
//!
//! Variables understood:
//! - `PORT`: listen on `0.0.0.0:<PORT>`
//! - `IPV4_DB_FILE`, `IPV6_DB_FILE`: database paths
//! - `BASE_URL`: database download base URL
//! - `SERVER_1`, `SERVER_2`, ...: regions as `name,endpoint,city,lat,lon`,
//!   read until the first unset index. When present they replace the
//!   regions from the config file.
//!
//! The variable source is passed in so tests never touch the process
//! environment.

use thiserror::Error;

use crate::config::schema::{RedirectConfig, RegionConfig};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{key}: {reason}")]
pub struct EnvError {
    pub key: String,
    pub reason: String,
}

/// Apply overrides from `lookup` (normally `std::env::var(..).ok()`).
pub fn apply_env_overrides<F>(config: &mut RedirectConfig, lookup: F) -> Result<(), EnvError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(port) = var("PORT") {
        let port: u16 = port.parse().map_err(|_| EnvError {
            key: "PORT".into(),
            reason: format!("invalid port {port:?}"),
        })?;
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if let Some(path) = var("IPV4_DB_FILE") {
        config.geo_db.ipv4_path = path.into();
    }
    if let Some(path) = var("IPV6_DB_FILE") {
        config.geo_db.ipv6_path = path.into();
    }
    if let Some(base_url) = var("BASE_URL") {
        config.geo_db.base_url = Some(base_url);
    }

    let mut regions = Vec::new();
    for i in 1.. {
        let key = format!("SERVER_{i}");
        let Some(value) = var(&key) else { break };
        let region = parse_region(&value).map_err(|reason| EnvError { key, reason })?;
        regions.push(region);
    }
    if !regions.is_empty() {
        tracing::debug!(count = regions.len(), "Regions taken from SERVER_<i> variables");
        config.regions = regions;
    }

    Ok(())
}

/// Parse `name,endpoint,city,lat,lon`.
pub fn parse_region(value: &str) -> Result<RegionConfig, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [name, endpoint, city, latitude, longitude] = &parts[..] else {
        return Err(format!("invalid format, expected 5 parts but got {}", parts.len()));
    };

    let latitude: f64 = latitude
        .parse()
        .map_err(|e| format!("error parsing latitude {latitude:?}: {e}"))?;
    let longitude: f64 = longitude
        .parse()
        .map_err(|e| format!("error parsing longitude {longitude:?}: {e}"))?;

    Ok(RegionConfig {
        name: name.to_string(),
        endpoint: endpoint.to_string(),
        city: (!city.is_empty()).then(|| city.to_string()),
        latitude,
        longitude,
    })
}
