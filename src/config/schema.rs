//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! redirect service. All types derive Serde traits for deserialization
//! from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the redirect service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Geo database locations.
    pub geo_db: GeoDbConfig,

    /// Redirect response settings.
    pub redirect: RedirectSettings,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Regional endpoints clients are redirected to.
    pub regions: Vec<RegionConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Geo database file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeoDbConfig {
    /// MaxMind DB file answering IPv4 lookups.
    pub ipv4_path: PathBuf,

    /// MaxMind DB file answering IPv6 lookups.
    pub ipv6_path: PathBuf,

    /// Base URL missing database files are downloaded from.
    /// The file name of each path is appended to it.
    pub base_url: Option<String>,
}

impl Default for GeoDbConfig {
    fn default() -> Self {
        Self {
            ipv4_path: PathBuf::from("dbip-city-ipv4.mmdb"),
            ipv6_path: PathBuf::from("dbip-city-ipv6.mmdb"),
            base_url: None,
        }
    }
}

/// Redirect response settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectSettings {
    /// `Cache-Control: max-age` sent with every redirect.
    pub cache_max_age_secs: u64,
}

impl Default for RedirectSettings {
    fn default() -> Self {
        Self {
            cache_max_age_secs: 3600,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A regional endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionConfig {
    /// Unique region identifier (e.g., "europe").
    pub name: String,

    /// Redirect target, sent verbatim as the `Location` header.
    pub endpoint: String,

    /// City the region is hosted in, for logging.
    #[serde(default)]
    pub city: Option<String>,

    pub latitude: f64,
    pub longitude: f64,
}
