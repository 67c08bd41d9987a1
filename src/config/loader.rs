//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::env::{apply_env_overrides, EnvError};
use crate::config::schema::RedirectConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<RedirectConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RedirectConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the runtime configuration: optional file, then environment
/// overrides, then validation.
pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<RedirectConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => RedirectConfig::default(),
    };

    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [listener]
        bind_address = "127.0.0.1:8088"

        [geo_db]
        ipv4_path = "/var/lib/geo/dbip-city-ipv4.mmdb"
        ipv6_path = "/var/lib/geo/dbip-city-ipv6.mmdb"
        base_url = "https://cdn.example.com/geo/"

        [[regions]]
        name = "asia"
        endpoint = "https://tokyo.example.com"
        city = "Tokyo"
        latitude = 35.0
        longitude = 139.0

        [[regions]]
        name = "europe"
        endpoint = "https://london.example.com"
        latitude = 51.5
        longitude = -0.1
    "#;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write toml");
        tmp
    }

    #[test]
    fn test_load_config() {
        let tmp = write_tmp_file(SAMPLE);
        let config = load_config(tmp.path()).expect("load config");

        assert_eq!(config.listener.bind_address, "127.0.0.1:8088");
        assert_eq!(config.geo_db.base_url.as_deref(), Some("https://cdn.example.com/geo/"));
        assert_eq!(config.regions.len(), 2);
        assert_eq!(config.regions[0].city.as_deref(), Some("Tokyo"));
        assert_eq!(config.regions[1].city, None);
        // Sections left out fall back to defaults.
        assert_eq!(config.redirect.cache_max_age_secs, 3600);
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_parse_error() {
        let tmp = write_tmp_file("[[regions]]\nname = 42\n");
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/geo-redirect.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let tmp = write_tmp_file("[listener]\nbind_address = \"nope\"\n");
        let err = load_config(tmp.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: invalid bind address \"nope\", no regions configured"
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let tmp = write_tmp_file(SAMPLE);
        let config = load_with_env(Some(tmp.path()), |key: &str| match key {
            "PORT" => Some("9999".to_string()),
            "SERVER_1" => Some("america,nyc.example.com,New York,40.7,-74.0".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:9999");
        assert_eq!(config.regions.len(), 1);
        assert_eq!(config.regions[0].name, "america");
    }

    #[test]
    fn test_env_only() {
        let config = load_with_env(None, |key: &str| {
            (key == "SERVER_1").then(|| "europe,london.example.com,London,51.5,-0.1".to_string())
        })
        .unwrap();
        assert_eq!(config.regions[0].endpoint, "london.example.com");
    }
}
