//! Geo database bootstrap.
//!
//! # Responsibilities
//! - Detect database files missing on local disk
//! - Download them from `base_url` + file name
//! - Write atomically (`.part` file renamed on completion)
//!
//! Runs once before the readers are opened. Every failure is fatal to
//! startup; nothing here is retried.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::config::GeoDbConfig;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("geo database {} is missing and no base_url is configured", .0.display())]
    NoBaseUrl(PathBuf),

    #[error("geo database path {} has no file name", .0.display())]
    NoFileName(PathBuf),

    #[error("download of {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("writing {} failed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Database paths from the configuration that do not exist as files.
pub fn missing_databases(config: &GeoDbConfig) -> Vec<&Path> {
    [config.ipv4_path.as_path(), config.ipv6_path.as_path()]
        .into_iter()
        .filter(|path| !path.is_file())
        .collect()
}

/// Download URL for a database path: the base URL followed by the file name.
pub fn download_url(base_url: &str, path: &Path) -> Result<String, BootstrapError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BootstrapError::NoFileName(path.to_path_buf()))?;
    Ok(format!("{base_url}{file_name}"))
}

/// Make sure both database files exist, downloading any that are missing.
pub async fn ensure_databases(config: &GeoDbConfig) -> Result<(), BootstrapError> {
    let missing = missing_databases(config);
    if missing.is_empty() {
        tracing::debug!("Geo databases already present");
        return Ok(());
    }

    let client = reqwest::Client::new();
    for path in missing {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| BootstrapError::NoBaseUrl(path.to_path_buf()))?;
        let url = download_url(base_url, path)?;
        download(&client, &url, path).await?;
    }
    Ok(())
}

async fn download(client: &reqwest::Client, url: &str, dest: &Path) -> Result<(), BootstrapError> {
    tracing::info!(url = %url, dest = %dest.display(), "Downloading geo database");

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| BootstrapError::Http {
            url: url.to_string(),
            source,
        })?;

    let partial = dest.with_extension("part");
    let written = match write_partial(response, url, &partial).await {
        Ok(written) => written,
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
    };

    tokio::fs::rename(&partial, dest)
        .await
        .map_err(|source| BootstrapError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

    tracing::info!(dest = %dest.display(), bytes = written, "Download complete");
    Ok(())
}

/// Stream the response body into `partial`, returning the byte count.
async fn write_partial(
    mut response: reqwest::Response,
    url: &str,
    partial: &Path,
) -> Result<u64, BootstrapError> {
    let http_err = |source| BootstrapError::Http {
        url: url.to_string(),
        source,
    };
    let io_err = |source| BootstrapError::Io {
        path: partial.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(partial).await.map_err(io_err)?;
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(http_err)? {
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;
    Ok(written)
}
