//! MaxMind DB backed record source.
//!
//! One reader per address family, opened at startup and kept for the life
//! of the process. `maxminddb::Reader` answers lookups through `&self`, so
//! the readers are shared by all request handlers without locking.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use maxminddb::{MaxMindDbError, Reader};
use thiserror::Error;

use crate::config::GeoDbConfig;
use crate::geo::lookup::{AddressFamily, CityRecord, LookupError, RecordSource};

/// Failure to open a database file.
#[derive(Debug, Error)]
#[error("failed to open geo database {}: {source}", .path.display())]
pub struct OpenError {
    pub path: PathBuf,
    #[source]
    pub source: MaxMindDbError,
}

/// The IPv4 and IPv6 city databases.
pub struct MaxMindDatabases {
    ipv4: Reader<Vec<u8>>,
    ipv6: Reader<Vec<u8>>,
}

impl MaxMindDatabases {
    /// Open both databases named in the configuration.
    pub fn open(config: &GeoDbConfig) -> Result<Self, OpenError> {
        let ipv4 = open_reader(&config.ipv4_path)?;
        let ipv6 = open_reader(&config.ipv6_path)?;
        Ok(Self { ipv4, ipv6 })
    }

    fn reader(&self, family: AddressFamily) -> &Reader<Vec<u8>> {
        match family {
            AddressFamily::V4 => &self.ipv4,
            AddressFamily::V6 => &self.ipv6,
        }
    }
}

fn open_reader(path: &Path) -> Result<Reader<Vec<u8>>, OpenError> {
    let reader = Reader::open_readfile(path).map_err(|source| OpenError {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        database_type = %reader.metadata.database_type,
        ip_version = reader.metadata.ip_version,
        "Opened geo database"
    );
    Ok(reader)
}

impl RecordSource for MaxMindDatabases {
    fn record(&self, family: AddressFamily, ip: IpAddr) -> Result<Option<CityRecord>, LookupError> {
        let result = self
            .reader(family)
            .lookup(ip)
            .map_err(|e| LookupError::Database(e.to_string()))?;

        result.decode::<CityRecord>().map_err(|e| decode_error(ip, e))
    }
}

/// Only a record that does not fit `CityRecord` is the client's problem;
/// a corrupt data section or failed read is a database fault.
fn decode_error(ip: IpAddr, err: MaxMindDbError) -> LookupError {
    match err {
        MaxMindDbError::Decoding { .. } => LookupError::MalformedRecord {
            ip,
            reason: err.to_string(),
        },
        other => LookupError::Database(other.to_string()),
    }
}
