//! IP address to location resolution.
//!
//! # Responsibilities
//! - Parse the textual client address
//! - Reject loopback addresses (request never crossed a real network)
//! - Dispatch to the database for the address family
//! - Validate the decoded record into a `GeoLocation`

use std::net::IpAddr;

use serde::Deserialize;
use thiserror::Error;

use crate::geo::{Coordinate, GeoLocation};

/// Errors produced while resolving a client address.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Loopback addresses cannot be geolocated.
    #[error("{0} is a local address")]
    LocalAddress(IpAddr),

    /// The text is not an IP address.
    #[error("invalid IP address {0:?}")]
    InvalidAddress(String),

    /// The database holds no record for the address.
    #[error("no location record for {0}")]
    NotFound(IpAddr),

    /// The record exists but a field is missing, mistyped or out of range.
    #[error("malformed location record for {ip}: {reason}")]
    MalformedRecord { ip: IpAddr, reason: String },

    /// The database itself failed while searching.
    #[error("geo database error: {0}")]
    Database(String),
}

impl LookupError {
    /// True when the failure is attributable to the client address rather
    /// than to the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LookupError::Database(_))
    }
}

/// Address family selecting which database is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }
}

/// Raw city record as stored in the database.
///
/// Every field is optional at the decode step so that absence is reported
/// as a named field instead of a generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityRecord {
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub state1: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CityRecord {
    /// Validate presence and range of every field.
    pub fn into_location(self, ip: IpAddr) -> Result<GeoLocation, LookupError> {
        let missing = |field: &str| LookupError::MalformedRecord {
            ip,
            reason: format!("missing field `{field}`"),
        };

        let latitude = self.latitude.ok_or_else(|| missing("latitude"))?;
        let longitude = self.longitude.ok_or_else(|| missing("longitude"))?;
        let coordinate = Coordinate::new(latitude, longitude);
        if !coordinate.is_valid() {
            return Err(LookupError::MalformedRecord {
                ip,
                reason: format!("coordinate {coordinate} out of range"),
            });
        }

        Ok(GeoLocation {
            coordinate,
            city: self.city.ok_or_else(|| missing("city"))?,
            country_code: self.country_code.ok_or_else(|| missing("country_code"))?,
            state: self.state1.ok_or_else(|| missing("state1"))?,
            timezone: self.timezone.ok_or_else(|| missing("timezone"))?,
        })
    }
}

/// A queryable store of city records, one table per address family.
///
/// Implementations must allow concurrent reads through `&self`.
pub trait RecordSource: Send + Sync {
    /// Fetch the record for `ip` from the `family` table.
    ///
    /// `Ok(None)` means the address is not covered by the database.
    fn record(&self, family: AddressFamily, ip: IpAddr) -> Result<Option<CityRecord>, LookupError>;
}

/// Resolves client addresses to locations.
pub struct GeoLocator {
    source: Box<dyn RecordSource>,
}

impl GeoLocator {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Resolve a textual IP address.
    pub fn locate(&self, ip: &str) -> Result<GeoLocation, LookupError> {
        let parsed: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| LookupError::InvalidAddress(ip.to_string()))?;
        // IPv4-mapped IPv6 addresses live in the IPv4 table.
        let addr = parsed.to_canonical();

        if addr.is_loopback() {
            tracing::debug!(client_ip = %addr, "Refusing to geolocate loopback address");
            return Err(LookupError::LocalAddress(addr));
        }

        let family = AddressFamily::of(&addr);
        tracing::debug!(client_ip = %addr, family = ?family, "Looking up client location");

        let record = self
            .source
            .record(family, addr)?
            .ok_or(LookupError::NotFound(addr))?;
        let location = record.into_location(addr)?;

        tracing::debug!(
            client_ip = %addr,
            city = %location.city,
            country = %location.country_code,
            coordinate = %location.coordinate,
            "Resolved client location"
        );
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// Records stored as JSON so tests can express missing or mistyped fields.
    #[derive(Default)]
    struct JsonSource {
        v4: HashMap<IpAddr, Value>,
        v6: HashMap<IpAddr, Value>,
    }

    impl JsonSource {
        fn with(mut self, ip: &str, record: Value) -> Self {
            let ip: IpAddr = ip.parse().unwrap();
            match AddressFamily::of(&ip) {
                AddressFamily::V4 => self.v4.insert(ip, record),
                AddressFamily::V6 => self.v6.insert(ip, record),
            };
            self
        }
    }

    impl RecordSource for JsonSource {
        fn record(
            &self,
            family: AddressFamily,
            ip: IpAddr,
        ) -> Result<Option<CityRecord>, LookupError> {
            let table = match family {
                AddressFamily::V4 => &self.v4,
                AddressFamily::V6 => &self.v6,
            };
            table
                .get(&ip)
                .map(|v| {
                    serde_json::from_value(v.clone()).map_err(|e| LookupError::MalformedRecord {
                        ip,
                        reason: e.to_string(),
                    })
                })
                .transpose()
        }
    }

    fn paris() -> Value {
        json!({
            "city": "Paris",
            "country_code": "FR",
            "state1": "Ile-de-France",
            "timezone": "Europe/Paris",
            "latitude": 48.8,
            "longitude": 2.3,
        })
    }

    #[test]
    fn test_loopback_rejected() {
        let locator = GeoLocator::new(JsonSource::default().with("127.0.0.1", paris()));
        for ip in ["127.0.0.1", "::1", "127.8.9.10", "::ffff:127.0.0.1"] {
            let err = locator.locate(ip).unwrap_err();
            assert!(matches!(err, LookupError::LocalAddress(_)), "{ip}: {err}");
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_resolves_ipv4_record() {
        let locator = GeoLocator::new(JsonSource::default().with("203.0.113.5", paris()));
        let location = locator.locate("203.0.113.5").unwrap();
        assert_eq!(location.city, "Paris");
        assert_eq!(location.country_code, "FR");
        assert_eq!(location.state, "Ile-de-France");
        assert_eq!(location.timezone, "Europe/Paris");
        assert_eq!(location.coordinate, Coordinate::new(48.8, 2.3));
    }

    #[test]
    fn test_dispatch_by_family() {
        let source = JsonSource::default().with("2001:db8::1", paris());
        let locator = GeoLocator::new(source);
        assert!(locator.locate("2001:db8::1").is_ok());

        // Mapped addresses are answered from the IPv4 table.
        let locator = GeoLocator::new(JsonSource::default().with("198.51.100.7", paris()));
        assert!(locator.locate("::ffff:198.51.100.7").is_ok());
    }

    #[test]
    fn test_invalid_address() {
        let locator = GeoLocator::new(JsonSource::default());
        for ip in ["", "not-an-ip", "203.0.113.5:443", "300.1.1.1"] {
            assert!(matches!(locator.locate(ip), Err(LookupError::InvalidAddress(_))), "{ip}");
        }
    }

    #[test]
    fn test_missing_record() {
        let locator = GeoLocator::new(JsonSource::default());
        let err = locator.locate("192.0.2.1").unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[test]
    fn test_missing_latitude() {
        let mut record = paris();
        record.as_object_mut().unwrap().remove("latitude");
        let locator = GeoLocator::new(JsonSource::default().with("192.0.2.1", record));

        let err = locator.locate("192.0.2.1").unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("latitude"), "{err}");
    }

    #[test]
    fn test_mistyped_field() {
        let mut record = paris();
        record["longitude"] = json!("east");
        let locator = GeoLocator::new(JsonSource::default().with("192.0.2.1", record));

        assert!(matches!(
            locator.locate("192.0.2.1"),
            Err(LookupError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_out_of_range_coordinate() {
        let mut record = paris();
        record["latitude"] = json!(123.0);
        let locator = GeoLocator::new(JsonSource::default().with("192.0.2.1", record));

        let err = locator.locate("192.0.2.1").unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }

    #[test]
    fn test_database_error_is_not_client_error() {
        assert!(!LookupError::Database("corrupt search tree".into()).is_client_error());
    }
}
