//! Geolocation subsystem.
//!
//! # Data Flow
//! ```text
//! client IP (text)
//!     → lookup.rs (parse, reject loopback, pick address family)
//!     → maxmind.rs (per-family database, typed record decode)
//!     → GeoLocation (coordinate + descriptive fields)
//!     → distance.rs (haversine against each region)
//!
//! Startup:
//!     bootstrap.rs (download missing database files)
//!     → maxmind.rs (open long-lived readers)
//! ```
//!
//! # Design Decisions
//! - Database readers are opened once and shared read-only
//! - Records are decoded into typed structs, never untyped maps
//! - Distance is pure and does no range validation

pub mod bootstrap;
pub mod coordinate;
pub mod distance;
pub mod lookup;
pub mod maxmind;

pub use coordinate::{Coordinate, GeoLocation};
pub use distance::distance_km;
pub use lookup::{AddressFamily, CityRecord, GeoLocator, LookupError, RecordSource};
pub use maxmind::MaxMindDatabases;
