//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Region Compilation (at startup):
//!     RegionConfig[] (validated)
//!     → region.rs (RegionTable, ordered by name)
//!     → Freeze as immutable table behind Arc
//!
//! Per request:
//!     client Coordinate
//!     → selector.rs (haversine against every region)
//!     → Return: nearest Region or NoRegionsConfigured
//! ```
//!
//! # Design Decisions
//! - Regions compiled at startup, immutable at runtime
//! - O(n) scan (region counts are in the tens)
//! - Deterministic: same coordinate always selects the same region

pub mod region;
pub mod selector;

pub use region::{Region, RegionTable};
pub use selector::SelectError;
