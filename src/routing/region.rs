//! Region table.
//!
//! # Responsibilities
//! - Store the configured regions
//! - Fix a stable iteration order (lexicographic by name)
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Explicit empty table rather than a synthetic default region

use std::collections::BTreeMap;

use crate::config::RegionConfig;
use crate::geo::Coordinate;

/// A named deployment location clients can be redirected to.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub endpoint: String,
    pub city: Option<String>,
    pub coordinate: Coordinate,
}

impl Region {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            city: None,
            coordinate,
        }
    }

    /// City for logs, falling back to the region name.
    pub fn display_city(&self) -> &str {
        self.city.as_deref().unwrap_or(&self.name)
    }
}

impl From<RegionConfig> for Region {
    fn from(config: RegionConfig) -> Self {
        Self {
            name: config.name,
            endpoint: config.endpoint,
            city: config.city,
            coordinate: Coordinate::new(config.latitude, config.longitude),
        }
    }
}

/// The immutable set of regions, keyed and ordered by name.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: BTreeMap<String, Region>,
}

impl RegionTable {
    /// Build a table. Names are expected to be unique; on a duplicate the
    /// later entry replaces the earlier one.
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        let regions = regions
            .into_iter()
            .map(|region| (region.name.clone(), region))
            .collect();
        Self { regions }
    }

    pub fn from_config(configs: Vec<RegionConfig>) -> Self {
        Self::new(configs.into_iter().map(Region::from))
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.get(name)
    }

    /// Regions in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
