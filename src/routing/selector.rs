//! Nearest-region selection.
//!
//! Tie-break: regions are scanned in name order and a candidate replaces
//! the current best when its distance is less than or equal to it, so among
//! equally distant regions the one with the greatest name wins.

use thiserror::Error;

use crate::geo::{distance_km, Coordinate};
use crate::routing::region::{Region, RegionTable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no regions configured")]
    NoRegionsConfigured,
}

impl RegionTable {
    /// Select the region nearest to `client`.
    pub fn nearest(&self, client: Coordinate) -> Result<&Region, SelectError> {
        tracing::debug!(regions = self.len(), "Searching nearest region");

        let mut best: Option<(&Region, f64)> = None;
        for region in self.iter() {
            let distance = distance_km(region.coordinate, client);
            tracing::debug!(
                region = %region.name,
                city = %region.display_city(),
                distance_km = distance,
                "Candidate region"
            );
            match best {
                Some((_, best_distance)) if distance > best_distance => {}
                _ => best = Some((region, distance)),
            }
        }

        best.map(|(region, _)| region)
            .ok_or(SelectError::NoRegionsConfigured)
    }
}
