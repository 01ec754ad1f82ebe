#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region lookup for the dengue early-warning system.
//!
//! Resolves user-supplied region identifiers against the fixed region set
//! and serves each region's generation profile and canned validation
//! metrics from the embedded [`registry`].

pub mod registry;

use dengue_ews_region_models::{Region, RegionProfile, ValidationMetrics};
use thiserror::Error;

/// Errors that can occur when resolving a region.
#[derive(Debug, Error)]
pub enum RegionError {
    /// The requested region is not in the configured set.
    #[error("Invalid region '{name}': expected one of bangkok, chiang_mai, phuket, khon_kaen, songkhla")]
    InvalidRegion {
        /// The identifier that failed to resolve.
        name: String,
    },
}

/// Resolves a region identifier (`"chiang_mai"` or `"Chiang Mai"`).
///
/// # Errors
///
/// Returns [`RegionError::InvalidRegion`] if the identifier does not name a
/// configured region. There is no fallback region.
pub fn parse_region(name: &str) -> Result<Region, RegionError> {
    name.trim()
        .parse::<Region>()
        .map_err(|_| RegionError::InvalidRegion {
            name: name.to_string(),
        })
}

/// Returns the generation profile for `region`.
#[must_use]
pub fn profile(region: Region) -> RegionProfile {
    registry::definition(region).profile
}

/// Returns the canned validation metrics for `region`.
#[must_use]
pub fn metrics(region: Region) -> ValidationMetrics {
    registry::definition(region).metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_regions() {
        assert_eq!(parse_region("bangkok").unwrap(), Region::Bangkok);
        assert_eq!(parse_region(" Chiang Mai ").unwrap(), Region::ChiangMai);
        assert_eq!(parse_region("SONGKHLA").unwrap(), Region::Songkhla);
    }

    #[test]
    fn rejects_unknown_region_without_fallback() {
        let err = parse_region("Atlantis").unwrap_err();
        assert!(matches!(err, RegionError::InvalidRegion { ref name } if name == "Atlantis"));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn bangkok_metrics_match_published_table() {
        let m = metrics(Region::Bangkok);
        assert!((m.mae - 12.4).abs() < f64::EPSILON);
        assert!((m.rmse - 18.7).abs() < f64::EPSILON);
        assert!((m.correlation - 0.89).abs() < f64::EPSILON);
    }

    #[test]
    fn profiles_differ_between_regions() {
        assert!(profile(Region::Bangkok).baseline > profile(Region::Phuket).baseline);
    }
}
