//! Compile-time registry of region definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a region requires a new [`Region`] variant, a TOML file in
//! `regions/` and a corresponding entry here.

use std::sync::LazyLock;

use dengue_ews_region_models::{Region, RegionDefinition};

/// Number of registered regions. Enforced by a test.
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 5;

/// Embedded TOML region definitions.
const REGION_TOMLS: &[(&str, &str)] = &[
    ("bangkok", include_str!("../regions/bangkok.toml")),
    ("chiang_mai", include_str!("../regions/chiang_mai.toml")),
    ("phuket", include_str!("../regions/phuket.toml")),
    ("khon_kaen", include_str!("../regions/khon_kaen.toml")),
    ("songkhla", include_str!("../regions/songkhla.toml")),
];

/// Parsed definitions, in [`Region::all`] order.
static DEFINITIONS: LazyLock<Vec<RegionDefinition>> = LazyLock::new(|| {
    let mut defs = all_regions();
    defs.sort_by_key(|d| d.region);
    log::debug!("Loaded {} region definitions", defs.len());
    defs
});

/// Returns all registered region definitions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_regions() -> Vec<RegionDefinition> {
    REGION_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse region definition '{name}': {e}"))
        })
        .collect()
}

/// Returns the definition for `region`.
///
/// # Panics
///
/// Panics if `region` has no embedded definition, which the
/// `every_region_is_registered` test rules out.
#[must_use]
pub fn definition(region: Region) -> &'static RegionDefinition {
    DEFINITIONS
        .iter()
        .find(|d| d.region == region)
        .unwrap_or_else(|| panic!("No registry entry for region {region}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_regions() {
        let regions = all_regions();
        assert_eq!(
            regions.len(),
            EXPECTED_REGION_COUNT,
            "Expected {EXPECTED_REGION_COUNT} regions, found {}. \
             Update EXPECTED_REGION_COUNT after adding/removing regions.",
            regions.len()
        );
    }

    #[test]
    fn region_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for def in &all_regions() {
            assert!(seen.insert(def.region), "Duplicate region: {}", def.region);
        }
    }

    #[test]
    fn file_names_match_region_ids() {
        for (name, toml_str) in REGION_TOMLS {
            let def: RegionDefinition = toml::de::from_str(toml_str).unwrap();
            assert_eq!(*name, def.region.id(), "{name}.toml declares {}", def.region);
        }
    }

    #[test]
    fn every_region_is_registered() {
        for region in Region::all() {
            assert_eq!(definition(*region).region, *region);
        }
    }

    #[test]
    fn profiles_are_positive() {
        for def in &all_regions() {
            let p = def.profile;
            assert!(p.baseline > 0.0, "{}: baseline {}", def.region, p.baseline);
            assert!(p.amplitude > 0.0, "{}: amplitude {}", def.region, p.amplitude);
            assert!(p.trend >= 0.0, "{}: trend {}", def.region, p.trend);
            assert!(
                (0.0..1.0).contains(&p.volatility),
                "{}: volatility {}",
                def.region,
                p.volatility
            );
        }
    }

    #[test]
    fn metrics_are_in_range() {
        for def in &all_regions() {
            let m = def.metrics;
            assert!(m.mae > 0.0 && m.rmse >= m.mae, "{}: mae/rmse", def.region);
            assert!((0.0..=1.0).contains(&m.r2), "{}: r2 {}", def.region, m.r2);
            assert!(
                (-1.0..=1.0).contains(&m.correlation),
                "{}: correlation {}",
                def.region,
                m.correlation
            );
            assert!(m.median_ae <= m.mae, "{}: median_ae", def.region);
        }
    }
}
