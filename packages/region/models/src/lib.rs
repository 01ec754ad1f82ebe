#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Surveillance region identifiers, generation profiles and validation
//! metric types.
//!
//! This crate defines the fixed set of catchment regions tracked by the
//! early-warning system, along with the per-region parameters that drive
//! synthetic series generation and the canned model validation metrics
//! shown next to each forecast.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the fixed geographic catchment areas tracked independently.
///
/// `Display` yields the human-readable name (`"Chiang Mai"`); serde and
/// [`Region::id`] use the stable `snake_case` identifier (`"chiang_mai"`).
/// Parsing accepts either form, case-insensitively.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Region {
    /// Bangkok metropolitan area
    #[strum(to_string = "Bangkok", serialize = "bangkok")]
    Bangkok,
    /// Chiang Mai province (north)
    #[strum(to_string = "Chiang Mai", serialize = "chiang_mai")]
    ChiangMai,
    /// Phuket province (south, island)
    #[strum(to_string = "Phuket", serialize = "phuket")]
    Phuket,
    /// Khon Kaen province (north-east)
    #[strum(to_string = "Khon Kaen", serialize = "khon_kaen")]
    KhonKaen,
    /// Songkhla province (deep south)
    #[strum(to_string = "Songkhla", serialize = "songkhla")]
    Songkhla,
}

impl Region {
    /// Returns all variants of this enum, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bangkok,
            Self::ChiangMai,
            Self::Phuket,
            Self::KhonKaen,
            Self::Songkhla,
        ]
    }

    /// Returns the stable machine identifier (`snake_case`).
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Bangkok => "bangkok",
            Self::ChiangMai => "chiang_mai",
            Self::Phuket => "phuket",
            Self::KhonKaen => "khon_kaen",
            Self::Songkhla => "songkhla",
        }
    }

    /// Returns a small stable ordinal, used to derive per-region RNG streams.
    #[must_use]
    pub const fn ordinal(self) -> u64 {
        match self {
            Self::Bangkok => 0,
            Self::ChiangMai => 1,
            Self::Phuket => 2,
            Self::KhonKaen => 3,
            Self::Songkhla => 4,
        }
    }
}

/// Fixed per-region parameters for synthetic case-count generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionProfile {
    /// Mean weekly case level around which the seasonal cycle oscillates.
    pub baseline: f64,
    /// Amplitude of the annual seasonal cycle.
    pub amplitude: f64,
    /// Total long-run increase applied linearly over the generated horizon.
    pub trend: f64,
    /// Noise standard deviation as a fraction of `baseline`.
    pub volatility: f64,
    /// Amplitude of the secondary (semi-annual) harmonic.
    #[serde(default)]
    pub harmonic_amplitude: f64,
}

/// Canned model validation metrics for one region.
///
/// These are static configuration values displayed by the dashboard; they
/// are never computed from any model output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMetrics {
    /// Mean absolute error (cases).
    pub mae: f64,
    /// Root-mean-squared error (cases).
    pub rmse: f64,
    /// Coefficient of determination.
    pub r2: f64,
    /// Median absolute error (cases).
    pub median_ae: f64,
    /// Mean absolute percentage error (percent).
    pub mape: f64,
    /// Pearson correlation between predictions and observations.
    pub correlation: f64,
    /// Continuous ranked probability score, when published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crps: Option<f64>,
}

/// A complete region definition as stored in the embedded registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDefinition {
    /// Which region this definition describes.
    pub region: Region,
    /// Generation parameters.
    pub profile: RegionProfile,
    /// Canned validation metrics.
    pub metrics: ValidationMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_and_id_forms() {
        for region in Region::all() {
            let from_name: Region = region.to_string().parse().unwrap();
            let from_id: Region = region.id().parse().unwrap();
            assert_eq!(from_name, *region);
            assert_eq!(from_id, *region);
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("CHIANG MAI".parse::<Region>().unwrap(), Region::ChiangMai);
        assert_eq!("Khon_Kaen".parse::<Region>().unwrap(), Region::KhonKaen);
        assert!("Hanoi".parse::<Region>().is_err());
    }

    #[test]
    fn display_uses_human_names() {
        assert_eq!(Region::ChiangMai.to_string(), "Chiang Mai");
        assert_eq!(Region::KhonKaen.as_ref(), "Khon Kaen");
    }

    #[test]
    fn ordinals_are_unique() {
        let mut ordinals: Vec<u64> = Region::all().iter().map(|r| r.ordinal()).collect();
        ordinals.sort_unstable();
        ordinals.dedup();
        assert_eq!(ordinals.len(), Region::all().len());
    }
}
