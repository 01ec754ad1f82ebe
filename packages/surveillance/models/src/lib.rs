#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weekly surveillance observation rows and series generation parameters.
//!
//! These types form the tabular contract between the series generator and
//! its consumers (analytics, the forecaster, the API and the CLI). One
//! [`ObservationRecord`] is produced per region per epidemiological week.

use chrono::{Datelike, NaiveDate};
use dengue_ews_region_models::Region;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// First Monday of the default historical range.
pub const DEFAULT_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2022, 1, 3) {
    Some(date) => date,
    None => panic!("invalid default start date"),
};

/// Last Monday (inclusive) of the default historical range.
pub const DEFAULT_END_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2024, 11, 11) {
    Some(date) => date,
    None => panic!("invalid default end date"),
};

/// One row per (region, epidemiological week).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    /// Region the row belongs to.
    pub region: Region,
    /// Monday that starts the reporting week.
    pub week_start: NaiveDate,
    /// Reported dengue cases (never negative).
    pub case_count: u32,
    /// Mean temperature (°C).
    pub temperature_mean: f64,
    /// Relative humidity (percent).
    pub humidity_pct: f64,
    /// Weekly rainfall (mm).
    pub rainfall_mm: f64,
    /// Comparator disease A (chikungunya-like) weekly cases.
    pub control_signal_a: u32,
    /// Comparator disease B (HFMD-like) weekly cases.
    pub control_signal_b: u32,
}

impl ObservationRecord {
    /// Calendar year of `week_start`.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.week_start.year()
    }

    /// Calendar month of `week_start` (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.week_start.month()
    }

    /// ISO week number of `week_start`.
    #[must_use]
    pub fn iso_week(&self) -> u32 {
        self.week_start.iso_week().week()
    }

    /// Returns the value of a climate covariate.
    #[must_use]
    pub const fn covariate(&self, covariate: Covariate) -> f64 {
        match covariate {
            Covariate::Temperature => self.temperature_mean,
            Covariate::Humidity => self.humidity_pct,
            Covariate::Rainfall => self.rainfall_mm,
        }
    }

    /// Returns the weekly count of a comparator disease.
    #[must_use]
    pub const fn control_signal(&self, signal: ControlSignal) -> u32 {
        match signal {
            ControlSignal::A => self.control_signal_a,
            ControlSignal::B => self.control_signal_b,
        }
    }
}

/// Climate covariates carried on every observation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Covariate {
    /// Mean temperature.
    Temperature,
    /// Relative humidity.
    Humidity,
    /// Rainfall.
    Rainfall,
}

impl Covariate {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Temperature, Self::Humidity, Self::Rainfall]
    }
}

/// Comparator disease signals carried for syndromic context.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ControlSignal {
    /// Chikungunya-like signal.
    #[serde(rename = "control_signal_a")]
    #[strum(serialize = "control_signal_a")]
    A,
    /// HFMD-like signal.
    #[serde(rename = "control_signal_b")]
    #[strum(serialize = "control_signal_b")]
    B,
}

impl ControlSignal {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::A, Self::B]
    }
}

/// Parameters that fully determine one generated series table.
///
/// Doubles as the memoization key: two equal parameter sets with an
/// explicit `seed` always produce identical tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    /// Regions to generate, in output order.
    pub regions: Vec<Region>,
    /// First week of the range (rolled forward to a Monday).
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive).
    pub end_date: NaiveDate,
    /// RNG seed. `None` draws fresh entropy on every uncached generation.
    pub seed: Option<u64>,
}

impl GenerationParams {
    /// Creates parameters for the given regions and date range.
    #[must_use]
    pub const fn new(
        regions: Vec<Region>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        seed: Option<u64>,
    ) -> Self {
        Self {
            regions,
            start_date,
            end_date,
            seed,
        }
    }

    /// Returns a copy with the given seed.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for GenerationParams {
    /// All regions over the default 2022-01-03 .. 2024-11-11 range, unseeded.
    fn default() -> Self {
        Self::new(
            Region::all().to_vec(),
            DEFAULT_START_DATE,
            DEFAULT_END_DATE,
            None,
        )
    }
}
