#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Forecast point types for the dengue trend forecaster.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecast row per future week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Monday that starts the forecast week.
    pub week_start: NaiveDate,
    /// Point forecast (cases, never negative).
    pub predicted_mean: f64,
    /// Lower bound of the uncertainty band (clamped at zero).
    pub predicted_lower: f64,
    /// Upper bound of the uncertainty band.
    pub predicted_upper: f64,
}

impl ForecastPoint {
    /// Unclamped half-width of the uncertainty band.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.predicted_upper - self.predicted_mean
    }

    /// Whether `predicted_lower <= predicted_mean <= predicted_upper`.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.predicted_lower <= self.predicted_mean && self.predicted_mean <= self.predicted_upper
    }
}
