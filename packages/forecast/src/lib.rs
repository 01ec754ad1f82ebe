#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Naive trend-extrapolation forecaster.
//!
//! Fits an ordinary-least-squares line through the most recent weekly case
//! counts of one region, extrapolates it, applies a small seasonal
//! multiplier for the target week, adds noise and wraps each point in an
//! uncertainty band that widens linearly with the horizon.
//!
//! This is a formula, not a model: there is no estimation beyond the line
//! fit and no validation.

pub mod trend;

use chrono::NaiveDate;
use dengue_ews_region_models::Region;
use thiserror::Error;

pub use trend::{ForecastConfig, LinearFit, TrendForecaster, fit_linear};

/// Errors that can occur while forecasting.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few historical points for the trend fit.
    #[error("Insufficient history: {available} weeks available, at least {required} required")]
    InsufficientHistory {
        /// Minimum number of weeks required.
        required: usize,
        /// Number of weeks supplied.
        available: usize,
    },

    /// A forecast horizon of zero weeks was requested.
    #[error("Forecast horizon must be at least one week")]
    InvalidHorizon,

    /// The history contains rows from more than one region.
    #[error("History mixes regions {first} and {other}")]
    MixedRegions {
        /// Region of the first row.
        first: Region,
        /// First differing region found.
        other: Region,
    },

    /// The history is not strictly increasing by week.
    #[error("History is not ordered by week: {previous} is followed by {next}")]
    UnorderedHistory {
        /// Earlier row's week.
        previous: NaiveDate,
        /// Offending following week.
        next: NaiveDate,
    },

    /// The forecaster configuration cannot produce valid bands.
    #[error("Invalid forecast configuration: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },

    /// A forecast week falls outside the representable calendar.
    #[error("Forecast week out of range after {last}")]
    DateOverflow {
        /// Last historical week.
        last: NaiveDate,
    },
}
