#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic weekly dengue surveillance series.
//!
//! [`generator::SeriesGenerator`] produces one [`ObservationRecord`] per
//! region per Monday-aligned week: a seasonal case signal with a long-run
//! trend, Gaussian noise and randomly placed outbreaks, alongside climate
//! covariates and two comparator disease signals.
//!
//! [`cache::SeriesCache`] memoizes generated tables by their
//! [`GenerationParams`] so repeated dashboard requests see the same data
//! for the lifetime of the process.
//!
//! [`ObservationRecord`]: dengue_ews_surveillance_models::ObservationRecord
//! [`GenerationParams`]: dengue_ews_surveillance_models::GenerationParams

pub mod cache;
pub mod generator;

use chrono::NaiveDate;
use dengue_ews_region_models::Region;
use thiserror::Error;

pub use cache::{SeriesCache, SeriesTable};
pub use generator::{GeneratorConfig, OutbreakModel, SeriesGenerator};

/// Errors that can occur while generating a series.
#[derive(Debug, Error)]
pub enum SurveillanceError {
    /// The requested date range contains no Monday-aligned week.
    #[error("Empty date range: {start} .. {end} contains no reporting week")]
    EmptyRange {
        /// Requested first day.
        start: NaiveDate,
        /// Requested last day.
        end: NaiveDate,
    },

    /// No regions were requested.
    #[error("At least one region must be requested")]
    NoRegions,

    /// A noise distribution could not be built from a region's profile.
    #[error("Invalid profile for {region}: {message}")]
    InvalidProfile {
        /// Region whose profile was rejected.
        region: Region,
        /// Description of what went wrong.
        message: String,
    },
}
