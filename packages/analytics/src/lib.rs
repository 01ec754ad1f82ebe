#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard analytics over surveillance series.
//!
//! Every function is a pure computation over a slice of
//! [`ObservationRecord`]s: the API server and CLI fetch a (cached) table,
//! narrow it with [`filter_region`], and hand the slice to the aggregate
//! they need.
//!
//! [`ObservationRecord`]: dengue_ews_surveillance_models::ObservationRecord

pub mod compare;
pub mod correlation;
pub mod series;
pub mod summary;

use dengue_ews_analytics_models::YearRange;
use dengue_ews_region_models::Region;
use dengue_ews_surveillance_models::ObservationRecord;
use thiserror::Error;

pub use compare::{compare_regions, seasonal_heatmap};
pub use correlation::{lagged_correlation, pearson};
pub use series::{rolling_mean, trend_rows, week_over_week};
pub use summary::{climate_summary, risk_alert, summarize, syndromic_summary};

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The selected series has no rows.
    #[error("No observations for {region} in the selected years")]
    EmptySeries {
        /// Region that was queried.
        region: Region,
    },

    /// No rows at all were supplied.
    #[error("No observations supplied")]
    NoObservations,

    /// `from` is after `to`.
    #[error("Invalid year range: {from} is after {to}")]
    InvalidYearRange {
        /// First year requested.
        from: i32,
        /// Last year requested.
        to: i32,
    },
}

/// Returns the rows for `region` whose week falls in `years`, preserving
/// input order.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidYearRange`] if `years.from > years.to`
/// * [`AnalyticsError::EmptySeries`] if no row matches
pub fn filter_region(
    records: &[ObservationRecord],
    region: Region,
    years: YearRange,
) -> Result<Vec<ObservationRecord>, AnalyticsError> {
    if !years.is_valid() {
        return Err(AnalyticsError::InvalidYearRange {
            from: years.from,
            to: years.to,
        });
    }

    let rows: Vec<ObservationRecord> = records
        .iter()
        .filter(|r| r.region == region && years.contains(r.year()))
        .cloned()
        .collect();

    if rows.is_empty() {
        return Err(AnalyticsError::EmptySeries { region });
    }

    log::debug!("Selected {} rows for {region}", rows.len());
    Ok(rows)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}
