#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for dashboard analytics.
//!
//! Defines the aggregates the dashboard shows around the raw series:
//! headline summary cards, the risk banner, recent-trend tables, the
//! cross-region comparison, the seasonal heatmap, syndromic context and
//! lagged climate correlations.

use chrono::NaiveDate;
use dengue_ews_region_models::Region;
use dengue_ews_surveillance_models::{ControlSignal, Covariate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    /// First year (inclusive).
    pub from: i32,
    /// Last year (inclusive).
    pub to: i32,
}

impl YearRange {
    /// Creates a range covering `from..=to`.
    #[must_use]
    pub const fn new(from: i32, to: i32) -> Self {
        Self { from, to }
    }

    /// A range containing every year.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            from: i32::MIN,
            to: i32::MAX,
        }
    }

    /// Whether `year` lies within the range.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.from <= year && year <= self.to
    }

    /// Whether the range is non-empty.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.from <= self.to
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::all()
    }
}

/// Severity of the dashboard's risk banner.
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
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    /// Cases or forecast well above the historical average.
    Elevated,
    /// Forecast noticeably above the current week.
    Rising,
    /// Within the expected range.
    Stable,
}

impl RiskLevel {
    /// Banner headline.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Elevated => "Elevated Risk",
            Self::Rising => "Increasing Trend",
            Self::Stable => "Stable",
        }
    }

    /// Banner body text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Elevated => "Cases above seasonal average",
            Self::Rising => "Forecasted rise in cases",
            Self::Stable => "Cases within expected range",
        }
    }
}

/// Ratios that trigger each risk level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskThresholds {
    /// Current or forecast cases above `historical_avg × elevated_ratio`
    /// raise [`RiskLevel::Elevated`].
    pub elevated_ratio: f64,
    /// Forecast above `current × rising_ratio` raises [`RiskLevel::Rising`].
    pub rising_ratio: f64,
}

impl RiskThresholds {
    /// Less sensitive thresholds (1.6 / 1.25).
    #[must_use]
    pub const fn conservative() -> Self {
        Self {
            elevated_ratio: 1.6,
            rising_ratio: 1.25,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            elevated_ratio: 1.5,
            rising_ratio: 1.2,
        }
    }
}

/// The risk banner shown above a region's charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlert {
    /// Classified level.
    pub level: RiskLevel,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl From<RiskLevel> for RiskAlert {
    fn from(level: RiskLevel) -> Self {
        Self {
            level,
            title: level.title().to_string(),
            message: level.message().to_string(),
        }
    }
}

/// Headline statistics for one region's (filtered) series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    /// Region summarized.
    pub region: Region,
    /// Week of the latest observation.
    pub latest_week: NaiveDate,
    /// Cases in the latest week.
    pub current_cases: u32,
    /// Cases in the week before, if present.
    pub previous_cases: Option<u32>,
    /// `current - previous`.
    pub week_change: i64,
    /// Percent change vs previous week (0 when previous is 0 or absent).
    pub week_change_pct: f64,
    /// Mean of the last four weeks.
    pub avg_4_week: f64,
    /// Mean of the four weeks before those, if any.
    pub prev_avg_4_week: Option<f64>,
    /// Mean over the whole series.
    pub historical_avg: f64,
    /// Calendar year of the latest observation.
    pub latest_year: i32,
    /// Highest weekly count in `latest_year`.
    pub peak_latest_year: u32,
    /// Total cases in `latest_year`.
    pub total_latest_year: u64,
    /// Total cases in the year before, if the series covers it.
    pub total_previous_year: Option<u64>,
    /// Percent change of `total_latest_year` vs `total_previous_year`.
    pub year_change_pct: Option<f64>,
    /// Point forecast for the next week, if supplied.
    pub next_week_forecast: Option<f64>,
    /// Forecast minus current cases.
    pub forecast_change: Option<f64>,
    /// Forecast change as a percent of current cases (0 when current is 0).
    pub forecast_change_pct: Option<f64>,
    /// Risk banner.
    pub alert: RiskAlert,
}

/// One row of the recent-trend table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    /// Week.
    pub week_start: NaiveDate,
    /// Cases that week.
    pub case_count: u32,
    /// Centred 4-week rolling mean.
    pub rolling_4: Option<f64>,
    /// Centred 8-week rolling mean.
    pub rolling_8: Option<f64>,
    /// Change from the previous week.
    pub week_change: Option<i64>,
}

/// One region's totals for a single year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionComparison {
    /// Region.
    pub region: Region,
    /// Year compared.
    pub year: i32,
    /// Weeks observed in `year`.
    pub weeks: usize,
    /// Total cases.
    pub total_cases: u64,
    /// Mean weekly cases.
    pub mean_cases: f64,
    /// Highest weekly count.
    pub peak_cases: u32,
    /// Lowest weekly count.
    pub min_cases: u32,
    /// Sample standard deviation of weekly counts, `None` with one week.
    pub std_dev: Option<f64>,
}

/// Cases summed over one calendar month for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// Region.
    pub region: Region,
    /// Year aggregated.
    pub year: i32,
    /// Calendar month of `week_start` (1-12).
    pub month: u32,
    /// Cases summed over the month's weeks (0 when none).
    pub total_cases: u64,
}

/// This week's comparator disease count against the week before.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSignalChange {
    /// Region.
    pub region: Region,
    /// Week of the latest observation.
    pub week_start: NaiveDate,
    /// Signal reported.
    pub signal: ControlSignal,
    /// Count in the latest week.
    pub current: u32,
    /// Count in the week before, if present.
    pub previous: Option<u32>,
    /// `current - previous`.
    pub change: i64,
    /// Percent change vs previous week (0 when previous is 0 or absent).
    pub change_pct: f64,
}

/// Correlation of cases against a covariate lagged by `lag` weeks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LagCorrelation {
    /// Covariate correlated.
    pub covariate: Covariate,
    /// Lag in weeks (covariate leads cases).
    pub lag: usize,
    /// Pearson correlation, `None` when undefined.
    pub correlation: Option<f64>,
}

/// Latest climate readings against their series means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateSummary {
    /// Latest mean temperature.
    pub current_temperature: f64,
    /// Mean temperature over the series.
    pub mean_temperature: f64,
    /// Latest humidity.
    pub current_humidity: f64,
    /// Mean humidity over the series.
    pub mean_humidity: f64,
    /// Latest weekly rainfall.
    pub current_rainfall: f64,
    /// Mean weekly rainfall over the series.
    pub mean_rainfall: f64,
    /// Rainfall summed over the last four weeks.
    pub recent_rainfall_total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_range_bounds_are_inclusive() {
        let range = YearRange::new(2022, 2023);
        assert!(range.contains(2022));
        assert!(range.contains(2023));
        assert!(!range.contains(2024));
        assert!(!YearRange::new(2024, 2023).is_valid());
        assert!(YearRange::all().contains(1900));
    }

    #[test]
    fn alert_text_follows_level() {
        let alert = RiskAlert::from(RiskLevel::Rising);
        assert_eq!(alert.title, "Increasing Trend");
        assert_eq!(alert.level.to_string(), "rising");
    }
}
