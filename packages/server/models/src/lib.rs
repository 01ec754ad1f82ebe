#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the dengue early-warning server.
//!
//! These types are serialized to JSON for the REST API. They wrap the
//! library result types so the API contract can evolve independently.

use dengue_ews_analytics_models::{
    ClimateSummary, ControlSignalChange, LagCorrelation, RegionSummary, TrendRow,
};
use dengue_ews_forecast_models::ForecastPoint;
use dengue_ews_region_models::{Region, RegionProfile, ValidationMetrics};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// A configured region as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegion {
    /// Stable identifier (`chiang_mai`).
    pub id: String,
    /// Display name (`Chiang Mai`).
    pub name: String,
    /// Series parameters.
    pub profile: RegionProfile,
}

impl From<(Region, RegionProfile)> for ApiRegion {
    fn from((region, profile): (Region, RegionProfile)) -> Self {
        Self {
            id: region.id().to_string(),
            name: region.to_string(),
            profile,
        }
    }
}

/// Query parameters for the observations endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationQueryParams {
    /// Region name or identifier.
    pub region: String,
    /// First year to include.
    pub year_from: Option<i32>,
    /// Last year to include.
    pub year_to: Option<i32>,
}

/// Query parameters for the forecast endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQueryParams {
    /// Region name or identifier.
    pub region: String,
    /// Weeks ahead (defaults to 4).
    pub horizon: Option<usize>,
    /// Seed for the forecast noise.
    pub seed: Option<u64>,
}

/// Query parameters for the metrics endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsQueryParams {
    /// Region name or identifier.
    pub region: String,
}

/// Canned validation metrics for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    /// Region the metrics belong to.
    pub region: Region,
    /// Metric values.
    pub metrics: ValidationMetrics,
}

/// Query parameters for the summary endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQueryParams {
    /// Region name or identifier.
    pub region: String,
    /// First year to include.
    pub year_from: Option<i32>,
    /// Last year to include.
    pub year_to: Option<i32>,
    /// Weeks ahead (defaults to 4).
    pub horizon: Option<usize>,
}

/// Everything the dashboard shows for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    /// Headline statistics and risk banner.
    pub summary: RegionSummary,
    /// Latest climate readings.
    pub climate: ClimateSummary,
    /// Recent weeks with rolling means.
    pub trend: Vec<TrendRow>,
    /// Comparator disease counts for the latest week.
    pub syndromic: Vec<ControlSignalChange>,
    /// Forecast past the selected series.
    pub forecast: Vec<ForecastPoint>,
}

/// Query parameters for the comparison and heatmap endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonQueryParams {
    /// Year to aggregate (defaults to the latest year in the series).
    pub year: Option<i32>,
}

/// Query parameters for the correlation endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationQueryParams {
    /// Region name or identifier.
    pub region: String,
    /// Largest lag in weeks (defaults to 8).
    pub max_lag: Option<usize>,
}

/// Lagged correlations of one region's cases against each covariate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCorrelation {
    /// Region correlated.
    pub region: Region,
    /// One entry per covariate per lag.
    pub lags: Vec<LagCorrelation>,
}

/// Result of clearing the series cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRefresh {
    /// Number of cached tables dropped.
    pub cleared: usize,
}

/// Error body returned for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable description.
    pub error: String,
}
