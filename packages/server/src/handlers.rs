//! HTTP handler functions for the dengue early-warning API.

use actix_web::{HttpResponse, web};
use dengue_ews_analytics::{
    climate_summary, compare_regions, filter_region, lagged_correlation, seasonal_heatmap,
    summarize, syndromic_summary, trend_rows,
};
use dengue_ews_analytics_models::YearRange;
use dengue_ews_region::{metrics as region_metrics, parse_region, registry};
use dengue_ews_server_models::{
    ApiCorrelation, ApiHealth, ApiMetrics, ApiRefresh, ApiRegion, ApiSummary,
    ComparisonQueryParams, CorrelationQueryParams, ForecastQueryParams, MetricsQueryParams,
    ObservationQueryParams, SummaryQueryParams,
};
use dengue_ews_surveillance_models::{Covariate, ObservationRecord};

use crate::{AppState, ServerError};

const DEFAULT_HORIZON: usize = 4;
const MAX_HORIZON: usize = 52;
const DEFAULT_MAX_LAG: usize = 8;
const MAX_LAG: usize = 52;
const TREND_WEEKS: usize = 12;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/regions`
///
/// Lists the configured regions with their generation profiles.
pub async fn regions() -> HttpResponse {
    let regions: Vec<ApiRegion> = registry::all_regions()
        .into_iter()
        .map(|def| ApiRegion::from((def.region, def.profile)))
        .collect();

    HttpResponse::Ok().json(regions)
}

/// `GET /api/observations`
///
/// Returns one region's weekly rows, optionally narrowed to a year range.
pub async fn observations(
    state: web::Data<AppState>,
    params: web::Query<ObservationQueryParams>,
) -> Result<HttpResponse, ServerError> {
    let region = parse_region(&params.region)?;
    let years = year_range(params.year_from, params.year_to);

    let table = state.series()?;
    let rows = filter_region(&table, region, years)?;

    Ok(HttpResponse::Ok().json(rows))
}

/// `GET /api/forecast`
///
/// Forecasts past the end of one region's full series. Without a `seed`
/// query the server's configured seed is used.
pub async fn forecast(
    state: web::Data<AppState>,
    params: web::Query<ForecastQueryParams>,
) -> Result<HttpResponse, ServerError> {
    let region = parse_region(&params.region)?;
    let horizon = horizon(params.horizon)?;

    let table = state.series()?;
    let rows = filter_region(&table, region, YearRange::all())?;
    let points = state
        .forecaster
        .forecast(&rows, horizon, params.seed.or(state.params.seed))?;

    Ok(HttpResponse::Ok().json(points))
}

/// `GET /api/metrics`
///
/// Returns the canned validation metrics for a region.
pub async fn metrics(params: web::Query<MetricsQueryParams>) -> Result<HttpResponse, ServerError> {
    let region = parse_region(&params.region)?;

    Ok(HttpResponse::Ok().json(ApiMetrics {
        region,
        metrics: region_metrics(region),
    }))
}

/// `GET /api/summary`
///
/// Builds the dashboard view for one region: summary cards and risk
/// banner, climate snapshot, recent trend table, syndromic context and
/// forecast.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<SummaryQueryParams>,
) -> Result<HttpResponse, ServerError> {
    let region = parse_region(&params.region)?;
    let years = year_range(params.year_from, params.year_to);
    let horizon = horizon(params.horizon)?;

    let table = state.series()?;
    let rows = filter_region(&table, region, years)?;
    let forecast = state.forecaster.forecast(&rows, horizon, state.params.seed)?;
    let next_week = forecast.first().map(|p| p.predicted_mean);

    Ok(HttpResponse::Ok().json(ApiSummary {
        summary: summarize(&rows, next_week, &state.thresholds)?,
        climate: climate_summary(&rows)?,
        trend: trend_rows(&rows, TREND_WEEKS),
        syndromic: syndromic_summary(&rows)?,
        forecast,
    }))
}

/// `GET /api/comparison`
///
/// Compares every region's weekly cases for one year, defaulting to the
/// latest year in the series.
pub async fn comparison(
    state: web::Data<AppState>,
    params: web::Query<ComparisonQueryParams>,
) -> Result<HttpResponse, ServerError> {
    let table = state.series()?;
    let rows = resolve_year(&table, params.year)
        .map_or_else(Vec::new, |year| compare_regions(&table, year));

    Ok(HttpResponse::Ok().json(rows))
}

/// `GET /api/heatmap`
///
/// Region × month case totals for one year, defaulting to the latest year
/// in the series.
pub async fn heatmap(
    state: web::Data<AppState>,
    params: web::Query<ComparisonQueryParams>,
) -> Result<HttpResponse, ServerError> {
    let table = state.series()?;
    let cells = resolve_year(&table, params.year)
        .map_or_else(Vec::new, |year| seasonal_heatmap(&table, year));

    Ok(HttpResponse::Ok().json(cells))
}

/// `GET /api/correlation`
///
/// Correlates one region's cases with each climate covariate at lags
/// `0..=maxLag` weeks.
pub async fn correlation(
    state: web::Data<AppState>,
    params: web::Query<CorrelationQueryParams>,
) -> Result<HttpResponse, ServerError> {
    let region = parse_region(&params.region)?;
    let max_lag = params.max_lag.unwrap_or(DEFAULT_MAX_LAG);
    if max_lag > MAX_LAG {
        return Err(ServerError::InvalidQuery {
            message: format!("maxLag must be at most {MAX_LAG}, got {max_lag}"),
        });
    }

    let table = state.series()?;
    let rows = filter_region(&table, region, YearRange::all())?;
    let lags = Covariate::all()
        .iter()
        .flat_map(|&covariate| lagged_correlation(&rows, covariate, max_lag))
        .collect();

    Ok(HttpResponse::Ok().json(ApiCorrelation { region, lags }))
}

/// `POST /api/refresh`
///
/// Drops every cached series so the next request regenerates.
pub async fn refresh(state: web::Data<AppState>) -> HttpResponse {
    let cleared = state.cache.clear();
    HttpResponse::Ok().json(ApiRefresh { cleared })
}

fn resolve_year(table: &[ObservationRecord], requested: Option<i32>) -> Option<i32> {
    requested.or_else(|| table.iter().map(ObservationRecord::year).max())
}

fn year_range(from: Option<i32>, to: Option<i32>) -> YearRange {
    let all = YearRange::all();
    YearRange::new(from.unwrap_or(all.from), to.unwrap_or(all.to))
}

fn horizon(requested: Option<usize>) -> Result<usize, ServerError> {
    let horizon = requested.unwrap_or(DEFAULT_HORIZON);
    if horizon > MAX_HORIZON {
        return Err(ServerError::InvalidQuery {
            message: format!("horizon must be at most {MAX_HORIZON}, got {horizon}"),
        });
    }
    Ok(horizon)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use dengue_ews_analytics_models::{HeatmapCell, LagCorrelation, RegionComparison};
    use dengue_ews_forecast_models::ForecastPoint;
    use dengue_ews_region_models::Region;
    use dengue_ews_server_models::{ApiError, ApiMetrics, ApiRefresh, ApiRegion, ApiSummary};
    use dengue_ews_surveillance_models::ObservationRecord;

    use crate::{AppState, configure};

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    fn seeded_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(Some(7)))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn lists_five_regions() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/regions").to_request();
        let regions: Vec<ApiRegion> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(regions.len(), 5);
        assert!(regions.iter().any(|r| r.id == "khon_kaen" && r.name == "Khon Kaen"));
    }

    #[actix_web::test]
    async fn observations_filter_by_year() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/observations?region=chiang_mai&yearFrom=2023&yearTo=2023")
            .to_request();
        let rows: Vec<ObservationRecord> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(rows.len(), 52);
        assert!(rows.iter().all(|r| r.region == Region::ChiangMai && r.year() == 2023));
    }

    #[actix_web::test]
    async fn unknown_region_is_bad_request() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/observations?region=atlantis")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ApiError = test::read_body_json(resp).await;
        assert!(body.error.contains("atlantis"), "error was {}", body.error);
    }

    #[actix_web::test]
    async fn inverted_year_range_is_bad_request() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/observations?region=bangkok&yearFrom=2024&yearTo=2022")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn forecast_is_reproducible_with_seed() {
        let state = seeded_state();
        let app = app!(state);

        let mut runs = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::get()
                .uri("/api/forecast?region=phuket&horizon=6&seed=11")
                .to_request();
            let points: Vec<ForecastPoint> = test::call_and_read_body_json(&app, req).await;
            runs.push(points);
        }

        assert_eq!(runs[0].len(), 6);
        assert_eq!(runs[0], runs[1]);
        assert!(runs[0].iter().all(ForecastPoint::is_bounded));
    }

    #[actix_web::test]
    async fn forecast_rejects_bad_horizons() {
        let state = seeded_state();
        let app = app!(state);
        for uri in [
            "/api/forecast?region=phuket&horizon=0",
            "/api/forecast?region=phuket&horizon=53",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[actix_web::test]
    async fn metrics_are_canned() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/metrics?region=Bangkok")
            .to_request();
        let body: ApiMetrics = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.region, Region::Bangkok);
        assert!((body.metrics.mae - 12.4).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn summary_combines_views() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/summary?region=songkhla&horizon=3")
            .to_request();
        let body: ApiSummary = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.summary.region, Region::Songkhla);
        assert_eq!(body.forecast.len(), 3);
        assert_eq!(body.trend.len(), 12);
        assert_eq!(
            body.summary.next_week_forecast,
            Some(body.forecast[0].predicted_mean)
        );
        assert_eq!(body.trend.last().map(|t| t.week_start), Some(body.summary.latest_week));
        assert_eq!(body.syndromic.len(), 2);
        assert!(
            body.syndromic
                .iter()
                .all(|s| s.week_start == body.summary.latest_week)
        );
    }

    #[actix_web::test]
    async fn unseeded_forecast_matches_summary() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/summary?region=khon_kaen")
            .to_request();
        let summary: ApiSummary = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/forecast?region=khon_kaen")
            .to_request();
        let points: Vec<ForecastPoint> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(points.len(), 4);
        assert_eq!(points, summary.forecast);
        assert_eq!(
            summary.summary.next_week_forecast,
            Some(points[0].predicted_mean)
        );
    }

    #[actix_web::test]
    async fn comparison_defaults_to_latest_year() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/comparison").to_request();
        let rows: Vec<RegionComparison> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.year == 2024));
        assert!(rows.windows(2).all(|w| w[0].total_cases >= w[1].total_cases));
    }

    #[actix_web::test]
    async fn heatmap_has_twelve_months_per_region() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/heatmap?year=2023")
            .to_request();
        let cells: Vec<HeatmapCell> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(cells.len(), 5 * 12);
        assert!(cells.iter().all(|c| c.year == 2023 && (1..=12).contains(&c.month)));

        let req = test::TestRequest::get()
            .uri("/api/comparison?year=2023")
            .to_request();
        let rows: Vec<RegionComparison> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            cells.iter().map(|c| c.total_cases).sum::<u64>(),
            rows.iter().map(|r| r.total_cases).sum::<u64>()
        );
    }

    #[actix_web::test]
    async fn correlation_covers_every_covariate_and_lag() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get()
            .uri("/api/correlation?region=bangkok&maxLag=4")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let lags: Vec<LagCorrelation> = serde_json::from_value(body["lags"].clone()).unwrap();

        assert_eq!(lags.len(), 3 * 5);
        assert!(
            lags.iter()
                .filter_map(|l| l.correlation)
                .all(|r| (-1.0..=1.0).contains(&r))
        );
    }

    #[actix_web::test]
    async fn refresh_clears_cache() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/observations?region=bangkok")
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
        assert_eq!(state.cache.len(), 1);

        let req = test::TestRequest::post().uri("/api/refresh").to_request();
        let body: ApiRefresh = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.cleared, 1);
        assert!(state.cache.is_empty());
    }
}
