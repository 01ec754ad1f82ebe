#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the dengue early-warning dashboard.
//!
//! Serves the synthetic surveillance series, trend forecasts, canned
//! validation metrics and derived analytics as JSON for the browser
//! dashboard. Every request recomputes from the shared [`SeriesCache`];
//! `POST /api/refresh` drops the cache so the next request regenerates.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, middleware, web};
use dengue_ews_analytics::AnalyticsError;
use dengue_ews_analytics_models::RiskThresholds;
use dengue_ews_forecast::{ForecastError, TrendForecaster};
use dengue_ews_region::RegionError;
use dengue_ews_server_models::ApiError;
use dengue_ews_surveillance::{SeriesCache, SeriesGenerator, SeriesTable, SurveillanceError};
use dengue_ews_surveillance_models::GenerationParams;
use thiserror::Error;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Unknown region.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Series generation failed.
    #[error(transparent)]
    Surveillance(#[from] SurveillanceError),

    /// Forecasting failed.
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// An aggregate could not be computed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// A query parameter is out of range.
    #[error("Invalid query: {message}")]
    InvalidQuery {
        /// Description of what went wrong.
        message: String,
    },
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Surveillance(SurveillanceError::InvalidProfile { .. })
            | Self::Forecast(ForecastError::InvalidConfig { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {self}");
        } else {
            log::debug!("Rejected request: {self}");
        }
        HttpResponse::build(status).json(ApiError {
            error: self.to_string(),
        })
    }
}

/// Server settings resolved from the environment or CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Seed for series generation; `None` draws fresh entropy per cache
    /// fill.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT` and `DENGUE_EWS_SEED`, falling back to
    /// defaults for unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let seed = std::env::var("DENGUE_EWS_SEED").ok().and_then(|s| {
            s.trim()
                .parse()
                .inspect_err(|e| log::warn!("Ignoring DENGUE_EWS_SEED={s:?}: {e}"))
                .ok()
        });

        Self {
            bind_addr,
            port,
            seed,
        }
    }
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Memoized generated tables.
    pub cache: Arc<SeriesCache>,
    /// Series generator.
    pub generator: SeriesGenerator,
    /// Trend forecaster.
    pub forecaster: TrendForecaster,
    /// Parameters of the table every endpoint reads.
    pub params: GenerationParams,
    /// Risk banner thresholds.
    pub thresholds: RiskThresholds,
}

impl AppState {
    /// Creates state over all regions and the default date range.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            cache: Arc::new(SeriesCache::new()),
            generator: SeriesGenerator::default(),
            forecaster: TrendForecaster::default(),
            params: GenerationParams::default().with_seed(seed),
            thresholds: RiskThresholds::default(),
        }
    }

    /// Returns the current table, generating it on first use.
    ///
    /// # Errors
    ///
    /// Propagates generation failures.
    pub fn series(&self) -> Result<SeriesTable, ServerError> {
        Ok(self.cache.get_or_generate(&self.params, &self.generator)?)
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/regions", web::get().to(handlers::regions))
            .route("/observations", web::get().to(handlers::observations))
            .route("/forecast", web::get().to(handlers::forecast))
            .route("/metrics", web::get().to(handlers::metrics))
            .route("/summary", web::get().to(handlers::summary))
            .route("/comparison", web::get().to(handlers::comparison))
            .route("/heatmap", web::get().to(handlers::heatmap))
            .route("/correlation", web::get().to(handlers::correlation))
            .route("/refresh", web::post().to(handlers::refresh)),
    );
}

/// Starts the dengue early-warning API server.
///
/// This is a regular async function; the caller provides the async runtime
/// (e.g. via `#[actix_web::main]`) and initialises logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(config.seed));

    match config.seed {
        Some(seed) => log::info!("Serving series generated with seed {seed}"),
        None => log::info!("Serving unseeded series (fixed until refresh)"),
    }
    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
