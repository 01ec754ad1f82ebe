#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line interface for the dengue early-warning toolchain.
//!
//! Generates synthetic surveillance tables, forecasts, canned metrics and
//! dashboard aggregates as CSV or JSON on stdout, and can start the API
//! server.

mod output;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use dengue_ews_analytics::{
    compare_regions, filter_region, lagged_correlation, seasonal_heatmap, summarize,
    syndromic_summary,
};
use dengue_ews_analytics_models::{RiskThresholds, YearRange};
use dengue_ews_forecast::TrendForecaster;
use dengue_ews_region::{metrics, parse_region};
use dengue_ews_region_models::Region;
use dengue_ews_server::{ServerConfig, run_server};
use dengue_ews_surveillance::SeriesGenerator;
use dengue_ews_surveillance_models::{
    Covariate, DEFAULT_END_DATE, DEFAULT_START_DATE, GenerationParams, ObservationRecord,
};

use crate::output::{MetricsRow, OutputFormat, SummaryRow, write_rows};

/// Dengue early-warning toolchain.
#[derive(Parser)]
#[command(name = "dengue_ews")]
#[command(about = "Synthetic dengue surveillance, forecasting and dashboard analytics")]
struct Cli {
    /// Output table format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv, global = true)]
    format: OutputFormat,

    /// Seed for series generation and forecast noise (fresh entropy if
    /// omitted).
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate weekly surveillance rows.
    Generate {
        /// Region to include (repeatable; default: all).
        #[arg(long = "region", value_parser = parse_region)]
        regions: Vec<Region>,

        /// First week (rolled forward to a Monday).
        #[arg(long, default_value_t = DEFAULT_START_DATE)]
        start: NaiveDate,

        /// Last day (inclusive).
        #[arg(long, default_value_t = DEFAULT_END_DATE)]
        end: NaiveDate,
    },

    /// Forecast weeks past the end of a region's series.
    Forecast {
        /// Region to forecast.
        #[arg(long, value_parser = parse_region)]
        region: Region,

        /// Weeks ahead.
        #[arg(long, default_value_t = 4)]
        horizon: usize,
    },

    /// Print canned validation metrics.
    Metrics {
        /// Region to show (default: all).
        #[arg(long, value_parser = parse_region)]
        region: Option<Region>,
    },

    /// Summarize a region with its risk alert.
    Summary {
        /// Region to summarize.
        #[arg(long, value_parser = parse_region)]
        region: Region,

        /// First year to include.
        #[arg(long)]
        year_from: Option<i32>,

        /// Last year to include.
        #[arg(long)]
        year_to: Option<i32>,

        /// Weeks ahead used for the forecast change.
        #[arg(long, default_value_t = 4)]
        horizon: usize,
    },

    /// Compare all regions' totals for one year.
    Compare {
        /// Year to compare (default: latest in the series).
        #[arg(long)]
        year: Option<i32>,
    },

    /// Region × month case totals for one year.
    Heatmap {
        /// Year to aggregate (default: latest in the series).
        #[arg(long)]
        year: Option<i32>,
    },

    /// Latest-week comparator disease counts for a region.
    Syndromic {
        /// Region to report.
        #[arg(long, value_parser = parse_region)]
        region: Region,
    },

    /// Correlate a region's cases with lagged climate covariates.
    Correlate {
        /// Region to correlate.
        #[arg(long, value_parser = parse_region)]
        region: Region,

        /// Largest lag in weeks.
        #[arg(long, default_value_t = 8)]
        max_lag: usize,
    },

    /// Start the API server.
    Serve {
        /// Interface to bind (default: `BIND_ADDR` or 127.0.0.1).
        #[arg(long)]
        bind_addr: Option<String>,

        /// Port to bind (default: `PORT` or 8080).
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Generate {
            regions,
            start,
            end,
        } => {
            let regions = if regions.is_empty() {
                Region::all().to_vec()
            } else {
                regions
            };
            let rows = generate(GenerationParams::new(regions, start, end, cli.seed))?;
            write_rows(stdout, cli.format, &rows)?;
        }
        Commands::Forecast { region, horizon } => {
            let history = generate(region_params(region, cli.seed))?;
            let points = TrendForecaster::default().forecast(&history, horizon, cli.seed)?;
            write_rows(stdout, cli.format, &points)?;
        }
        Commands::Metrics { region } => {
            let rows: Vec<MetricsRow> = region
                .map_or_else(|| Region::all().to_vec(), |r| vec![r])
                .into_iter()
                .map(|r| MetricsRow::new(r, metrics(r)))
                .collect();
            write_rows(stdout, cli.format, &rows)?;
        }
        Commands::Summary {
            region,
            year_from,
            year_to,
            horizon,
        } => {
            let all = YearRange::all();
            let years = YearRange::new(year_from.unwrap_or(all.from), year_to.unwrap_or(all.to));
            let series = generate(region_params(region, cli.seed))?;
            let rows = filter_region(&series, region, years)?;
            let forecast = TrendForecaster::default().forecast(&rows, horizon, cli.seed)?;
            let summary = summarize(
                &rows,
                forecast.first().map(|p| p.predicted_mean),
                &RiskThresholds::default(),
            )?;
            log::info!("{region}: {}", summary.alert.title);
            write_rows(stdout, cli.format, &[SummaryRow::from(summary)])?;
        }
        Commands::Compare { year } => {
            let series = generate(GenerationParams::default().with_seed(cli.seed))?;
            let year = resolve_year(&series, year);
            write_rows(stdout, cli.format, &compare_regions(&series, year))?;
        }
        Commands::Heatmap { year } => {
            let series = generate(GenerationParams::default().with_seed(cli.seed))?;
            let year = resolve_year(&series, year);
            write_rows(stdout, cli.format, &seasonal_heatmap(&series, year))?;
        }
        Commands::Syndromic { region } => {
            let series = generate(region_params(region, cli.seed))?;
            write_rows(stdout, cli.format, &syndromic_summary(&series)?)?;
        }
        Commands::Correlate { region, max_lag } => {
            let series = generate(region_params(region, cli.seed))?;
            let rows: Vec<_> = Covariate::all()
                .iter()
                .flat_map(|&covariate| lagged_correlation(&series, covariate, max_lag))
                .collect();
            write_rows(stdout, cli.format, &rows)?;
        }
        Commands::Serve { bind_addr, port } => {
            drop(stdout);
            let mut config = ServerConfig::from_env();
            if let Some(bind_addr) = bind_addr {
                config.bind_addr = bind_addr;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if cli.seed.is_some() {
                config.seed = cli.seed;
            }
            actix_rt::System::new().block_on(run_server(config))?;
        }
    }

    Ok(())
}

fn resolve_year(series: &[ObservationRecord], requested: Option<i32>) -> i32 {
    requested
        .or_else(|| series.iter().map(ObservationRecord::year).max())
        .unwrap_or_else(|| DEFAULT_END_DATE.year())
}

fn region_params(region: Region, seed: Option<u64>) -> GenerationParams {
    GenerationParams::new(vec![region], DEFAULT_START_DATE, DEFAULT_END_DATE, seed)
}

fn generate(params: GenerationParams) -> Result<Vec<ObservationRecord>, Box<dyn std::error::Error>> {
    log::debug!(
        "Generating {} region(s) from {} to {}",
        params.regions.len(),
        params.start_date,
        params.end_date
    );
    Ok(SeriesGenerator::default().generate(&params)?)
}
