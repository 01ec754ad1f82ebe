//! Table output for CLI subcommands.

use std::io::Write;

use chrono::NaiveDate;
use clap::ValueEnum;
use dengue_ews_analytics_models::{RegionSummary, RiskLevel};
use dengue_ews_region_models::{Region, ValidationMetrics};
use serde::Serialize;

/// Table encoding written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// A pretty-printed JSON array.
    Json,
}

/// Writes `rows` to `out` in the requested format.
///
/// # Errors
///
/// Returns an error if a row cannot be serialized or the writer fails.
pub fn write_rows<T: Serialize>(
    out: impl Write,
    format: OutputFormat,
    rows: &[T],
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let mut out = out;
            serde_json::to_writer_pretty(&mut out, rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// One region's canned metrics as a flat row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRow {
    pub region: Region,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    pub median_ae: f64,
    pub mape: f64,
    pub correlation: f64,
    pub crps: Option<f64>,
}

impl MetricsRow {
    #[must_use]
    pub const fn new(region: Region, metrics: ValidationMetrics) -> Self {
        Self {
            region,
            mae: metrics.mae,
            rmse: metrics.rmse,
            r2: metrics.r2,
            median_ae: metrics.median_ae,
            mape: metrics.mape,
            correlation: metrics.correlation,
            crps: metrics.crps,
        }
    }
}

/// A [`RegionSummary`] with the alert flattened into columns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub region: Region,
    pub latest_week: NaiveDate,
    pub current_cases: u32,
    pub previous_cases: Option<u32>,
    pub week_change: i64,
    pub week_change_pct: f64,
    pub avg_4_week: f64,
    pub prev_avg_4_week: Option<f64>,
    pub historical_avg: f64,
    pub latest_year: i32,
    pub peak_latest_year: u32,
    pub total_latest_year: u64,
    pub total_previous_year: Option<u64>,
    pub year_change_pct: Option<f64>,
    pub next_week_forecast: Option<f64>,
    pub forecast_change: Option<f64>,
    pub forecast_change_pct: Option<f64>,
    pub risk_level: RiskLevel,
    pub risk_title: String,
}

impl From<RegionSummary> for SummaryRow {
    fn from(summary: RegionSummary) -> Self {
        Self {
            region: summary.region,
            latest_week: summary.latest_week,
            current_cases: summary.current_cases,
            previous_cases: summary.previous_cases,
            week_change: summary.week_change,
            week_change_pct: summary.week_change_pct,
            avg_4_week: summary.avg_4_week,
            prev_avg_4_week: summary.prev_avg_4_week,
            historical_avg: summary.historical_avg,
            latest_year: summary.latest_year,
            peak_latest_year: summary.peak_latest_year,
            total_latest_year: summary.total_latest_year,
            total_previous_year: summary.total_previous_year,
            year_change_pct: summary.year_change_pct,
            next_week_forecast: summary.next_week_forecast,
            forecast_change: summary.forecast_change,
            forecast_change_pct: summary.forecast_change_pct,
            risk_level: summary.alert.level,
            risk_title: summary.alert.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ValidationMetrics {
        ValidationMetrics {
            mae: 1.5,
            rmse: 2.0,
            r2: 0.5,
            median_ae: 1.0,
            mape: 10.0,
            correlation: 0.9,
            crps: None,
        }
    }

    #[test]
    fn csv_has_header_and_empty_optional() {
        let mut buf = Vec::new();
        write_rows(
            &mut buf,
            OutputFormat::Csv,
            &[MetricsRow::new(Region::Phuket, metrics())],
        )
        .unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("region,mae,rmse,r2,medianAe,mape,correlation,crps")
        );
        assert_eq!(lines.next(), Some("phuket,1.5,2.0,0.5,1.0,10.0,0.9,"));
    }

    #[test]
    fn json_is_an_array() {
        let mut buf = Vec::new();
        write_rows(
            &mut buf,
            OutputFormat::Json,
            &[MetricsRow::new(Region::Bangkok, metrics())],
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["region"], "bangkok");
        assert_eq!(value[0]["medianAe"], 1.0);
    }

    #[test]
    fn csv_writes_heatmap_and_syndromic_rows() {
        use dengue_ews_analytics_models::{ControlSignalChange, HeatmapCell};
        use dengue_ews_surveillance_models::ControlSignal;

        let mut buf = Vec::new();
        let cell = HeatmapCell {
            region: Region::Songkhla,
            year: 2023,
            month: 11,
            total_cases: 412,
        };
        write_rows(&mut buf, OutputFormat::Csv, &[cell]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "region,year,month,totalCases\nsongkhla,2023,11,412\n"
        );

        let mut buf = Vec::new();
        let change = ControlSignalChange {
            region: Region::Bangkok,
            week_start: NaiveDate::from_ymd_opt(2024, 11, 11).unwrap(),
            signal: ControlSignal::B,
            current: 12,
            previous: None,
            change: 0,
            change_pct: 0.0,
        };
        write_rows(&mut buf, OutputFormat::Csv, &[change]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("region,weekStart,signal,current,previous,change,changePct")
        );
        assert_eq!(
            lines.next(),
            Some("bangkok,2024-11-11,control_signal_b,12,,0,0.0")
        );
    }
}
