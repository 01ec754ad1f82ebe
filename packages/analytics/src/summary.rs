//! Headline summary, risk banner, climate snapshot and syndromic context
//! for one region.

use dengue_ews_analytics_models::{
    ClimateSummary, ControlSignalChange, RegionSummary, RiskAlert, RiskLevel, RiskThresholds,
};
use dengue_ews_surveillance_models::{ControlSignal, ObservationRecord};

use crate::{AnalyticsError, mean};

const RECENT_WEEKS: usize = 4;

/// Classifies the risk banner for a region.
///
/// `Elevated` wins over `Rising` when both apply.
#[must_use]
pub fn risk_alert(
    current: f64,
    forecast_mean: f64,
    historical_avg: f64,
    thresholds: &RiskThresholds,
) -> RiskAlert {
    let elevated_at = historical_avg * thresholds.elevated_ratio;

    let level = if current > elevated_at || forecast_mean > elevated_at {
        RiskLevel::Elevated
    } else if forecast_mean > current * thresholds.rising_ratio {
        RiskLevel::Rising
    } else {
        RiskLevel::Stable
    };

    RiskAlert::from(level)
}

/// Computes the summary cards for one region's ordered series.
///
/// `next_forecast` is the predicted mean for the week after the series;
/// without it the forecast-derived fields are `None` and the risk banner
/// treats the forecast as equal to the current week.
///
/// # Errors
///
/// * [`AnalyticsError::NoObservations`] if `records` is empty
#[allow(clippy::cast_precision_loss)]
pub fn summarize(
    records: &[ObservationRecord],
    next_forecast: Option<f64>,
    thresholds: &RiskThresholds,
) -> Result<RegionSummary, AnalyticsError> {
    let Some(latest) = records.last() else {
        return Err(AnalyticsError::NoObservations);
    };
    let n = records.len();

    let current_cases = latest.case_count;
    let previous_cases = n.checked_sub(2).map(|i| records[i].case_count);
    let (week_change, week_change_pct) = weekly_change(current_cases, previous_cases);

    let recent_start = n.saturating_sub(RECENT_WEEKS);
    let avg_4_week = cases_mean(&records[recent_start..]).unwrap_or(0.0);
    let prev_avg_4_week = cases_mean(&records[recent_start.saturating_sub(RECENT_WEEKS)..recent_start]);
    let historical_avg = cases_mean(records).unwrap_or(0.0);

    let latest_year = latest.year();
    let in_year = |year: i32| records.iter().filter(move |r| r.year() == year);
    let peak_latest_year = in_year(latest_year).map(|r| r.case_count).max().unwrap_or(0);
    let total_latest_year: u64 = in_year(latest_year).map(|r| u64::from(r.case_count)).sum();
    let total_previous_year = {
        let mut rows = in_year(latest_year - 1).peekable();
        rows.peek()
            .is_some()
            .then(|| rows.map(|r| u64::from(r.case_count)).sum::<u64>())
    };
    let year_change_pct = total_previous_year
        .filter(|&total| total > 0)
        .map(|total| (total_latest_year as f64 - total as f64) / total as f64 * 100.0);

    let current = f64::from(current_cases);
    let forecast_change = next_forecast.map(|f| f - current);
    let forecast_change_pct = forecast_change.map(|delta| {
        if current_cases > 0 {
            delta / current * 100.0
        } else {
            0.0
        }
    });

    let alert = risk_alert(
        current,
        next_forecast.unwrap_or(current),
        historical_avg,
        thresholds,
    );

    log::debug!(
        "Summary for {}: current={current_cases} hist_avg={historical_avg:.1} alert={}",
        latest.region,
        alert.level
    );

    Ok(RegionSummary {
        region: latest.region,
        latest_week: latest.week_start,
        current_cases,
        previous_cases,
        week_change,
        week_change_pct,
        avg_4_week,
        prev_avg_4_week,
        historical_avg,
        latest_year,
        peak_latest_year,
        total_latest_year,
        total_previous_year,
        year_change_pct,
        next_week_forecast: next_forecast,
        forecast_change,
        forecast_change_pct,
        alert,
    })
}

/// Latest climate readings against their means over `records`.
///
/// # Errors
///
/// * [`AnalyticsError::NoObservations`] if `records` is empty
pub fn climate_summary(records: &[ObservationRecord]) -> Result<ClimateSummary, AnalyticsError> {
    let Some(latest) = records.last() else {
        return Err(AnalyticsError::NoObservations);
    };
    let avg = |f: fn(&ObservationRecord) -> f64| mean(records.iter().map(f)).unwrap_or(0.0);

    Ok(ClimateSummary {
        current_temperature: latest.temperature_mean,
        mean_temperature: avg(|r| r.temperature_mean),
        current_humidity: latest.humidity_pct,
        mean_humidity: avg(|r| r.humidity_pct),
        current_rainfall: latest.rainfall_mm,
        mean_rainfall: avg(|r| r.rainfall_mm),
        recent_rainfall_total: records[records.len().saturating_sub(RECENT_WEEKS)..]
            .iter()
            .map(|r| r.rainfall_mm)
            .sum(),
    })
}

/// This week's comparator disease counts against the week before, one
/// entry per [`ControlSignal`].
///
/// # Errors
///
/// * [`AnalyticsError::NoObservations`] if `records` is empty
pub fn syndromic_summary(
    records: &[ObservationRecord],
) -> Result<Vec<ControlSignalChange>, AnalyticsError> {
    let Some(latest) = records.last() else {
        return Err(AnalyticsError::NoObservations);
    };
    let previous = records.len().checked_sub(2).map(|i| &records[i]);

    Ok(ControlSignal::all()
        .iter()
        .map(|&signal| {
            let current = latest.control_signal(signal);
            let previous = previous.map(|r| r.control_signal(signal));
            let (change, change_pct) = weekly_change(current, previous);
            ControlSignalChange {
                region: latest.region,
                week_start: latest.week_start,
                signal,
                current,
                previous,
                change,
                change_pct,
            }
        })
        .collect())
}

/// Change and percent change from `previous`; both 0 without a previous
/// week, percent 0 when it was 0.
#[allow(clippy::cast_precision_loss)]
fn weekly_change(current: u32, previous: Option<u32>) -> (i64, f64) {
    let change = i64::from(current) - i64::from(previous.unwrap_or(current));
    let pct = match previous {
        Some(prev) if prev > 0 => change as f64 / f64::from(prev) * 100.0,
        _ => 0.0,
    };
    (change, pct)
}

fn cases_mean(records: &[ObservationRecord]) -> Option<f64> {
    mean(records.iter().map(|r| f64::from(r.case_count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{monday, rows};
    use dengue_ews_region_models::Region;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn elevated_when_current_above_historical() {
        let alert = risk_alert(160.0, 100.0, 100.0, &RiskThresholds::default());
        assert_eq!(alert.level, RiskLevel::Elevated);
    }

    #[test]
    fn elevated_when_forecast_above_historical() {
        let alert = risk_alert(100.0, 151.0, 100.0, &RiskThresholds::default());
        assert_eq!(alert.level, RiskLevel::Elevated);
    }

    #[test]
    fn rising_when_forecast_above_current() {
        let alert = risk_alert(50.0, 61.0, 100.0, &RiskThresholds::default());
        assert_eq!(alert.level, RiskLevel::Rising);
        assert_eq!(alert.title, "Increasing Trend");
    }

    #[test]
    fn stable_otherwise() {
        let alert = risk_alert(50.0, 55.0, 100.0, &RiskThresholds::default());
        assert_eq!(alert.level, RiskLevel::Stable);
    }

    #[test]
    fn conservative_thresholds_need_larger_ratios() {
        let thresholds = RiskThresholds::conservative();
        assert_eq!(
            risk_alert(155.0, 100.0, 100.0, &thresholds).level,
            RiskLevel::Stable
        );
        assert_eq!(
            risk_alert(100.0, 124.0, 100.0, &thresholds).level,
            RiskLevel::Stable
        );
    }

    #[test]
    fn summary_of_short_series() {
        let records = rows(Region::Bangkok, monday(2023, 1, 2), &[10, 20, 30, 40, 50, 60]);
        let summary = summarize(&records, Some(66.0), &RiskThresholds::default()).unwrap();

        assert_eq!(summary.current_cases, 60);
        assert_eq!(summary.previous_cases, Some(50));
        assert_eq!(summary.week_change, 10);
        assert!(close(summary.week_change_pct, 20.0));
        assert!(close(summary.avg_4_week, 45.0));
        assert!(close(summary.prev_avg_4_week.unwrap(), 15.0));
        assert!(close(summary.historical_avg, 35.0));
        assert_eq!(summary.latest_year, 2023);
        assert_eq!(summary.peak_latest_year, 60);
        assert_eq!(summary.total_latest_year, 210);
        assert_eq!(summary.total_previous_year, None);
        assert_eq!(summary.year_change_pct, None);
        assert!(close(summary.forecast_change.unwrap(), 6.0));
        assert!(close(summary.forecast_change_pct.unwrap(), 10.0));
        assert_eq!(summary.alert.level, RiskLevel::Elevated);
    }

    #[test]
    fn summary_zero_previous_week_gives_zero_percent() {
        let records = rows(Region::Phuket, monday(2023, 1, 2), &[0, 5]);
        let summary = summarize(&records, None, &RiskThresholds::default()).unwrap();
        assert_eq!(summary.week_change, 5);
        assert!(close(summary.week_change_pct, 0.0));
        assert_eq!(summary.forecast_change, None);
    }

    #[test]
    fn summary_single_week() {
        let records = rows(Region::Phuket, monday(2023, 1, 2), &[7]);
        let summary = summarize(&records, None, &RiskThresholds::default()).unwrap();
        assert_eq!(summary.previous_cases, None);
        assert_eq!(summary.week_change, 0);
        assert_eq!(summary.prev_avg_4_week, None);
        assert_eq!(summary.alert.level, RiskLevel::Stable);
    }

    #[test]
    fn summary_year_over_year() {
        let records = rows(Region::KhonKaen, monday(2022, 12, 19), &[10, 30, 20, 40]);
        let summary = summarize(&records, None, &RiskThresholds::default()).unwrap();
        assert_eq!(summary.total_previous_year, Some(40));
        assert_eq!(summary.total_latest_year, 60);
        assert!(close(summary.year_change_pct.unwrap(), 50.0));
        assert_eq!(summary.peak_latest_year, 40);
    }

    #[test]
    fn summary_of_empty_series_fails() {
        assert!(matches!(
            summarize(&[], None, &RiskThresholds::default()),
            Err(AnalyticsError::NoObservations)
        ));
    }

    #[test]
    fn syndromic_reports_each_signal() {
        let mut records = rows(Region::ChiangMai, monday(2023, 1, 2), &[1, 1, 1]);
        records[1].control_signal_a = 8;
        records[1].control_signal_b = 0;
        records[2].control_signal_a = 6;
        records[2].control_signal_b = 4;

        let changes = syndromic_summary(&records).unwrap();
        assert_eq!(
            changes.iter().map(|c| c.signal).collect::<Vec<_>>(),
            vec![ControlSignal::A, ControlSignal::B]
        );

        let a = &changes[0];
        assert_eq!(a.region, Region::ChiangMai);
        assert_eq!(a.week_start, monday(2023, 1, 16));
        assert_eq!((a.current, a.previous, a.change), (6, Some(8), -2));
        assert!(close(a.change_pct, -25.0));

        let b = &changes[1];
        assert_eq!((b.current, b.previous, b.change), (4, Some(0), 4));
        assert!(close(b.change_pct, 0.0));
    }

    #[test]
    fn syndromic_single_week_has_no_change() {
        let records = rows(Region::Phuket, monday(2023, 1, 2), &[3]);
        let changes = syndromic_summary(&records).unwrap();
        assert!(changes.iter().all(|c| c.previous.is_none() && c.change == 0));
        assert!(matches!(
            syndromic_summary(&[]),
            Err(AnalyticsError::NoObservations)
        ));
    }

    #[test]
    fn climate_summary_uses_last_four_weeks_of_rain() {
        let mut records = rows(Region::Songkhla, monday(2023, 1, 2), &[1, 1, 1, 1, 1]);
        for (i, r) in records.iter_mut().enumerate() {
            r.rainfall_mm = 10.0 * (i as f64 + 1.0);
            r.temperature_mean = 26.0 + i as f64;
        }

        let climate = climate_summary(&records).unwrap();
        assert!(close(climate.current_rainfall, 50.0));
        assert!(close(climate.mean_rainfall, 30.0));
        assert!(close(climate.recent_rainfall_total, 140.0));
        assert!(close(climate.current_temperature, 30.0));
        assert!(close(climate.mean_temperature, 28.0));
        assert!(close(climate.current_humidity, climate.mean_humidity));
    }
}
