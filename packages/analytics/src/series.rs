//! Rolling means and week-over-week differences.

use dengue_ews_analytics_models::TrendRow;
use dengue_ews_surveillance_models::ObservationRecord;

use crate::mean;

/// Centred rolling mean.
///
/// Position `i` averages the `window` values ending at
/// `i + (window - 1) / 2`, so even windows lean one step towards the past.
/// Positions without a full window are `None`, as is every position when
/// `window` is zero.
#[must_use]
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let offset = (window - 1) / 2;

    (0..values.len())
        .map(|i| {
            let end = i + offset + 1;
            let start = end.checked_sub(window)?;
            values
                .get(start..end)
                .and_then(|slice| mean(slice.iter().copied()))
        })
        .collect()
}

/// First differences; the first position is `None`.
#[must_use]
pub fn week_over_week(values: &[u32]) -> Vec<Option<i64>> {
    std::iter::once(None)
        .chain(
            values
                .windows(2)
                .map(|w| Some(i64::from(w[1]) - i64::from(w[0]))),
        )
        .take(values.len())
        .collect()
}

/// Per-week trend table for one region's ordered series, keeping only the
/// last `recent` rows.
///
/// Rolling means and differences are computed over the whole series before
/// truncation, so the first kept row still has its context.
#[must_use]
pub fn trend_rows(records: &[ObservationRecord], recent: usize) -> Vec<TrendRow> {
    let cases: Vec<u32> = records.iter().map(|r| r.case_count).collect();
    let as_f64: Vec<f64> = cases.iter().copied().map(f64::from).collect();
    let rolling_4 = rolling_mean(&as_f64, 4);
    let rolling_8 = rolling_mean(&as_f64, 8);
    let changes = week_over_week(&cases);

    let skip = records.len().saturating_sub(recent);
    records
        .iter()
        .zip(rolling_4)
        .zip(rolling_8)
        .zip(changes)
        .skip(skip)
        .map(|(((record, rolling_4), rolling_8), week_change)| TrendRow {
            week_start: record.week_start,
            case_count: record.case_count,
            rolling_4,
            rolling_8,
            week_change,
        })
        .collect()
}
