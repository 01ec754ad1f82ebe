//! Lagged correlation between cases and climate covariates.

use dengue_ews_analytics_models::LagCorrelation;
use dengue_ews_surveillance_models::{Covariate, ObservationRecord};

/// Pearson correlation of two equal-length samples.
///
/// Returns `None` for fewer than two pairs, mismatched lengths, or when
/// either sample has zero variance.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let (mut cov, mut x_var, mut y_var) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        cov += dx * dy;
        x_var += dx * dx;
        y_var += dy * dy;
    }

    if x_var <= f64::EPSILON || y_var <= f64::EPSILON {
        return None;
    }
    Some((cov / (x_var.sqrt() * y_var.sqrt())).clamp(-1.0, 1.0))
}

/// Correlates each week's cases with `covariate` observed `lag` weeks
/// earlier, for every lag in `0..=max_lag`.
///
/// `records` must be one region's ordered series.
#[must_use]
pub fn lagged_correlation(
    records: &[ObservationRecord],
    covariate: Covariate,
    max_lag: usize,
) -> Vec<LagCorrelation> {
    let cases: Vec<f64> = records.iter().map(|r| f64::from(r.case_count)).collect();
    let values: Vec<f64> = records.iter().map(|r| r.covariate(covariate)).collect();

    (0..=max_lag)
        .map(|lag| {
            let correlation = if lag < cases.len() {
                pearson(&cases[lag..], &values[..values.len() - lag])
            } else {
                None
            };
            LagCorrelation {
                covariate,
                lag,
                correlation,
            }
        })
        .collect()
}
