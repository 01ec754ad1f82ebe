//! Linear trend extrapolation with a seasonal multiplier.

use std::f64::consts::{FRAC_PI_2, TAU};

use chrono::{Datelike, Days};
use dengue_ews_forecast_models::ForecastPoint;
use dengue_ews_surveillance_models::ObservationRecord;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::ForecastError;

/// Tunables for [`TrendForecaster`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// Number of most recent weeks used for the trend fit.
    pub window: usize,
    /// Fewest weeks of history accepted.
    pub min_history: usize,
    /// Amplitude of the seasonal multiplier (`0.08` means ±8%).
    pub seasonal_strength: f64,
    /// Standard deviation of the per-point noise.
    pub noise_sd: f64,
    /// Band half-width at the first step, before scaling by `band_z`.
    pub band_base: f64,
    /// Half-width added per further step, before scaling by `band_z`.
    pub band_step: f64,
    /// Multiplier applied to the half-width (1.96 ≈ 95%).
    pub band_z: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: 12,
            min_history: 8,
            seasonal_strength: 0.08,
            noise_sd: 3.0,
            band_base: 12.0,
            band_step: 4.0,
            band_z: 1.96,
        }
    }
}

impl ForecastConfig {
    fn validate(&self) -> Result<(), ForecastError> {
        let message = if self.window == 0 {
            "window must be at least 1"
        } else if !(self.band_base >= 0.0 && self.band_step >= 0.0 && self.band_z > 0.0) {
            "band parameters must be non-negative with a positive z"
        } else if !(self.noise_sd >= 0.0 && self.noise_sd.is_finite()) {
            "noise_sd must be finite and non-negative"
        } else {
            return Ok(());
        };
        Err(ForecastError::InvalidConfig {
            message: message.to_string(),
        })
    }
}

/// Slope and intercept of an ordinary-least-squares line over `0..n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Change per week.
    pub slope: f64,
    /// Value at index 0.
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluates the line at index `x`.
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Fits `y = slope·x + intercept` against `x = 0..values.len()`.
///
/// A single value yields a flat line through it; an empty slice yields the
/// zero line.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_linear(values: &[f64]) -> LinearFit {
    let n = values.len();
    if n == 0 {
        return LinearFit {
            slope: 0.0,
            intercept: 0.0,
        };
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let (sxy, sxx) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
            let dx = i as f64 - x_mean;
            (dx.mul_add(y - y_mean, sxy), dx.mul_add(dx, sxx))
        });

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    LinearFit {
        slope,
        intercept: slope.mul_add(-x_mean, y_mean),
    }
}

/// Extrapolates the recent case trend of a single region.
#[derive(Debug, Clone, Default)]
pub struct TrendForecaster {
    config: ForecastConfig,
}

impl TrendForecaster {
    /// Creates a forecaster with the given configuration.
    #[must_use]
    pub const fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Returns the forecaster configuration.
    #[must_use]
    pub const fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecasts `horizon` weeks past the end of `history`.
    ///
    /// `history` must hold one region's rows in ascending week order. The
    /// first returned point starts 7 days after the last historical week.
    /// With `seed` set, the noise term is reproducible; otherwise fresh
    /// entropy is used.
    ///
    /// # Errors
    ///
    /// * [`ForecastError::InvalidHorizon`] if `horizon == 0`
    /// * [`ForecastError::InsufficientHistory`] if `history` is shorter than
    ///   the configured minimum
    /// * [`ForecastError::MixedRegions`] or [`ForecastError::UnorderedHistory`]
    ///   if `history` is not a single ordered region series
    /// * [`ForecastError::InvalidConfig`] if the band or noise settings are
    ///   unusable
    #[allow(clippy::cast_precision_loss)]
    pub fn forecast(
        &self,
        history: &[ObservationRecord],
        horizon: usize,
        seed: Option<u64>,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        self.config.validate()?;
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon);
        }
        let required = self.config.min_history.max(1);
        let Some(last) = history.last().filter(|_| history.len() >= required) else {
            return Err(ForecastError::InsufficientHistory {
                required,
                available: history.len(),
            });
        };
        validate_history(history)?;

        let k = self.config.window.min(history.len());
        let recent: Vec<f64> = history[history.len() - k..]
            .iter()
            .map(|r| f64::from(r.case_count))
            .collect();
        let fit = fit_linear(&recent);

        log::debug!(
            "Forecasting {horizon} weeks for {} from {k} weeks (slope {:.3}, intercept {:.3})",
            last.region,
            fit.slope,
            fit.intercept
        );

        let noise = Normal::new(0.0, self.config.noise_sd).map_err(|e| {
            ForecastError::InvalidConfig {
                message: e.to_string(),
            }
        })?;
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        (1..=horizon)
            .map(|step| {
                let week_start = last
                    .week_start
                    .checked_add_days(Days::new(7 * step as u64))
                    .ok_or(ForecastError::DateOverflow {
                        last: last.week_start,
                    })?;

                let base = fit.at((k + step - 1) as f64);
                let annual = TAU * f64::from(week_start.iso_week().week()) / 52.0 - FRAC_PI_2;
                let seasonal = self.config.seasonal_strength.mul_add(annual.sin(), 1.0);
                let mean = round1(base.mul_add(seasonal, noise.sample(&mut rng)).max(0.0));

                let half_width = self
                    .config
                    .band_step
                    .mul_add((step - 1) as f64, self.config.band_base)
                    * self.config.band_z;

                Ok(ForecastPoint {
                    week_start,
                    predicted_mean: mean,
                    predicted_lower: round1((mean - half_width).max(0.0)),
                    predicted_upper: round1(mean + half_width),
                })
            })
            .collect()
    }
}

/// Ensures `history` is one region in strictly increasing week order.
fn validate_history(history: &[ObservationRecord]) -> Result<(), ForecastError> {
    let first = history[0].region;
    if let Some(other) = history.iter().map(|r| r.region).find(|r| *r != first) {
        return Err(ForecastError::MixedRegions { first, other });
    }
    if let Some(pair) = history
        .windows(2)
        .find(|pair| pair[1].week_start <= pair[0].week_start)
    {
        return Err(ForecastError::UnorderedHistory {
            previous: pair[0].week_start,
            next: pair[1].week_start,
        });
    }
    Ok(())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
