//! Synthetic series generation.
//!
//! For week index `t` (0-based) with annual position `w = t mod 52` the
//! case signal is
//!
//! ```text
//! seasonal = baseline + amplitude·sin(2πw/52 − π/2) + harmonic·sin(4πw/52)
//! trend    = total_trend · t / (n − 1)
//! noise    ~ Normal(0, baseline · volatility)
//! cases    = max(0, round((seasonal + trend + noise + bump) · factor))
//! ```
//!
//! where `bump`/`factor` come from the configured [`OutbreakModel`]. Climate
//! covariates and comparator diseases follow their own seasonal cycles with
//! independent noise.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, TAU};

use chrono::{Datelike, Days, NaiveDate};
use dengue_ews_region_models::{Region, RegionProfile};
use dengue_ews_surveillance_models::{GenerationParams, ObservationRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Normal};

use crate::SurveillanceError;

/// Weeks in one seasonal cycle.
const WEEKS_PER_YEAR: usize = 52;

/// Odd multiplier used to spread region ordinals across the seed space.
const REGION_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

const TEMPERATURE_MEAN: f64 = 27.0;
const TEMPERATURE_AMPLITUDE: f64 = 3.0;
const TEMPERATURE_SD: f64 = 1.2;

const HUMIDITY_MEAN: f64 = 70.0;
const HUMIDITY_AMPLITUDE: f64 = 12.0;
const HUMIDITY_SD: f64 = 4.0;

const RAINFALL_MEAN: f64 = 60.0;
const RAINFALL_AMPLITUDE: f64 = 90.0;
const RAINFALL_GAMMA_SHAPE: f64 = 2.0;
const RAINFALL_GAMMA_SCALE: f64 = 15.0;

const CONTROL_A_FRACTION: f64 = 0.12;
const CONTROL_A_SD: f64 = 4.0;
const CONTROL_B_FRACTION: f64 = 0.30;
const CONTROL_B_AMPLITUDE: f64 = 20.0;
const CONTROL_B_SD: f64 = 7.0;

/// How outbreak epicenters perturb the case signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutbreakModel {
    /// Each epicenter multiplies the weeks within `radius` by a factor drawn
    /// uniformly from `min_factor..=max_factor`. Overlapping windows compound.
    MultiplicativeSpike {
        /// Number of epicenters over the horizon.
        count: usize,
        /// Half-width of the affected window, in weeks.
        radius: usize,
        /// Smallest spike factor.
        min_factor: f64,
        /// Largest spike factor.
        max_factor: f64,
    },
    /// Each epicenter adds a Gaussian-shaped bump of height `peak` and
    /// width `sigma` weeks to the weeks within `radius`.
    GaussianBump {
        /// Number of epicenters over the horizon.
        count: usize,
        /// Half-width of the affected window, in weeks.
        radius: usize,
        /// Extra cases at the epicenter.
        peak: f64,
        /// Standard deviation of the bump, in weeks.
        sigma: f64,
    },
}

impl OutbreakModel {
    /// Number of epicenters requested.
    #[must_use]
    pub const fn count(&self) -> usize {
        match self {
            Self::MultiplicativeSpike { count, .. } | Self::GaussianBump { count, .. } => *count,
        }
    }

    /// Returns a copy with a different epicenter count.
    #[must_use]
    pub const fn with_count(self, count: usize) -> Self {
        match self {
            Self::MultiplicativeSpike {
                radius,
                min_factor,
                max_factor,
                ..
            } => Self::MultiplicativeSpike {
                count,
                radius,
                min_factor,
                max_factor,
            },
            Self::GaussianBump {
                radius,
                peak,
                sigma,
                ..
            } => Self::GaussianBump {
                count,
                radius,
                peak,
                sigma,
            },
        }
    }

    /// Four additive bumps of 30 cases with a two-week spread.
    #[must_use]
    pub const fn gaussian_bump() -> Self {
        Self::GaussianBump {
            count: 4,
            radius: 3,
            peak: 30.0,
            sigma: 2.0,
        }
    }
}

impl Default for OutbreakModel {
    fn default() -> Self {
        Self::MultiplicativeSpike {
            count: 5,
            radius: 2,
            min_factor: 1.5,
            max_factor: 2.5,
        }
    }
}

/// Tunables shared by every region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeneratorConfig {
    /// Outbreak placement and shape.
    pub outbreak: OutbreakModel,
}

/// Produces synthetic surveillance tables.
#[derive(Debug, Clone, Default)]
pub struct SeriesGenerator {
    config: GeneratorConfig,
}

impl SeriesGenerator {
    /// Creates a generator with the given configuration.
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Returns the generator configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates one record per requested region per week in
    /// `[start_date, end_date]`.
    ///
    /// Rows are ordered by region (in request order) then by `week_start`.
    /// A `start_date` that is not a Monday is rolled forward to the next
    /// Monday; `end_date` is inclusive.
    ///
    /// # Errors
    ///
    /// * [`SurveillanceError::NoRegions`] if `params.regions` is empty
    /// * [`SurveillanceError::EmptyRange`] if `start_date >= end_date` or the
    ///   range contains no Monday
    /// * [`SurveillanceError::InvalidProfile`] if a region profile cannot
    ///   parameterize its noise distribution
    pub fn generate(
        &self,
        params: &GenerationParams,
    ) -> Result<Vec<ObservationRecord>, SurveillanceError> {
        if params.regions.is_empty() {
            return Err(SurveillanceError::NoRegions);
        }

        let weeks = week_starts(params.start_date, params.end_date);
        if params.start_date >= params.end_date || weeks.is_empty() {
            return Err(SurveillanceError::EmptyRange {
                start: params.start_date,
                end: params.end_date,
            });
        }

        let seed = params.seed.unwrap_or_else(|| {
            let seed = StdRng::from_entropy().r#gen();
            log::debug!("No seed supplied, drew fresh seed {seed}");
            seed
        });

        log::debug!(
            "Generating {} weeks x {} regions ({} .. {}, seed {seed})",
            weeks.len(),
            params.regions.len(),
            weeks[0],
            weeks[weeks.len() - 1],
        );

        let mut records = Vec::with_capacity(weeks.len() * params.regions.len());
        for region in &params.regions {
            let profile = dengue_ews_region::profile(*region);
            let mut rng = region_rng(seed, *region);
            records.extend(self.generate_region(*region, profile, &weeks, &mut rng)?);
        }

        Ok(records)
    }

    #[allow(clippy::cast_precision_loss)]
    fn generate_region(
        &self,
        region: Region,
        profile: RegionProfile,
        weeks: &[NaiveDate],
        rng: &mut StdRng,
    ) -> Result<Vec<ObservationRecord>, SurveillanceError> {
        let noise = NoiseSources::new(region, profile)?;
        let n = weeks.len();
        let (factor, bump) = self.outbreaks(n, rng);

        let records = weeks
            .iter()
            .enumerate()
            .map(|(t, &week_start)| {
                let phase = TAU * (t % WEEKS_PER_YEAR) as f64 / WEEKS_PER_YEAR as f64;

                let seasonal = profile.amplitude.mul_add(
                    (phase - FRAC_PI_2).sin(),
                    profile.baseline,
                ) + profile.harmonic_amplitude * (2.0 * phase).sin();
                let trend = if n > 1 {
                    profile.trend * t as f64 / (n - 1) as f64
                } else {
                    0.0
                };
                let cases =
                    (seasonal + trend + noise.cases.sample(rng) + bump[t]) * factor[t];

                let temperature = TEMPERATURE_AMPLITUDE.mul_add(phase.sin(), TEMPERATURE_MEAN)
                    + noise.temperature.sample(rng);
                let humidity = (HUMIDITY_AMPLITUDE.mul_add((phase + FRAC_PI_4).sin(), HUMIDITY_MEAN)
                    + noise.humidity.sample(rng))
                .clamp(0.0, 100.0);
                let rainfall = (RAINFALL_AMPLITUDE.mul_add((phase + FRAC_PI_6).sin(), RAINFALL_MEAN)
                    + noise.rainfall.sample(rng))
                .max(0.0);

                let control_a = CONTROL_A_FRACTION.mul_add(seasonal, noise.control_a.sample(rng));
                let control_b = CONTROL_B_FRACTION.mul_add(
                    seasonal,
                    CONTROL_B_AMPLITUDE.mul_add((phase + FRAC_PI_3).sin(), noise.control_b.sample(rng)),
                );

                ObservationRecord {
                    region,
                    week_start,
                    case_count: to_count(cases),
                    temperature_mean: round1(temperature),
                    humidity_pct: round1(humidity),
                    rainfall_mm: round1(rainfall),
                    control_signal_a: to_count(control_a),
                    control_signal_b: to_count(control_b),
                }
            })
            .collect();

        Ok(records)
    }

    /// Draws outbreak epicenters and returns per-week `(factor, bump)`.
    #[allow(clippy::cast_precision_loss)]
    fn outbreaks(&self, n: usize, rng: &mut StdRng) -> (Vec<f64>, Vec<f64>) {
        let mut factor = vec![1.0; n];
        let mut bump = vec![0.0; n];

        let count = self.config.outbreak.count().min(n);
        let epicenters = rand::seq::index::sample(rng, n, count).into_vec();

        for epicenter in epicenters {
            match self.config.outbreak {
                OutbreakModel::MultiplicativeSpike {
                    radius,
                    min_factor,
                    max_factor,
                    ..
                } => {
                    let spike = if max_factor > min_factor {
                        rng.gen_range(min_factor..=max_factor)
                    } else {
                        min_factor
                    };
                    for f in &mut factor[window(epicenter, radius, n)] {
                        *f *= spike;
                    }
                }
                OutbreakModel::GaussianBump {
                    radius,
                    peak,
                    sigma,
                    ..
                } => {
                    for t in window(epicenter, radius, n) {
                        let z = (t as f64 - epicenter as f64) / sigma;
                        bump[t] += peak * (-0.5 * z * z).exp();
                    }
                }
            }
        }

        (factor, bump)
    }
}

/// Noise distributions for one region.
struct NoiseSources {
    cases: Normal<f64>,
    temperature: Normal<f64>,
    humidity: Normal<f64>,
    rainfall: Gamma<f64>,
    control_a: Normal<f64>,
    control_b: Normal<f64>,
}

impl NoiseSources {
    fn new(region: Region, profile: RegionProfile) -> Result<Self, SurveillanceError> {
        let invalid = |e: &dyn std::fmt::Display| SurveillanceError::InvalidProfile {
            region,
            message: e.to_string(),
        };
        let normal = |sd: f64| Normal::new(0.0, sd).map_err(|e| invalid(&e));

        Ok(Self {
            cases: normal(profile.baseline * profile.volatility)?,
            temperature: normal(TEMPERATURE_SD)?,
            humidity: normal(HUMIDITY_SD)?,
            rainfall: Gamma::new(RAINFALL_GAMMA_SHAPE, RAINFALL_GAMMA_SCALE)
                .map_err(|e| invalid(&e))?,
            control_a: normal(CONTROL_A_SD)?,
            control_b: normal(CONTROL_B_SD)?,
        })
    }
}

/// Every Monday from `start` (rolled forward) through `end`, inclusive.
#[must_use]
pub fn week_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let offset = (7 - start.weekday().num_days_from_monday()) % 7;
    let Some(first) = start.checked_add_days(Days::new(u64::from(offset))) else {
        return Vec::new();
    };
    first.iter_weeks().take_while(|d| *d <= end).collect()
}

/// Independent RNG stream for one region.
fn region_rng(seed: u64, region: Region) -> StdRng {
    StdRng::seed_from_u64(seed ^ (region.ordinal() + 1).wrapping_mul(REGION_SEED_STRIDE))
}

/// Inclusive window of `radius` weeks around `center`, clipped to `0..n`.
fn window(center: usize, radius: usize, n: usize) -> std::ops::Range<usize> {
    center.saturating_sub(radius)..(center + radius + 1).min(n)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: f64) -> u32 {
    let rounded = value.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        rounded.min(f64::from(u32::MAX)) as u32
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
