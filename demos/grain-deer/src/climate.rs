//! Seasonal temperature and precipitation.

use std::f64::consts::PI;

use eco_core::{Calendar, RandomSource, Readings};
use eco_role::Environment;
use serde::Deserialize;

/// Sinusoidal yearly cycle plus uniform noise.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClimateParams {
    /// Degrees.
    pub avg_temp:     f64,
    pub amp_temp:     f64,
    pub noise_temp:   f64,
    /// Inches per month.
    pub avg_precip:   f64,
    pub amp_precip:   f64,
    pub noise_precip: f64,
}

impl Default for ClimateParams {
    fn default() -> Self {
        Self {
            avg_temp:     50.0,
            amp_temp:     20.0,
            noise_temp:   10.0,
            avg_precip:   6.0,
            amp_precip:   6.0,
            noise_precip: 2.0,
        }
    }
}

/// The demo's [`Environment`].
///
/// For month `m` the phase angle is `30·m + 15` degrees; temperature peaks in
/// mid-summer and precipitation in spring.  Precipitation never goes below 0.
#[derive(Clone, Debug, Default)]
pub struct SeasonalClimate {
    pub params: ClimateParams,
}

impl SeasonalClimate {
    pub fn new(params: ClimateParams) -> Self {
        Self { params }
    }

    /// Noise-free readings for `month`.
    pub fn mean(&self, month: u8) -> Readings {
        let p = &self.params;
        let ang = (30.0 * month as f64 + 15.0) * (PI / 180.0);
        Readings {
            temperature:   p.avg_temp - p.amp_temp * ang.cos(),
            precipitation: p.avg_precip + p.amp_precip * ang.sin(),
        }
    }
}

impl Environment for SeasonalClimate {
    fn readings(&mut self, calendar: Calendar, rng: &mut dyn RandomSource) -> Readings {
        let p = &self.params;
        let mean = self.mean(calendar.month);
        let temperature = mean.temperature + rng.next_in(-p.noise_temp, p.noise_temp);
        let precipitation = mean.precipitation + rng.next_in(-p.noise_precip, p.noise_precip);
        Readings { temperature, precipitation: precipitation.max(0.0) }
    }
}
