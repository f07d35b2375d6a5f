//! Uniform time grids.

use crate::error::ConfigurationError;

/// Relative tolerance used when checking explicit timestamps against `dt`.
const SPACING_TOLERANCE: f64 = 1e-6;

/// Longest horizon a uniform grid may span, in samples.
pub const MAX_SAMPLES: usize = 50_000_000;

/// A validated, strictly increasing, uniformly spaced sequence of timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    dt: f64,
    samples: Vec<f64>,
}

impl TimeGrid {
    /// Timestamps `i * dt` for every `i * dt < duration`, like a half-open arange.
    pub fn uniform(dt: f64, duration: f64) -> Result<Self, ConfigurationError> {
        check_dt(dt)?;
        let n = if duration > 0.0 {
            let samples = (duration / dt).ceil();
            if !(samples <= MAX_SAMPLES as f64) {
                return Err(ConfigurationError::HorizonTooLong { samples });
            }
            samples as usize
        } else {
            0
        };
        let samples: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
        Self::check_len(samples.len())?;
        Ok(TimeGrid { dt, samples })
    }

    /// Wraps explicit timestamps, checking that they advance by `dt` every step.
    pub fn from_samples(dt: f64, samples: Vec<f64>) -> Result<Self, ConfigurationError> {
        check_dt(dt)?;
        Self::check_len(samples.len())?;
        for (index, pair) in samples.windows(2).enumerate() {
            let actual = pair[1] - pair[0];
            if !((actual - dt).abs() <= SPACING_TOLERANCE * dt) {
                return Err(ConfigurationError::NonUniformTime {
                    index: index + 1,
                    expected: dt,
                    actual,
                });
            }
        }
        Ok(TimeGrid { dt, samples })
    }

    fn check_len(len: usize) -> Result<(), ConfigurationError> {
        if len < 2 {
            return Err(ConfigurationError::TooFewSamples { len });
        }
        Ok(())
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

}

fn check_dt(dt: f64) -> Result<(), ConfigurationError> {
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(ConfigurationError::NonPositiveTimestep { dt });
    }
    Ok(())
}
