//! Input signal generators
//!
//! Every externally driven channel of a run (velocity setpoint, force on the
//! trolley, force on the person) is described by an [`InputSignal`] and
//! resolved against the run's [`TimeGrid`] into one sample per timestamp.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::PlantParams;
use crate::error::ConfigurationError;
use crate::time::TimeGrid;

/// Named waveform shapes, each parameterised by a single scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Waveform {
    Step,
    Ramp,
    Sine,
    Cosine,
    Piecewise,
    Constant,
    Square,
    DoubleSquare,
    #[default]
    None,
}

impl Waveform {
    /// Samples the waveform on `grid`.
    pub fn generate(&self, grid: &TimeGrid, scale: f64) -> Vec<f64> {
        let n = grid.len();
        let dt = grid.dt();
        let time = grid.samples();

        match self {
            Waveform::Step => {
                let d = n / 4;
                (0..n).map(|i| if i < d { 0.0 } else { scale }).collect()
            }
            Waveform::Ramp => {
                let d = n / 6;
                (0..n)
                    .map(|i| {
                        if i < 2 * d {
                            0.0
                        } else if i < 4 * d {
                            scale * dt * (i - 2 * d) as f64
                        } else {
                            scale * dt * (2 * d) as f64
                        }
                    })
                    .collect()
            }
            Waveform::Sine => time.iter().map(|t| scale * (t / 3.0).sin()).collect(),
            Waveform::Cosine => time.iter().map(|t| scale * t.cos()).collect(),
            Waveform::Piecewise => {
                let d = n / 5;
                let plateau = d as f64 * dt * scale;
                (0..n)
                    .map(|i| {
                        if i < d {
                            i as f64 * dt * scale
                        } else if i < 2 * d {
                            plateau
                        } else if i < 3 * d {
                            -plateau
                        } else if i < 4 * d {
                            -plateau + (i - 3 * d) as f64 * dt * scale
                        } else {
                            scale * (i as f64 * dt).sin()
                        }
                    })
                    .collect()
            }
            Waveform::Constant => vec![scale; n],
            Waveform::Square => {
                let d = n / 4;
                (0..n)
                    .map(|i| if i >= d && i < 3 * d { scale } else { 0.0 })
                    .collect()
            }
            Waveform::DoubleSquare => {
                let d = n / 8;
                (0..n)
                    .map(|i| {
                        if i >= d && i < 3 * d {
                            scale
                        } else if i >= 5 * d && i < 7 * d {
                            -scale
                        } else {
                            0.0
                        }
                    })
                    .collect()
            }
            Waveform::None => vec![0.0; n],
        }
    }
}

/// Two-pulse force profile that moves the trolley without leaving residual sway.
///
/// Pulse timing is derived from the pendulum period `T = 2*pi / sqrt(g/l)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapedMove {
    /// Reach `target` velocity: two equal pulses of `T/4` separated by `T/4`.
    Velocity { target: f64 },
    /// Travel `destination` metres without exceeding `max_angle_deg` of sway.
    Distance { max_angle_deg: f64, destination: f64 },
}

impl ShapedMove {
    /// Force samples for a load of mass `plant.load_mass`.
    pub fn generate(&self, grid: &TimeGrid, plant: &PlantParams) -> Vec<f64> {
        let period = 2.0 * PI / plant.natural_frequency();
        let (amplitude, accel_time, coast_time, second_sign) = match *self {
            ShapedMove::Velocity { target } => {
                let amplitude = 2.0 * target / period;
                (amplitude, period / 4.0, period / 4.0, 1.0)
            }
            ShapedMove::Distance {
                max_angle_deg,
                destination,
            } => {
                let amplitude = max_angle_deg * PI * plant.gravity / (2.0 * 180.0);
                let accel_time = destination / (amplitude * period);
                (amplitude, accel_time, period - accel_time, -1.0)
            }
        };

        let force = amplitude * plant.load_mass;
        let dt = grid.dt();
        (0..grid.len())
            .map(|i| {
                let t = i as f64 * dt;
                if t < accel_time {
                    force
                } else if t - accel_time < coast_time {
                    0.0
                } else if t - coast_time - accel_time < accel_time {
                    second_sign * force
                } else {
                    0.0
                }
            })
            .collect()
    }
}

/// Where the samples of one input channel come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputSignal {
    Waveform { kind: Waveform, scale: f64 },
    Samples(Vec<f64>),
    ShapedMove(ShapedMove),
}

impl Default for InputSignal {
    fn default() -> Self {
        InputSignal::Waveform {
            kind: Waveform::None,
            scale: 0.0,
        }
    }
}

impl InputSignal {
    pub fn waveform(kind: Waveform, scale: f64) -> Self {
        InputSignal::Waveform { kind, scale }
    }

    /// Resolves the signal to exactly `grid.len()` samples.
    ///
    /// `waveform_gain` multiplies generated waveforms only; explicit samples and
    /// shaped moves are already in physical units.
    pub fn resolve(
        &self,
        signal: &'static str,
        grid: &TimeGrid,
        plant: &PlantParams,
        waveform_gain: f64,
    ) -> Result<Vec<f64>, ConfigurationError> {
        match self {
            InputSignal::Waveform { kind, scale } => Ok(kind
                .generate(grid, *scale)
                .into_iter()
                .map(|v| v * waveform_gain)
                .collect()),
            InputSignal::Samples(samples) => {
                if samples.len() != grid.len() {
                    return Err(ConfigurationError::LengthMismatch {
                        signal,
                        expected: grid.len(),
                        actual: samples.len(),
                    });
                }
                Ok(samples.clone())
            }
            InputSignal::ShapedMove(shaped) => Ok(shaped.generate(grid, plant)),
        }
    }
}
