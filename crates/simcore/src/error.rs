//! Error types shared by every crate in the workspace.

use thiserror::Error;

/// A configuration that cannot be turned into a runnable simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("timestep must be positive and finite, got {dt}")]
    NonPositiveTimestep { dt: f64 },

    #[error("time horizon of {samples} samples exceeds the limit of {max}", max = crate::time::MAX_SAMPLES)]
    HorizonTooLong { samples: f64 },

    #[error("time horizon needs at least 2 samples, got {len}")]
    TooFewSamples { len: usize },

    #[error("time samples are not uniformly spaced at index {index}: expected step {expected}, got {actual}")]
    NonUniformTime {
        index: usize,
        expected: f64,
        actual: f64,
    },

    #[error("signal `{signal}` has {actual} samples but the time horizon has {expected}")]
    LengthMismatch {
        signal: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid dataset: {reason}")]
    InvalidDataset { reason: String },
}

/// Failure of a simulation run.
///
/// Numerical blow-up is not an error: NaN and infinity are written
/// into the output like any other sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("simulation cancelled before step {step}")]
    Cancelled { step: usize },
}
