//! Simulated versus recorded series
//!
//! Recordings are resampled onto the simulated grid with a zero-order hold.
//! The comparison is read-only: nothing flows back into a run.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use simcore::{ConfigurationError, Dataset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// `simulated - recorded` at each simulated timestamp
    pub error: Vec<f64>,
    pub rmse: f64,
    pub max_abs_error: f64,
}

/// Compares one simulated series with the recorded series `name`.
pub fn compare(
    simulated_time: &[f64],
    simulated: &[f64],
    dataset: &Dataset,
    name: &str,
) -> Result<Comparison, ConfigurationError> {
    if simulated.len() != simulated_time.len() {
        return Err(ConfigurationError::LengthMismatch {
            signal: "simulated",
            expected: simulated_time.len(),
            actual: simulated.len(),
        });
    }
    let recorded = dataset
        .resample(name, simulated_time)
        .ok_or_else(|| ConfigurationError::InvalidDataset {
            reason: format!("no recorded series named `{}`", name),
        })?;

    let error = Array1::from(simulated.to_vec()) - Array1::from(recorded);
    let rmse = error.mapv(|e| e * e).mean().unwrap_or(0.0).sqrt();
    let max_abs_error = error.fold(0.0, |m: f64, e| m.max(e.abs()));

    Ok(Comparison {
        error: error.to_vec(),
        rmse,
        max_abs_error,
    })
}
