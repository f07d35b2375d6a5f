//! Recorded experiment data
//!
//! A [`Dataset`] holds time-aligned series captured on the physical rig
//! (angles, trolley velocities, drive voltages, ...). It is only ever compared
//! against simulated output, never fed into a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset", into = "RawDataset")]
pub struct Dataset {
    time: Vec<f64>,
    series: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDataset {
    time: Vec<f64>,
    series: BTreeMap<String, Vec<f64>>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = ConfigurationError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Dataset::new(raw.time, raw.series)
    }
}

impl From<Dataset> for RawDataset {
    fn from(dataset: Dataset) -> Self {
        RawDataset {
            time: dataset.time,
            series: dataset.series,
        }
    }
}

impl Dataset {
    pub fn new(
        time: Vec<f64>,
        series: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, ConfigurationError> {
        if time.is_empty() {
            return Err(ConfigurationError::InvalidDataset {
                reason: "time series is empty".to_string(),
            });
        }
        if time.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(ConfigurationError::InvalidDataset {
                reason: "time series is not strictly increasing".to_string(),
            });
        }
        for (name, values) in &series {
            if values.len() != time.len() {
                return Err(ConfigurationError::InvalidDataset {
                    reason: format!(
                        "series `{}` has {} samples but time has {}",
                        name,
                        values.len(),
                        time.len()
                    ),
                });
            }
        }
        Ok(Dataset { time, series })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidDataset {
            reason: e.to_string(),
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    /// Index of the last recorded time `<= t`, or `None` before the first sample.
    pub fn index_at(&self, t: f64) -> Option<usize> {
        let upper = self.time.partition_point(|&recorded| recorded <= t);
        upper.checked_sub(1)
    }

    /// Zero-order-hold value of `name` at time `t`.
    ///
    /// Times before the first recording hold the first sample.
    pub fn sample_at(&self, name: &str, t: f64) -> Option<f64> {
        let values = self.series.get(name)?;
        let index = self.index_at(t).unwrap_or(0);
        values.get(index).copied()
    }

    /// Resamples `name` onto arbitrary timestamps.
    pub fn resample(&self, name: &str, times: &[f64]) -> Option<Vec<f64>> {
        times.iter().map(|&t| self.sample_at(name, t)).collect()
    }
}
