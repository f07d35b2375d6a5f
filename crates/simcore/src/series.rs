//! Helpers over parallel output series.

use serde::{Deserialize, Serialize};

/// The first sample of a run that is NaN or infinite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonFiniteSample {
    pub series: String,
    pub index: usize,
}

/// Finds the earliest non-finite sample across named series.
///
/// Ties on the step index go to the series listed first.
pub fn first_non_finite(series: &[(&str, &[f64])]) -> Option<NonFiniteSample> {
    let mut earliest: Option<NonFiniteSample> = None;
    for (name, values) in series {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            let better = earliest.as_ref().map_or(true, |e| index < e.index);
            if better {
                earliest = Some(NonFiniteSample {
                    series: name.to_string(),
                    index,
                });
            }
        }
    }
    earliest
}

/// Largest absolute value of a series, ignoring NaN.
pub fn peak_abs(values: &[f64]) -> f64 {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_finite() {
        let a = [0.0, 1.0, 2.0];
        assert_eq!(first_non_finite(&[("a", &a[..])]), None);
    }

    #[test]
    fn test_earliest_index_wins() {
        let a = [0.0, 1.0, f64::NAN];
        let b = [0.0, f64::INFINITY, f64::NAN];
        let found = first_non_finite(&[("a", &a[..]), ("b", &b[..])]).unwrap();
        assert_eq!(found.series, "b");
        assert_eq!(found.index, 1);
    }

    #[test]
    fn test_tie_goes_to_first_series() {
        let a = [0.0, f64::NEG_INFINITY];
        let b = [0.0, f64::NAN];
        let found = first_non_finite(&[("a", &a[..]), ("b", &b[..])]).unwrap();
        assert_eq!(found.series, "a");
    }

    #[test]
    fn test_peak_abs() {
        assert_eq!(peak_abs(&[0.5, -2.0, 1.0, f64::NAN]), 2.0);
        assert_eq!(peak_abs(&[]), 0.0);
    }
}
