use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relative slack on the upper bound so `max` is reached despite rounding.
const UPPER_BOUND_TOLERANCE: f64 = 1e-9;

/// Inclusive `[min, max]` range sampled every `step` millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl GridRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// A range holding only `value`.
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value, 1.0)
    }

    /// Check bounds are finite and positive, the step is positive and `min <= max`.
    pub fn validate(&self, field: &str) -> Result<()> {
        for (name, value) in [("min", self.min), ("max", self.max), ("step", self.step)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid(
                    format!("{field} {name}"),
                    format!("must be a positive number, got {value}"),
                ));
            }
        }
        if self.min > self.max {
            return Err(Error::InvalidRange {
                field: field.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Sample values `min + k * step` up to and including `max`.
    pub fn values(&self) -> GridValues {
        GridValues {
            range: *self,
            next: 0,
        }
    }

    /// Number of samples in the range.
    pub fn len(&self) -> usize {
        self.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterator over the samples of a [`GridRange`].
#[derive(Debug, Clone)]
pub struct GridValues {
    range: GridRange,
    next: u64,
}

impl Iterator for GridValues {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let GridRange { min, max, step } = self.range;
        if step.is_nan() || step <= 0.0 {
            return None;
        }
        let value = min + self.next as f64 * step;
        if value > max + UPPER_BOUND_TOLERANCE * step {
            return None;
        }
        self.next += 1;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_max_when_reached_exactly() {
        let values: Vec<f64> = GridRange::new(50.0, 150.0, 5.0).values().collect();
        assert_eq!(values.len(), 21);
        assert_eq!(values.first(), Some(&50.0));
        assert_eq!(values.last(), Some(&150.0));
    }

    #[test]
    fn stops_below_max_when_step_overshoots() {
        let values: Vec<f64> = GridRange::new(100.0, 125.0, 10.0).values().collect();
        assert_eq!(values, vec![100.0, 110.0, 120.0]);
    }

    #[test]
    fn fractional_steps_do_not_drift() {
        let range = GridRange::new(0.1, 1.0, 0.1);
        assert_eq!(range.len(), 10);
    }

    #[test]
    fn fixed_range_has_one_sample() {
        assert_eq!(GridRange::fixed(80.0).values().collect::<Vec<_>>(), vec![80.0]);
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let err = GridRange::new(200.0, 100.0, 5.0)
            .validate("diameter")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = GridRange::new(10.0, 20.0, 0.0)
            .validate("length")
            .unwrap_err();
        assert!(err.to_string().contains("length step"), "{err}");
    }
}
