//! Time series with a validated, strictly increasing time axis.

use std::ops::Index;

use crate::error::HydroError;

/// Relative tolerance used when comparing time steps.
pub(crate) const STEP_TOLERANCE: f64 = 1e-9;

/// Owned series of `(time_offset, value)` pairs.
///
/// Time offsets are in minutes. Guaranteed non-empty, finite, and strictly
/// increasing in time. The step may be fixed or variable; operations that
/// need a fixed step call [`TimeSeries::uniform_step`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new series from parallel time and value vectors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HydroError::EmptySeries`] | `values` is empty |
    /// | [`HydroError::LengthMismatch`] | `times.len() != values.len()` |
    /// | [`HydroError::NonFiniteValue`] | Any time or value is NaN or infinite |
    /// | [`HydroError::NonIncreasingTime`] | `times` is not strictly increasing |
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self, HydroError> {
        if values.is_empty() {
            return Err(HydroError::EmptySeries);
        }
        if times.len() != values.len() {
            return Err(HydroError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if let Some(index) = times
            .iter()
            .zip(&values)
            .position(|(t, v)| !t.is_finite() || !v.is_finite())
        {
            return Err(HydroError::NonFiniteValue { index });
        }
        if let Some(w) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(HydroError::NonIncreasingTime { index: w + 1 });
        }
        Ok(Self { times, values })
    }

    /// Create a fixed-step series starting at time 0.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidParameter`] if `step_min` is not positive,
    /// otherwise the same errors as [`TimeSeries::new`].
    pub fn uniform(step_min: f64, values: Vec<f64>) -> Result<Self, HydroError> {
        crate::error::require_positive("step_min", step_min)?;
        let times = (0..values.len()).map(|i| i as f64 * step_min).collect();
        Self::new(times, values)
    }

    /// Return the time offsets in minutes.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Return the data values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return true if the series has no points.
    ///
    /// A [`TimeSeries`] built through its constructors is always non-empty;
    /// provided to satisfy the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the shared step between consecutive points in minutes.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HydroError::TooShort`] | Fewer than 2 points |
    /// | [`HydroError::NonUniformStep`] | Any interval differs from the first |
    pub fn uniform_step(&self) -> Result<f64, HydroError> {
        if self.times.len() < 2 {
            return Err(HydroError::TooShort {
                len: self.times.len(),
                min: 2,
            });
        }
        let step = self.times[1] - self.times[0];
        for (i, w) in self.times.windows(2).enumerate().skip(1) {
            if !steps_match(w[1] - w[0], step) {
                return Err(HydroError::NonUniformStep { index: i + 1 });
            }
        }
        Ok(step)
    }

    /// Return `(index, time, value)` of the maximum value. Ties keep the earliest point.
    #[must_use]
    pub fn peak(&self) -> (usize, f64, f64) {
        let mut best = 0;
        for (i, &v) in self.values.iter().enumerate().skip(1) {
            if v > self.values[best] {
                best = i;
            }
        }
        (best, self.times[best], self.values[best])
    }

    /// Return the sum of all values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Iterate over `(time, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Return a copy of this series with every value transformed by `f`.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::NonFiniteValue`] if `f` produces a non-finite value.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Result<Self, HydroError> {
        Self::new(self.times.clone(), self.values.iter().map(|&v| f(v)).collect())
    }

    /// Consume and return `(times, values)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.times, self.values)
    }
}

impl Index<usize> for TimeSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

/// Return true if two steps agree within [`STEP_TOLERANCE`] (relative).
pub(crate) fn steps_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= STEP_TOLERANCE * a.abs().max(b.abs())
}
