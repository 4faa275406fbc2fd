//! Annual-maximum samples and their moments.

use crate::error::FreqError;

/// Minimum sample size: the skew estimator divides by `(n - 1)(n - 2)`.
pub const MIN_SAMPLE_SIZE: usize = 3;

/// Validated annual-maximum series (e.g. daily rainfall maxima in mm).
///
/// Guaranteed at least [`MIN_SAMPLE_SIZE`] finite, strictly positive values.
/// Order is preserved but irrelevant to the fits.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualMaxima(Vec<f64>);

impl AnnualMaxima {
    /// Validate and wrap an annual-maximum series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`FreqError::TooFewValues`] | Fewer than 3 values |
    /// | [`FreqError::NonFiniteValue`] | Any value is NaN or infinite |
    /// | [`FreqError::NonPositiveValue`] | Any value is <= 0 |
    pub fn new(values: Vec<f64>) -> Result<Self, FreqError> {
        if values.len() < MIN_SAMPLE_SIZE {
            return Err(FreqError::TooFewValues {
                n: values.len(),
                min: MIN_SAMPLE_SIZE,
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(FreqError::NonFiniteValue { index });
        }
        if let Some(index) = values.iter().position(|&v| v <= 0.0) {
            return Err(FreqError::NonPositiveValue {
                index,
                value: values[index],
            });
        }
        Ok(Self(values))
    }

    /// Return the values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Return the sample size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a validated sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the moments of the raw values.
    #[must_use]
    pub fn moments(&self) -> Moments {
        Moments::of(&self.0)
    }

    /// Return the moments of the base-10 logarithms of the values.
    #[must_use]
    pub fn log_moments(&self) -> Moments {
        let logs: Vec<f64> = self.0.iter().map(|v| v.log10()).collect();
        Moments::of(&logs)
    }
}

/// Sample mean, standard deviation (n - 1), and skew coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation with `n - 1` in the denominator.
    pub std_dev: f64,
    /// Skew coefficient `n Σ(x - mean)³ / ((n - 1)(n - 2) s³)`; 0 when `s = 0`.
    pub skew: f64,
}

impl Moments {
    /// Compute the moments of `values`. Requires at least 3 values.
    pub(crate) fn of(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let (m2, m3) = values.iter().fold((0.0, 0.0), |(m2, m3), &v| {
            let d = v - mean;
            (m2 + d * d, m3 + d * d * d)
        });
        let std_dev = (m2 / (n - 1.0)).sqrt();
        let skew = if std_dev > 0.0 {
            n * m3 / ((n - 1.0) * (n - 2.0) * std_dev.powi(3))
        } else {
            0.0
        };
        Self { mean, std_dev, skew }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_sample() {
        assert!(matches!(
            AnnualMaxima::new(vec![10.0, 20.0]),
            Err(FreqError::TooFewValues { n: 2, min: 3 })
        ));
    }

    #[test]
    fn rejects_non_positive() {
        assert!(matches!(
            AnnualMaxima::new(vec![10.0, 0.0, 20.0]),
            Err(FreqError::NonPositiveValue { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_nan() {
        assert!(matches!(
            AnnualMaxima::new(vec![10.0, 20.0, f64::NAN]),
            Err(FreqError::NonFiniteValue { index: 2 })
        ));
    }

    #[test]
    fn symmetric_sample_has_zero_skew() {
        let m = AnnualMaxima::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap().moments();
        assert!((m.mean - 3.0).abs() < 1e-12);
        assert!((m.std_dev - 2.5_f64.sqrt()).abs() < 1e-12);
        assert!(m.skew.abs() < 1e-12);
    }

    #[test]
    fn right_tail_gives_positive_skew() {
        let m = AnnualMaxima::new(vec![1.0, 1.0, 1.0, 1.0, 10.0]).unwrap().moments();
        assert!(m.skew > 0.0);
    }

    #[test]
    fn constant_sample_reports_zero_spread() {
        let m = AnnualMaxima::new(vec![7.0; 4]).unwrap().moments();
        assert_eq!(m.std_dev, 0.0);
        assert_eq!(m.skew, 0.0);
    }
}
