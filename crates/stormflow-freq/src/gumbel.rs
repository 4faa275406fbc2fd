//! Gumbel (EV1) distribution fitted by the method of moments.

use std::f64::consts::PI;

use tracing::{debug, instrument};

use crate::error::FreqError;
use crate::lp3::non_exceedance;
use crate::sample::AnnualMaxima;

/// Euler–Mascheroni constant as used in the frequency factor.
const EULER_GAMMA: f64 = 0.5772;

/// Gumbel parameters expressed as sample mean and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gumbel {
    mean: f64,
    std_dev: f64,
}

impl Gumbel {
    /// Fit to an annual-maximum sample.
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::ZeroVariance`] if every value is identical.
    #[instrument(skip(sample), fields(n = sample.len()))]
    pub fn fit(sample: &AnnualMaxima) -> Result<Self, FreqError> {
        let m = sample.moments();
        if m.std_dev <= 0.0 {
            return Err(FreqError::ZeroVariance);
        }
        debug!(mean = m.mean, std_dev = m.std_dev, "fitted gumbel");
        Ok(Self {
            mean: m.mean,
            std_dev: m.std_dev,
        })
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Frequency factor `K_T = -(√6/π)(0.5772 + ln ln(T/(T-1)))`.
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::InvalidReturnPeriod`] unless `T` is finite and > 1.
    pub fn frequency_factor(return_period: f64) -> Result<f64, FreqError> {
        non_exceedance(return_period)?;
        let t = return_period;
        Ok(-(6f64.sqrt() / PI) * (EULER_GAMMA + (t / (t - 1.0)).ln().ln()))
    }

    /// Design value `mean + K_T * std`.
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::InvalidReturnPeriod`] unless `T` is finite and > 1.
    pub fn quantile(&self, return_period: f64) -> Result<f64, FreqError> {
        Ok(self.mean + Self::frequency_factor(return_period)? * self.std_dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_factor_reference_values() {
        assert!((Gumbel::frequency_factor(2.0).unwrap() + 0.1643).abs() < 1e-3);
        assert!((Gumbel::frequency_factor(100.0).unwrap() - 3.1367).abs() < 1e-3);
    }

    #[test]
    fn quantile_applies_factor_to_moments() {
        let sample = AnnualMaxima::new(vec![60.0, 80.0, 100.0, 120.0, 140.0]).unwrap();
        let fit = Gumbel::fit(&sample).unwrap();
        assert_eq!(fit.mean(), 100.0);
        let k = Gumbel::frequency_factor(25.0).unwrap();
        assert!((fit.quantile(25.0).unwrap() - (100.0 + k * fit.std_dev())).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_period() {
        assert!(matches!(
            Gumbel::frequency_factor(1.0),
            Err(FreqError::InvalidReturnPeriod { .. })
        ));
    }
}
