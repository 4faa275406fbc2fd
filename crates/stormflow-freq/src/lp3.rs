//! Log-Pearson Type III distribution fitted to base-10 logarithms.

use tracing::{debug, instrument};

use crate::error::FreqError;
use crate::normal::standard_normal_quantile;
use crate::sample::{AnnualMaxima, Moments};

/// Below this magnitude the skew is treated as zero and `K = z`.
const SKEW_EPSILON: f64 = 1e-6;

/// Log-Pearson III parameters: moments of `log10(x)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogPearson3 {
    log_moments: Moments,
}

impl LogPearson3 {
    /// Fit to an annual-maximum sample.
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::ZeroVariance`] if every value is identical.
    #[instrument(skip(sample), fields(n = sample.len()))]
    pub fn fit(sample: &AnnualMaxima) -> Result<Self, FreqError> {
        let log_moments = sample.log_moments();
        if log_moments.std_dev <= 0.0 {
            return Err(FreqError::ZeroVariance);
        }
        debug!(
            mean = log_moments.mean,
            std_dev = log_moments.std_dev,
            skew = log_moments.skew,
            "fitted log-pearson III"
        );
        Ok(Self { log_moments })
    }

    /// Moments of the log-transformed sample.
    #[must_use]
    pub fn log_moments(&self) -> Moments {
        self.log_moments
    }

    /// Frequency factor for return period `T` (Wilson–Hilferty).
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::InvalidReturnPeriod`] unless `T` is finite and > 1.
    pub fn frequency_factor(&self, return_period: f64) -> Result<f64, FreqError> {
        let z = standard_normal_quantile(non_exceedance(return_period)?);
        Ok(wilson_hilferty(z, self.log_moments.skew))
    }

    /// Design value for return period `T`: `10^(mean + K * std)`.
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::InvalidReturnPeriod`] unless `T` is finite and > 1.
    pub fn quantile(&self, return_period: f64) -> Result<f64, FreqError> {
        let k = self.frequency_factor(return_period)?;
        Ok(10f64.powf(self.log_moments.mean + k * self.log_moments.std_dev))
    }
}

/// Non-exceedance probability `1 - 1/T` after validating `T`.
pub(crate) fn non_exceedance(return_period: f64) -> Result<f64, FreqError> {
    if !return_period.is_finite() || return_period <= 1.0 {
        return Err(FreqError::InvalidReturnPeriod {
            period: return_period,
        });
    }
    Ok(1.0 - 1.0 / return_period)
}

/// Pearson III frequency factor from a standard normal deviate and skew.
pub(crate) fn wilson_hilferty(z: f64, skew: f64) -> f64 {
    if skew.abs() < SKEW_EPSILON {
        return z;
    }
    let k = skew / 6.0;
    (2.0 / skew) * ((1.0 + z * k - k * k).powi(3) - 1.0)
}
