//! Distribution selection and design-rainfall tables.

use serde::Serialize;
use tracing::info;

use crate::error::FreqError;
use crate::gumbel::Gumbel;
use crate::lp3::LogPearson3;
use crate::sample::AnnualMaxima;

/// Return periods (years) reported when the caller supplies none.
pub const STANDARD_RETURN_PERIODS: [f64; 6] = [2.0, 5.0, 10.0, 25.0, 50.0, 100.0];

/// Which distribution to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyDistribution {
    /// Log-Pearson Type III on base-10 logarithms.
    #[default]
    LogPearson3,
    /// Gumbel (EV1), method of moments.
    Gumbel,
}

impl FrequencyDistribution {
    /// Fit the selected distribution to `sample`.
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::ZeroVariance`] if every value is identical.
    pub fn fit(self, sample: &AnnualMaxima) -> Result<FittedDistribution, FreqError> {
        Ok(match self {
            Self::LogPearson3 => FittedDistribution::LogPearson3(LogPearson3::fit(sample)?),
            Self::Gumbel => FittedDistribution::Gumbel(Gumbel::fit(sample)?),
        })
    }

    /// Short lowercase name for reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LogPearson3 => "lp3",
            Self::Gumbel => "gumbel",
        }
    }
}

/// A fitted distribution ready for quantile extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FittedDistribution {
    LogPearson3(LogPearson3),
    Gumbel(Gumbel),
}

impl FittedDistribution {
    /// Which distribution this is.
    #[must_use]
    pub fn kind(&self) -> FrequencyDistribution {
        match self {
            Self::LogPearson3(_) => FrequencyDistribution::LogPearson3,
            Self::Gumbel(_) => FrequencyDistribution::Gumbel,
        }
    }

    /// Design value for return period `T`.
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::InvalidReturnPeriod`] unless `T` is finite and > 1.
    pub fn quantile(&self, return_period: f64) -> Result<f64, FreqError> {
        match self {
            Self::LogPearson3(d) => d.quantile(return_period),
            Self::Gumbel(d) => d.quantile(return_period),
        }
    }

    /// Tabulate design values for each requested return period, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`FreqError::InvalidReturnPeriod`] for the first invalid period.
    pub fn design_rainfall(&self, periods: &[f64]) -> Result<DesignRainfall, FreqError> {
        let rows = periods
            .iter()
            .map(|&t| {
                Ok(DesignRow {
                    return_period: t,
                    depth_mm: self.quantile(t)?,
                })
            })
            .collect::<Result<Vec<_>, FreqError>>()?;
        info!(
            distribution = self.kind().name(),
            n_periods = rows.len(),
            "design rainfall computed"
        );
        Ok(DesignRainfall {
            distribution: self.kind().name(),
            rows,
        })
    }
}

/// One `(return period, design depth)` row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignRow {
    /// Return period in years.
    pub return_period: f64,
    /// Design rainfall depth in mm.
    pub depth_mm: f64,
}

/// Design rainfall table produced by a fitted distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignRainfall {
    /// Name of the distribution that produced the table.
    pub distribution: &'static str,
    pub rows: Vec<DesignRow>,
}

impl DesignRainfall {
    /// Depth for an exact return period, if tabulated.
    #[must_use]
    pub fn depth_for(&self, return_period: f64) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.return_period == return_period)
            .map(|r| r.depth_mm)
    }
}
