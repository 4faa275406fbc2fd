//! Rainfall frequency analysis.
//!
//! Fits Log-Pearson Type III or Gumbel distributions to an annual-maximum
//! series and extracts design depths for chosen return periods.

mod distribution;
mod error;
mod gumbel;
mod lp3;
mod normal;
mod sample;

pub use distribution::{
    DesignRainfall, DesignRow, FittedDistribution, FrequencyDistribution, STANDARD_RETURN_PERIODS,
};
pub use error::FreqError;
pub use gumbel::Gumbel;
pub use lp3::LogPearson3;
pub use normal::standard_normal_quantile;
pub use sample::{AnnualMaxima, MIN_SAMPLE_SIZE, Moments};
