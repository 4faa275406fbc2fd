//! Error types for frequency analysis.

/// Errors from sample validation, distribution fitting, and quantile extraction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FreqError {
    /// Returned when the sample is too small to estimate the distribution moments.
    #[error("need at least {min} annual maxima, got {n}")]
    TooFewValues {
        /// Number of values supplied.
        n: usize,
        /// Minimum required.
        min: usize,
    },

    /// Returned when a value is NaN or infinite.
    #[error("annual maximum at index {index} is not finite")]
    NonFiniteValue {
        /// Position of the offending value.
        index: usize,
    },

    /// Returned when a value is zero or negative (its logarithm is undefined).
    #[error("annual maximum at index {index} must be > 0, got {value}")]
    NonPositiveValue {
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when all values are identical and no spread can be fitted.
    #[error("sample has zero variance")]
    ZeroVariance,

    /// Returned when a return period is not finite and greater than 1 year.
    #[error("return period must be finite and > 1 year, got {period}")]
    InvalidReturnPeriod {
        /// The rejected return period.
        period: f64,
    },
}
