//! Error types for series validation, table lookup, hydrograph generation, and routing.

/// Errors from the hydrologic core.
///
/// Every variant carries the context needed to correct the input: which
/// parameter or table failed, the offending value, and the violated bound.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HydroError {
    /// Returned when a scalar input lies outside its physical domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as exposed by the public API.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// The bound or rule that was violated.
        reason: &'static str,
    },

    /// Returned when a rating table is not usable for interpolation.
    #[error("invalid {table} table: {reason}")]
    InvalidTable {
        /// Which table failed (e.g. "stage-storage").
        table: &'static str,
        /// Description of the violation, including the offending row.
        reason: String,
    },

    /// Returned when two series combined in one computation use different time steps.
    #[error("time step mismatch: {left} min vs {right} min")]
    StepMismatch {
        /// Step of the first series in minutes.
        left: f64,
        /// Step of the second series in minutes.
        right: f64,
    },

    /// Returned when interpolation is attempted on a degenerate table.
    #[error("interpolation needs at least 2 points, got {len}")]
    Domain {
        /// Number of points supplied.
        len: usize,
    },

    /// Returned when an empty series is supplied.
    #[error("time series must be non-empty")]
    EmptySeries,

    /// Returned when a series contains NaN or infinity.
    #[error("time series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when the time axis is not strictly increasing.
    #[error("time axis must be strictly increasing, violated at index {index}")]
    NonIncreasingTime {
        /// Index of the first time value not greater than its predecessor.
        index: usize,
    },

    /// Returned when a fixed step is required but the time axis is irregular.
    #[error("time axis is not uniformly spaced at index {index}")]
    NonUniformStep {
        /// Index of the first interval that differs from the first one.
        index: usize,
    },

    /// Returned when the time and value vectors differ in length.
    #[error("times and values differ in length: {times} vs {values}")]
    LengthMismatch {
        /// Number of time values.
        times: usize,
        /// Number of data values.
        values: usize,
    },

    /// Returned when a series is shorter than an operation requires.
    #[error("series has {len} points, need at least {min}")]
    TooShort {
        /// Actual length.
        len: usize,
        /// Required minimum length.
        min: usize,
    },
}

impl HydroError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }
}

/// Return `Ok(value)` if `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, HydroError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(HydroError::invalid(name, value, "must be finite and > 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_positive_accepts_positive() {
        assert_eq!(require_positive("x", 2.5), Ok(2.5));
    }

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(matches!(
            require_positive("tc", 0.0),
            Err(HydroError::InvalidParameter { name: "tc", .. })
        ));
        assert!(require_positive("tc", f64::NAN).is_err());
        assert!(require_positive("tc", -1.0).is_err());
    }

    #[test]
    fn message_names_parameter_and_bound() {
        let err = HydroError::invalid("alpha", -1.0, "must be finite and > 0");
        assert_eq!(
            err.to_string(),
            "invalid parameter `alpha` = -1: must be finite and > 0"
        );
    }
}
