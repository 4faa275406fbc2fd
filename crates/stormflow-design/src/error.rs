//! Error types for the design calculators.

use stormflow_hydro::HydroError;

/// Errors from the rainfall, runoff, time-of-concentration, and sewer calculators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignError {
    /// Returned when an input is outside its physical or empirical range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The offending value.
        value: f64,
        /// Accepted range.
        reason: &'static str,
    },

    /// Returned when no trial diameter up to the maximum carries the design flow.
    #[error("no diameter up to {max_diameter_m} m carries {design_flow} m³/s")]
    NoAdequateDiameter {
        /// Design discharge in m³/s.
        design_flow: f64,
        /// Largest diameter tried, in m.
        max_diameter_m: f64,
    },

    /// Propagated from series construction in `stormflow-hydro`.
    #[error(transparent)]
    Hydro(#[from] HydroError),
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, DesignError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DesignError::InvalidParameter {
            name,
            value,
            reason: "must be finite and > 0",
        })
    }
}

/// Reject non-finite or negative values.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64, DesignError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DesignError::InvalidParameter {
            name,
            value,
            reason: "must be finite and >= 0",
        })
    }
}
