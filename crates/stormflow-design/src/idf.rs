//! Rainfall intensity formulas.

use serde::Serialize;

use crate::error::{DesignError, require_non_negative, require_positive};

/// Mononobe intensity in mm/hr for duration `t_hr` from a 24-hour depth `r24_mm`.
///
/// `I = (R24 / 24) * (24 / t)^(2/3)`.
///
/// # Errors
///
/// Returns [`DesignError::InvalidParameter`] if `r24_mm < 0` or `t_hr <= 0`.
pub fn mononobe_intensity(r24_mm: f64, t_hr: f64) -> Result<f64, DesignError> {
    require_non_negative("r24_mm", r24_mm)?;
    require_positive("duration_hr", t_hr)?;
    Ok(r24_mm / 24.0 * (24.0 / t_hr).powf(2.0 / 3.0))
}

/// Coefficients of the general IDF curve `I = A / (tc + B)^C` (tc in minutes, I in mm/hr).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdfCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl IdfCurve {
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidParameter`] if `a <= 0`, `b < 0`, or `c < 0`.
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, DesignError> {
        require_positive("idf_a", a)?;
        require_non_negative("idf_b", b)?;
        require_non_negative("idf_c", c)?;
        Ok(Self { a, b, c })
    }

    /// Intensity in mm/hr at duration `tc_min`.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidParameter`] if `tc_min <= 0`.
    pub fn intensity(&self, tc_min: f64) -> Result<f64, DesignError> {
        require_positive("tc_min", tc_min)?;
        Ok(self.a / (tc_min + self.b).powf(self.c))
    }
}
