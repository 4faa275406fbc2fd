//! SCS curve number runoff.
//!
//! Retention `S = 25400 / CN - 254` (mm), initial abstraction `Ia = λ S`,
//! and direct runoff `Q = (P - Ia)² / (P - Ia + S)` for `P > Ia`.

use std::ops::RangeInclusive;

use stormflow_hydro::{M2_PER_HA, TimeSeries};
use tracing::debug;

use crate::error::{DesignError, require_non_negative};

/// Accepted curve numbers.
pub const CURVE_NUMBER_RANGE: RangeInclusive<f64> = 30.0..=98.0;

/// Default initial-abstraction ratio λ.
pub const DEFAULT_IA_RATIO: f64 = 0.2;

/// Validated curve-number loss model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScsCurveNumber {
    curve_number: f64,
    ia_ratio: f64,
}

impl ScsCurveNumber {
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidParameter`] if `cn` is outside 30 to 98.
    pub fn new(cn: f64) -> Result<Self, DesignError> {
        if !CURVE_NUMBER_RANGE.contains(&cn) {
            return Err(DesignError::InvalidParameter {
                name: "curve_number",
                value: cn,
                reason: "must be between 30 and 98",
            });
        }
        Ok(Self {
            curve_number: cn,
            ia_ratio: DEFAULT_IA_RATIO,
        })
    }

    /// Set the initial-abstraction ratio λ (default 0.2).
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidParameter`] if `ratio` is negative or non-finite.
    pub fn with_ia_ratio(mut self, ratio: f64) -> Result<Self, DesignError> {
        self.ia_ratio = require_non_negative("ia_ratio", ratio)?;
        Ok(self)
    }

    #[must_use]
    pub fn curve_number(&self) -> f64 {
        self.curve_number
    }

    #[must_use]
    pub fn ia_ratio(&self) -> f64 {
        self.ia_ratio
    }

    /// Potential maximum retention S in mm.
    #[must_use]
    pub fn retention(&self) -> f64 {
        25_400.0 / self.curve_number - 254.0
    }

    /// Initial abstraction Ia in mm.
    #[must_use]
    pub fn initial_abstraction(&self) -> f64 {
        self.ia_ratio * self.retention()
    }

    /// Direct runoff depth (mm) for a storm total `p_mm`. Zero while `P <= Ia`.
    #[must_use]
    pub fn runoff_depth(&self, p_mm: f64) -> f64 {
        let ia = self.initial_abstraction();
        if p_mm <= ia {
            return 0.0;
        }
        let excess = p_mm - ia;
        excess * excess / (excess + self.retention())
    }

    /// Spread the storm's runoff depth over its blocks in proportion to rainfall.
    ///
    /// Returns a series on the same time axis whose values sum to
    /// [`ScsCurveNumber::runoff_depth`] of the storm total.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::Hydro`] only if the scaled series cannot be built.
    pub fn effective_rainfall(&self, rain: &TimeSeries) -> Result<TimeSeries, DesignError> {
        let total = rain.total();
        let runoff = self.runoff_depth(total);
        debug!(
            curve_number = self.curve_number,
            rainfall_mm = total,
            runoff_mm = runoff,
            "scs-cn losses"
        );
        if runoff == 0.0 {
            return Ok(rain.map_values(|_| 0.0)?);
        }
        Ok(rain.map_values(|d| d / total * runoff)?)
    }
}

/// Runoff volume in m³ for a depth in mm over an area in hectares.
#[must_use]
pub fn runoff_volume_m3(depth_mm: f64, area_ha: f64) -> f64 {
    depth_mm / 1000.0 * area_ha * M2_PER_HA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_curve_number() {
        for cn in [29.9, 98.5, f64::NAN] {
            assert!(matches!(
                ScsCurveNumber::new(cn),
                Err(DesignError::InvalidParameter { name: "curve_number", .. })
            ));
        }
        assert!(ScsCurveNumber::new(30.0).is_ok());
        assert!(ScsCurveNumber::new(98.0).is_ok());
    }

    #[test]
    fn cn_80_reference_values() {
        let cn = ScsCurveNumber::new(80.0).unwrap();
        assert!((cn.retention() - 63.5).abs() < 1e-12);
        assert!((cn.initial_abstraction() - 12.7).abs() < 1e-12);
        // (100 - 12.7)² / (100 - 12.7 + 63.5)
        let expected = 87.3_f64.powi(2) / 150.8;
        assert!((cn.runoff_depth(100.0) - expected).abs() < 1e-9);
        assert_eq!(cn.runoff_depth(10.0), 0.0);
    }

    #[test]
    fn effective_rainfall_is_proportional() {
        let cn = ScsCurveNumber::new(85.0).unwrap();
        let rain = TimeSeries::uniform(10.0, vec![10.0, 30.0, 20.0]).unwrap();
        let eff = cn.effective_rainfall(&rain).unwrap();
        let q = cn.runoff_depth(60.0);
        assert!((eff.total() - q).abs() < 1e-9);
        assert!((eff[1] / eff[0] - 3.0).abs() < 1e-12);
        assert_eq!(eff.times(), rain.times());
    }

    #[test]
    fn small_storm_produces_no_effective_rainfall() {
        let cn = ScsCurveNumber::new(60.0).unwrap();
        let rain = TimeSeries::uniform(10.0, vec![1.0, 2.0]).unwrap();
        assert!(cn.effective_rainfall(&rain).unwrap().values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_ia_ratio_starts_runoff_immediately() {
        let cn = ScsCurveNumber::new(80.0).unwrap().with_ia_ratio(0.0).unwrap();
        assert!(cn.runoff_depth(1.0) > 0.0);
        assert!(ScsCurveNumber::new(80.0).unwrap().with_ia_ratio(-0.1).is_err());
    }

    #[test]
    fn volume_conversion() {
        assert_eq!(runoff_volume_m3(10.0, 2.0), 200.0);
    }
}
