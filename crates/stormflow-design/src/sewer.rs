//! Storm sewer sizing: Rational method and Manning full-pipe capacity.

use std::f64::consts::PI;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{DesignError, require_non_negative, require_positive};

/// Unit conversion in `Q = 0.00278 C I A` (I in mm/hr, A in ha, Q in m³/s).
pub const RATIONAL_FACTOR: f64 = 0.00278;

/// Smallest trial diameter, m.
pub const MIN_DIAMETER_M: f64 = 0.3;
/// Largest trial diameter, m.
pub const MAX_DIAMETER_M: f64 = 3.0;
/// Trial increment, m.
pub const DIAMETER_STEP_M: f64 = 0.05;

/// Peak discharge `Q = 0.00278 C I A` in m³/s.
///
/// # Errors
///
/// Returns [`DesignError::InvalidParameter`] if `c` is outside `(0, 1]`
/// or intensity or area is negative.
pub fn rational_discharge(c: f64, intensity_mm_hr: f64, area_ha: f64) -> Result<f64, DesignError> {
    if !(c > 0.0 && c <= 1.0) {
        return Err(DesignError::InvalidParameter {
            name: "runoff_coefficient",
            value: c,
            reason: "must be in (0, 1]",
        });
    }
    require_non_negative("intensity_mm_hr", intensity_mm_hr)?;
    require_non_negative("area_ha", area_ha)?;
    Ok(RATIONAL_FACTOR * c * intensity_mm_hr * area_ha)
}

/// Full-bore flow in a circular pipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipeFlow {
    pub diameter_m: f64,
    /// m³/s
    pub discharge: f64,
    /// m/s
    pub velocity: f64,
}

/// Manning full-pipe flow: `V = (1/n) (D/4)^(2/3) S^0.5`, `Q = V π D² / 4`.
///
/// # Errors
///
/// Returns [`DesignError::InvalidParameter`] if diameter, slope, or roughness is not positive.
pub fn manning_full_pipe(diameter_m: f64, slope: f64, roughness: f64) -> Result<PipeFlow, DesignError> {
    let d = require_positive("diameter_m", diameter_m)?;
    let s = require_positive("slope", slope)?;
    let n = require_positive("manning_n", roughness)?;
    let velocity = (d / 4.0).powf(2.0 / 3.0) * s.sqrt() / n;
    Ok(PipeFlow {
        diameter_m: d,
        discharge: velocity * PI * d * d / 4.0,
        velocity,
    })
}

/// Outcome of comparing a design flow with a pipe's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityCheck {
    pub design_flow: f64,
    pub pipe_capacity: f64,
    pub adequate: bool,
}

#[must_use]
pub fn check_capacity(design_flow: f64, pipe_capacity: f64) -> CapacityCheck {
    CapacityCheck {
        design_flow,
        pipe_capacity,
        adequate: pipe_capacity >= design_flow,
    }
}

/// Smallest standard diameter (0.3 m to 3.0 m in 0.05 m steps) whose full-bore capacity
/// carries `design_flow`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DesignError::InvalidParameter`] | Negative design flow, or slope / roughness not positive |
/// | [`DesignError::NoAdequateDiameter`] | Even 3.0 m is too small |
#[instrument]
pub fn min_diameter(design_flow: f64, slope: f64, roughness: f64) -> Result<PipeFlow, DesignError> {
    require_non_negative("design_flow", design_flow)?;
    let trials = ((MAX_DIAMETER_M - MIN_DIAMETER_M) / DIAMETER_STEP_M).round() as usize;
    for i in 0..=trials {
        let d = MIN_DIAMETER_M + i as f64 * DIAMETER_STEP_M;
        let flow = manning_full_pipe(d, slope, roughness)?;
        if flow.discharge >= design_flow {
            debug!(diameter_m = d, capacity = flow.discharge, "pipe sized");
            return Ok(flow);
        }
    }
    Err(DesignError::NoAdequateDiameter {
        design_flow,
        max_diameter_m: MAX_DIAMETER_M,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_rejects_bad_coefficient() {
        for c in [0.0, 1.2, f64::NAN] {
            assert!(matches!(
                rational_discharge(c, 100.0, 10.0),
                Err(DesignError::InvalidParameter { name: "runoff_coefficient", .. })
            ));
        }
        assert!((rational_discharge(1.0, 100.0, 10.0).unwrap() - 2.78).abs() < 1e-12);
    }

    #[test]
    fn manning_full_pipe_reference() {
        // D = 4 m gives hydraulic radius 1, so V = sqrt(S) / n.
        let flow = manning_full_pipe(4.0, 0.0004, 0.02).unwrap();
        assert!((flow.velocity - 1.0).abs() < 1e-12);
        assert!((flow.discharge - 4.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn min_diameter_is_smallest_adequate() {
        let sized = min_diameter(0.5, 0.005, 0.013).unwrap();
        assert!(sized.discharge >= 0.5);
        let smaller = manning_full_pipe(sized.diameter_m - DIAMETER_STEP_M, 0.005, 0.013).unwrap();
        assert!(smaller.discharge < 0.5);
    }

    #[test]
    fn tiny_flow_takes_minimum_diameter() {
        assert_eq!(min_diameter(0.0, 0.01, 0.013).unwrap().diameter_m, MIN_DIAMETER_M);
    }

    #[test]
    fn oversized_flow_fails() {
        assert!(matches!(
            min_diameter(500.0, 0.001, 0.013),
            Err(DesignError::NoAdequateDiameter { .. })
        ));
    }

    #[test]
    fn capacity_check_flags_undersized() {
        assert!(check_capacity(1.0, 1.5).adequate);
        assert!(!check_capacity(2.0, 1.5).adequate);
    }
}
