//! SCS triangular unit hydrograph.

use tracing::{debug, instrument};

use super::UnitHydrograph;
use crate::catchment::CatchmentParameters;
use crate::error::{HydroError, require_positive};

/// Ratio of time to peak over time of concentration.
const PEAK_RATIO: f64 = 0.6;

/// Ratio of base time over time to peak.
const BASE_RATIO: f64 = 2.67;

/// Guards `ceil` against floating noise when `base_time` is a whole number of steps.
const STEP_EPS: f64 = 1e-9;

/// SCS triangular unit hydrograph generator.
///
/// `time_to_peak = 0.6 * tc`, `base_time = 2.67 * time_to_peak`. The
/// triangle is sampled on `[0, base_time]`, normalized to a unit sum, and
/// converted to m³/s per mm using the catchment area and step length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScsTriangular {
    tc_min: f64,
    catchment: CatchmentParameters,
}

impl ScsTriangular {
    /// Create a generator for time of concentration `tc_min` (minutes) and
    /// contributing area `area_ha` (hectares).
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidParameter`] if `tc_min` or `area_ha` is
    /// not finite and positive (a non-positive time to peak).
    pub fn new(tc_min: f64, area_ha: f64) -> Result<Self, HydroError> {
        Ok(Self {
            tc_min: require_positive("tc_min", tc_min)?,
            catchment: CatchmentParameters::new(area_ha)?,
        })
    }

    /// Create a generator from an existing catchment description.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidParameter`] if `tc_min` is not finite and positive.
    pub fn with_catchment(tc_min: f64, catchment: CatchmentParameters) -> Result<Self, HydroError> {
        Ok(Self {
            tc_min: require_positive("tc_min", tc_min)?,
            catchment,
        })
    }

    /// Return the time of concentration in minutes.
    #[must_use]
    pub fn tc_min(&self) -> f64 {
        self.tc_min
    }

    /// Return the time to peak in minutes.
    #[must_use]
    pub fn time_to_peak(&self) -> f64 {
        PEAK_RATIO * self.tc_min
    }

    /// Return the base time in minutes.
    #[must_use]
    pub fn base_time(&self) -> f64 {
        BASE_RATIO * self.time_to_peak()
    }

    /// Return the catchment description.
    #[must_use]
    pub fn catchment(&self) -> &CatchmentParameters {
        &self.catchment
    }

    /// Dimensionless ordinates at `step_min`, normalized so they sum to 1.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HydroError::InvalidParameter`] | `step_min` not positive, or so coarse that every sample misses the triangle |
    pub fn ordinates(&self, step_min: f64) -> Result<Vec<f64>, HydroError> {
        let dt = require_positive("step_min", step_min)?;
        let tp = self.time_to_peak();
        let tb = self.base_time();
        let n_steps = (tb / dt - STEP_EPS).ceil().max(1.0) as usize;

        let mut ordinates: Vec<f64> = (0..=n_steps)
            .map(|k| {
                let t = k as f64 * dt;
                if t <= tp {
                    t / tp
                } else if t <= tb {
                    (tb - t) / (tb - tp)
                } else {
                    0.0
                }
            })
            .collect();

        let sum: f64 = ordinates.iter().sum();
        if sum <= 0.0 {
            return Err(HydroError::InvalidParameter {
                name: "step_min",
                value: step_min,
                reason: "step exceeds the unit hydrograph base time",
            });
        }
        for o in &mut ordinates {
            *o /= sum;
        }
        Ok(ordinates)
    }

    /// Generate the unit hydrograph (m³/s per mm) at `step_min`.
    ///
    /// # Errors
    ///
    /// Same as [`ScsTriangular::ordinates`].
    #[instrument(skip(self), fields(tc_min = self.tc_min, area_ha = self.catchment.area_ha()))]
    pub fn generate(&self, step_min: f64) -> Result<UnitHydrograph, HydroError> {
        let ordinates = self.ordinates(step_min)?;
        let scale = self.catchment.area_m2() / 1000.0 / (step_min * 60.0);
        let discharge: Vec<f64> = ordinates.into_iter().map(|o| o * scale).collect();
        debug!(
            time_to_peak = self.time_to_peak(),
            base_time = self.base_time(),
            n = discharge.len(),
            "SCS unit hydrograph generated"
        );
        UnitHydrograph::from_ordinates(step_min, discharge)
    }
}
