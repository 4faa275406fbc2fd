//! Synthetic unit hydrographs.
//!
//! Two interchangeable generators produce a [`UnitHydrograph`]: the SCS
//! triangular method and the Nakayasu four-segment method. Both return
//! discharge in m³/s per millimetre of effective rainfall, sampled at a
//! fixed step in minutes.

mod nakayasu;
mod scs;

pub use nakayasu::{
    Nakayasu, NakayasuShape, RECOMMENDED_ALPHA, REGIME_SWITCH_KM, lag_time as nakayasu_lag_time,
};
pub use scs::ScsTriangular;

use crate::error::HydroError;
use crate::series::TimeSeries;

/// Discharge response (m³/s per mm) to one millimetre of effective rainfall.
///
/// Computed once from catchment parameters and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitHydrograph {
    series: TimeSeries,
    step_min: f64,
}

impl UnitHydrograph {
    /// Wrap a fixed-step ordinate vector. Used by the generators, which
    /// guarantee finite, non-negative ordinates.
    pub(crate) fn from_ordinates(step_min: f64, ordinates: Vec<f64>) -> Result<Self, HydroError> {
        Ok(Self {
            series: TimeSeries::uniform(step_min, ordinates)?,
            step_min,
        })
    }

    /// Build a unit hydrograph from externally supplied ordinates.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HydroError::InvalidParameter`] | `step_min <= 0` or any ordinate is negative |
    /// | [`HydroError::EmptySeries`] | `ordinates` is empty |
    /// | [`HydroError::NonFiniteValue`] | Any ordinate is NaN or infinite |
    pub fn new(step_min: f64, ordinates: Vec<f64>) -> Result<Self, HydroError> {
        if let Some(&bad) = ordinates.iter().find(|&&q| q < 0.0) {
            return Err(HydroError::InvalidParameter {
                name: "ordinates",
                value: bad,
                reason: "unit hydrograph ordinates must be >= 0",
            });
        }
        Self::from_ordinates(step_min, ordinates)
    }

    /// Return the step in minutes.
    #[must_use]
    pub fn step_min(&self) -> f64 {
        self.step_min
    }

    /// Return the underlying time series (minutes, m³/s per mm).
    #[must_use]
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Return the ordinates (m³/s per mm).
    #[must_use]
    pub fn ordinates(&self) -> &[f64] {
        self.series.values()
    }

    /// Return the number of ordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Always `false` for a constructed unit hydrograph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Return `(time_min, discharge)` of the peak ordinate.
    #[must_use]
    pub fn peak(&self) -> (f64, f64) {
        let (_, t, q) = self.series.peak();
        (t, q)
    }

    /// Discrete runoff volume per millimetre of rainfall, in m³.
    ///
    /// For the SCS method this equals `area_m2 / 1000`.
    #[must_use]
    pub fn volume_m3_per_mm(&self) -> f64 {
        self.series.total() * self.step_min * 60.0
    }

    /// Direct-runoff hydrograph for an instantaneous effective depth in mm.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidParameter`] if `depth_mm` is negative or non-finite.
    pub fn scaled(&self, depth_mm: f64) -> Result<TimeSeries, HydroError> {
        if !depth_mm.is_finite() || depth_mm < 0.0 {
            return Err(HydroError::InvalidParameter {
                name: "depth_mm",
                value: depth_mm,
                reason: "must be finite and >= 0",
            });
        }
        self.series.map_values(|q| q * depth_mm)
    }
}

/// Selects one of the interchangeable unit hydrograph generators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitHydrographMethod {
    /// SCS triangular unit hydrograph.
    ScsTriangular(ScsTriangular),
    /// Nakayasu synthetic unit hydrograph.
    Nakayasu(Nakayasu),
}

impl UnitHydrographMethod {
    /// Generate the unit hydrograph at `step_min` with the selected method.
    ///
    /// # Errors
    ///
    /// Propagates the selected generator's validation errors.
    pub fn generate(&self, step_min: f64) -> Result<UnitHydrograph, HydroError> {
        match self {
            Self::ScsTriangular(m) => m.generate(step_min),
            Self::Nakayasu(m) => m.generate(step_min),
        }
    }

    /// Short lowercase name for reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScsTriangular(_) => "scs",
            Self::Nakayasu(_) => "nakayasu",
        }
    }
}

impl From<ScsTriangular> for UnitHydrographMethod {
    fn from(m: ScsTriangular) -> Self {
        Self::ScsTriangular(m)
    }
}

impl From<Nakayasu> for UnitHydrographMethod {
    fn from(m: Nakayasu) -> Self {
        Self::Nakayasu(m)
    }
}
