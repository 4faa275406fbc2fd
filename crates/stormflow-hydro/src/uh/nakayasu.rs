//! Nakayasu synthetic unit hydrograph.

use std::ops::RangeInclusive;

use tracing::{debug, instrument, warn};

use super::UnitHydrograph;
use crate::catchment::CatchmentParameters;
use crate::error::{HydroError, require_positive};

/// Reach length (km) at which the lag-time formula switches regime.
pub const REGIME_SWITCH_KM: f64 = 15.0;

/// Commonly recommended range for the recession shape parameter.
pub const RECOMMENDED_ALPHA: RangeInclusive<f64> = 1.5..=3.0;

/// Number of `t03` periods simulated after the peak.
const RECESSION_SPAN: f64 = 10.0;

/// Derived time parameters of a Nakayasu hydrograph. Times in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NakayasuShape {
    /// Lag time `tg`.
    pub lag_time: f64,
    /// Effective rainfall duration `tr`.
    pub rain_duration: f64,
    /// Time to peak `tp = tg + 0.8 tr`.
    pub time_to_peak: f64,
    /// Time from peak to 30 % of peak, `t03 = alpha * tg`.
    pub t03: f64,
    /// Peak discharge per millimetre of rainfall, m³/s.
    pub peak_discharge: f64,
}

impl NakayasuShape {
    /// End of the simulated curve, `tp + 10 * t03`, in hours.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.time_to_peak + RECESSION_SPAN * self.t03
    }

    /// Discharge per mm at `t` hours on the four-segment curve, clamped to >= 0.
    #[must_use]
    pub fn discharge_at(&self, t: f64) -> f64 {
        let tp = self.time_to_peak;
        let t03 = self.t03;
        let qp = self.peak_discharge;
        let q = if t <= tp {
            qp * (t / tp).powf(2.4)
        } else if t <= tp + t03 {
            qp * 0.3_f64.powf((t - tp) / t03)
        } else if t <= tp + 2.5 * t03 {
            qp * 0.3_f64.powf((t - tp + 0.5 * t03) / (1.5 * t03))
        } else {
            qp * 0.3_f64.powf((t - tp + 1.5 * t03) / (2.0 * t03))
        };
        q.max(0.0)
    }
}

/// Empirical lag time (hours) for a main reach of `reach_length_km`.
///
/// `0.21 L^0.7` below 15 km, `0.4 + 0.058 L` from 15 km. The two branches do
/// not meet at the switch; the jump is part of the published method.
#[must_use]
pub fn lag_time(reach_length_km: f64) -> f64 {
    if reach_length_km < REGIME_SWITCH_KM {
        0.21 * reach_length_km.powf(0.7)
    } else {
        0.4 + 0.058 * reach_length_km
    }
}

/// Nakayasu synthetic unit hydrograph generator.
///
/// Construct via [`Nakayasu::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter       | Default                        |
/// |-----------------|--------------------------------|
/// | `alpha`         | 2.0                            |
/// | `lag_time`      | derived from reach length      |
/// | `rain_duration` | `0.75 * lag_time`              |
/// | `strict_alpha`  | `false`                        |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nakayasu {
    catchment: CatchmentParameters,
    reach_length_km: f64,
    alpha: f64,
    strict_alpha: bool,
    lag_time: Option<f64>,
    rain_duration: Option<f64>,
}

impl Nakayasu {
    /// Create a generator for a catchment of `area_ha` hectares with a main
    /// reach of `reach_length_km` kilometres.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidParameter`] if either value is not finite and positive.
    pub fn new(area_ha: f64, reach_length_km: f64) -> Result<Self, HydroError> {
        let catchment = CatchmentParameters::new(area_ha)?.with_reach_length(reach_length_km)?;
        Ok(Self {
            catchment,
            reach_length_km,
            alpha: 2.0,
            strict_alpha: false,
            lag_time: None,
            rain_duration: None,
        })
    }

    /// Set the recession shape parameter. Validated in [`Nakayasu::shape`].
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Reject an `alpha` outside [`RECOMMENDED_ALPHA`] instead of only logging a warning.
    #[must_use]
    pub fn with_strict_alpha(mut self, strict: bool) -> Self {
        self.strict_alpha = strict;
        self
    }

    /// Use an explicit lag time in hours instead of the reach-length formula.
    #[must_use]
    pub fn with_lag_time(mut self, hours: f64) -> Self {
        self.lag_time = Some(hours);
        self
    }

    /// Use an explicit effective rainfall duration in hours.
    #[must_use]
    pub fn with_rain_duration(mut self, hours: f64) -> Self {
        self.rain_duration = Some(hours);
        self
    }

    /// Return the shape parameter.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Return the catchment description.
    #[must_use]
    pub fn catchment(&self) -> &CatchmentParameters {
        &self.catchment
    }

    /// Derive the time parameters and unit peak discharge.
    ///
    /// Any positive `alpha` gives a well-formed curve, so by default an
    /// `alpha` outside [`RECOMMENDED_ALPHA`] is only logged. Calibrated
    /// catchments do fall outside that range. Design runs enable
    /// [`with_strict_alpha`](Nakayasu::with_strict_alpha) to reject it.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`HydroError::InvalidParameter`] | `alpha`, an explicit lag time, or an explicit rain duration is not finite and positive |
    /// | [`HydroError::InvalidParameter`] | Strict mode and `alpha` outside [`RECOMMENDED_ALPHA`] |
    pub fn shape(&self) -> Result<NakayasuShape, HydroError> {
        let alpha = require_positive("alpha", self.alpha)?;
        if !RECOMMENDED_ALPHA.contains(&alpha) {
            if self.strict_alpha {
                return Err(HydroError::InvalidParameter {
                    name: "alpha",
                    value: alpha,
                    reason: "must lie within 1.5..=3.0",
                });
            }
            warn!(alpha, "alpha outside the recommended 1.5..=3.0 range");
        }
        let tg = match self.lag_time {
            Some(tg) => require_positive("lag_time", tg)?,
            None => lag_time(self.reach_length_km),
        };
        let tr = match self.rain_duration {
            Some(tr) => require_positive("rain_duration", tr)?,
            None => 0.75 * tg,
        };
        let tp = tg + 0.8 * tr;
        let t03 = alpha * tg;
        let qp = self.catchment.area_km2() / (3.6 * (0.3 * tp + t03));
        Ok(NakayasuShape {
            lag_time: tg,
            rain_duration: tr,
            time_to_peak: tp,
            t03,
            peak_discharge: qp,
        })
    }

    /// Generate the unit hydrograph (m³/s per mm) sampled every `step_min`
    /// minutes from 0 up to, but excluding, `tp + 10 * t03`.
    ///
    /// # Errors
    ///
    /// Same as [`Nakayasu::shape`], plus [`HydroError::InvalidParameter`] if
    /// `step_min` is not finite and positive.
    #[instrument(skip(self), fields(area_ha = self.catchment.area_ha(), reach_km = self.reach_length_km))]
    pub fn generate(&self, step_min: f64) -> Result<UnitHydrograph, HydroError> {
        let dt = require_positive("step_min", step_min)?;
        let shape = self.shape()?;
        let end_min = shape.end_time() * 60.0;
        let n = (end_min / dt).ceil().max(1.0) as usize;

        let ordinates: Vec<f64> = (0..n)
            .map(|k| shape.discharge_at(k as f64 * dt / 60.0))
            .collect();
        debug!(
            tg = shape.lag_time,
            tp = shape.time_to_peak,
            qp = shape.peak_discharge,
            n,
            "Nakayasu unit hydrograph generated"
        );
        UnitHydrograph::from_ordinates(dt, ordinates)
    }
}
