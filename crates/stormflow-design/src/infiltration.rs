//! Horton infiltration losses.

use stormflow_hydro::TimeSeries;

use crate::error::{DesignError, require_non_negative};

/// Horton decay parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horton {
    /// Initial capacity f0, mm/hr.
    pub initial_rate: f64,
    /// Final capacity fc, mm/hr.
    pub final_rate: f64,
    /// Decay constant k, 1/hr.
    pub decay: f64,
}

impl Horton {
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidParameter`] if any rate is negative,
    /// or if `initial_rate < final_rate`.
    pub fn new(initial_rate: f64, final_rate: f64, decay: f64) -> Result<Self, DesignError> {
        require_non_negative("f0", initial_rate)?;
        require_non_negative("fc", final_rate)?;
        require_non_negative("k", decay)?;
        if initial_rate < final_rate {
            return Err(DesignError::InvalidParameter {
                name: "f0",
                value: initial_rate,
                reason: "must be >= fc",
            });
        }
        Ok(Self {
            initial_rate,
            final_rate,
            decay,
        })
    }

    /// Capacity `f(t) = fc + (f0 - fc) e^(-k t)` in mm/hr at `t_hr`.
    #[must_use]
    pub fn capacity(&self, t_hr: f64) -> f64 {
        self.final_rate + (self.initial_rate - self.final_rate) * (-self.decay * t_hr).exp()
    }

    /// Rainfall excess per block: depth minus the capacity at block start times the step.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::Hydro`] if `rain` does not have a uniform step of at least two points.
    pub fn excess(&self, rain: &TimeSeries) -> Result<TimeSeries, DesignError> {
        let dt_hr = rain.uniform_step()? / 60.0;
        let values = rain
            .iter()
            .map(|(t_min, depth)| (depth - self.capacity(t_min / 60.0) * dt_hr).max(0.0))
            .collect();
        Ok(TimeSeries::new(rain.times().to_vec(), values)?)
    }
}

/// Convenience wrapper around [`Horton::new`] and [`Horton::excess`].
///
/// # Errors
///
/// See [`Horton::new`] and [`Horton::excess`].
pub fn horton_excess(
    rain: &TimeSeries,
    f0: f64,
    fc: f64,
    k: f64,
) -> Result<TimeSeries, DesignError> {
    Horton::new(f0, fc, k)?.excess(rain)
}
