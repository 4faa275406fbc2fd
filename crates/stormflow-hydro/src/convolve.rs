//! Discrete convolution of effective rainfall with a unit hydrograph.

use tracing::{debug, instrument};

use crate::error::HydroError;
use crate::series::{TimeSeries, steps_match};
use crate::uh::UnitHydrograph;

/// Full discrete linear convolution of `a` and `b`.
///
/// `out[i] = Σ_k a[k] * b[i - k]`, zero-padded outside each input.
/// Output length is `a.len() + b.len() - 1`; empty if either input is empty.
#[must_use]
pub fn convolve_values(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (k, &ak) in a.iter().enumerate() {
        if ak == 0.0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            out[k + j] += ak * bj;
        }
    }
    out
}

/// Convolve an effective-rainfall series (mm per step) with a unit hydrograph
/// (m³/s per mm) to obtain the direct-runoff hydrograph in m³/s.
///
/// The output time axis starts at 0 and advances by the shared step. A
/// single-point rainfall series adopts the unit hydrograph's step.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`HydroError::NonUniformStep`] | `rainfall` is not evenly spaced |
/// | [`HydroError::StepMismatch`] | Rainfall step differs from the unit hydrograph step |
#[instrument(skip_all, fields(n_rain = rainfall.len(), n_uh = uh.len()))]
pub fn convolve(rainfall: &TimeSeries, uh: &UnitHydrograph) -> Result<TimeSeries, HydroError> {
    let step = uh.step_min();
    if rainfall.len() > 1 {
        let rain_step = rainfall.uniform_step()?;
        if !steps_match(rain_step, step) {
            return Err(HydroError::StepMismatch {
                left: rain_step,
                right: step,
            });
        }
    }
    let q = convolve_values(rainfall.values(), uh.ordinates());
    debug!(n_out = q.len(), "convolution complete");
    TimeSeries::uniform(step, q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_is_identity() {
        let rain = [5.0, 10.0, 20.0, 15.0, 5.0];
        let out = convolve_values(&rain, &[1.0, 0.0, 0.0]);
        assert_eq!(&out[..rain.len()], &rain);
        assert!(out[rain.len()..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn output_length() {
        assert_eq!(convolve_values(&[1.0; 4], &[1.0; 7]).len(), 10);
        assert!(convolve_values(&[], &[1.0]).is_empty());
    }

    #[test]
    fn small_known_product() {
        assert_eq!(convolve_values(&[1.0, 2.0], &[3.0, 4.0, 5.0]), vec![3.0, 10.0, 13.0, 10.0]);
    }

    #[test]
    fn series_time_axis_starts_at_zero() {
        let rain = TimeSeries::new(vec![30.0, 40.0], vec![1.0, 2.0]).unwrap();
        let uh = UnitHydrograph::new(10.0, vec![0.0, 1.0, 0.5]).unwrap();
        let q = convolve(&rain, &uh).unwrap();
        assert_eq!(q.times(), &[0.0, 10.0, 20.0, 30.0]);
        assert_eq!(q.values(), &[0.0, 1.0, 2.5, 1.0]);
    }

    #[test]
    fn rejects_step_mismatch() {
        let rain = TimeSeries::uniform(5.0, vec![1.0, 2.0]).unwrap();
        let uh = UnitHydrograph::new(10.0, vec![0.0, 1.0]).unwrap();
        assert!(matches!(
            convolve(&rain, &uh),
            Err(HydroError::StepMismatch { left, right }) if left == 5.0 && right == 10.0
        ));
    }

    #[test]
    fn single_rainfall_value_scales_uh() {
        let rain = TimeSeries::uniform(10.0, vec![3.0]).unwrap();
        let uh = UnitHydrograph::new(10.0, vec![0.0, 1.0, 0.5]).unwrap();
        let q = convolve(&rain, &uh).unwrap();
        assert_eq!(q.values(), &[0.0, 3.0, 1.5]);
    }
}
