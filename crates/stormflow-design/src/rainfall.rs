//! Storm hyetographs: manual input and SCS design distributions.

use serde::Serialize;
use stormflow_hydro::TimeSeries;
use tracing::debug;

use crate::error::{DesignError, require_non_negative, require_positive};

/// Seven-block SCS Type II depth ratios.
pub const SCS_TYPE_II: [f64; 7] = [0.02, 0.05, 0.15, 0.30, 0.28, 0.15, 0.05];
/// Seven-block SCS Type III depth ratios.
pub const SCS_TYPE_III: [f64; 7] = [0.01, 0.03, 0.10, 0.35, 0.30, 0.15, 0.06];

/// SCS synthetic storm distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScsCurve {
    #[default]
    TypeII,
    TypeIII,
}

impl ScsCurve {
    /// Block ratios, normalised to sum to one.
    #[must_use]
    pub fn ratios(self) -> [f64; 7] {
        let raw = match self {
            Self::TypeII => SCS_TYPE_II,
            Self::TypeIII => SCS_TYPE_III,
        };
        let sum: f64 = raw.iter().sum();
        raw.map(|r| r / sum)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TypeII => "type_ii",
            Self::TypeIII => "type_iii",
        }
    }
}

/// Hyetograph from per-step depths (mm) at a fixed step in minutes.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DesignError::InvalidParameter`] | A depth is negative or non-finite |
/// | [`DesignError::Hydro`] | `depths` is empty or `step_min <= 0` |
pub fn manual_hyetograph(depths: Vec<f64>, step_min: f64) -> Result<TimeSeries, DesignError> {
    for &d in &depths {
        require_non_negative("rainfall_mm", d)?;
    }
    Ok(TimeSeries::uniform(step_min, depths)?)
}

/// Distribute `total_mm` over `duration_hr` with the seven SCS blocks.
///
/// The step is `duration_hr * 60 / 7` minutes.
///
/// # Errors
///
/// Returns [`DesignError::InvalidParameter`] if `total_mm < 0` or `duration_hr <= 0`.
pub fn scs_distribution(
    total_mm: f64,
    duration_hr: f64,
    curve: ScsCurve,
) -> Result<TimeSeries, DesignError> {
    require_non_negative("total_mm", total_mm)?;
    require_positive("duration_hr", duration_hr)?;
    let ratios = curve.ratios();
    let step_min = duration_hr * 60.0 / ratios.len() as f64;
    debug!(curve = curve.name(), total_mm, step_min, "scs design storm");
    Ok(TimeSeries::uniform(
        step_min,
        ratios.iter().map(|r| r * total_mm).collect(),
    )?)
}

/// Totals of a hyetograph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RainfallSummary {
    /// Sum of all depths, mm.
    pub total_mm: f64,
    /// Largest block depth converted to an hourly rate, mm/hr.
    pub peak_intensity_mm_hr: f64,
    /// Start time of the last block, minutes.
    pub duration_min: f64,
}

/// Summarise a uniform-step hyetograph.
///
/// The block length is the series step. A single-block storm has no step of
/// its own and uses `block_min` instead.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DesignError::InvalidParameter`] | `block_min` is not finite and positive |
/// | [`DesignError::Hydro`] | `rain` has two or more points that are not evenly spaced |
pub fn rainfall_summary(rain: &TimeSeries, block_min: f64) -> Result<RainfallSummary, DesignError> {
    let block_min = require_positive("block_min", block_min)?;
    let (_, _, peak) = rain.peak();
    let step_min = if rain.len() > 1 { rain.uniform_step()? } else { block_min };
    Ok(RainfallSummary {
        total_mm: rain.total(),
        peak_intensity_mm_hr: peak * 60.0 / step_min,
        duration_min: rain.times()[rain.len() - 1],
    })
}

/// Running total of a hyetograph, mm.
#[must_use]
pub fn cumulative(rain: &TimeSeries) -> Vec<f64> {
    rain.values()
        .iter()
        .scan(0.0, |acc, &d| {
            *acc += d;
            Some(*acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_rejects_negative_depth() {
        assert!(matches!(
            manual_hyetograph(vec![1.0, -2.0], 10.0),
            Err(DesignError::InvalidParameter { name: "rainfall_mm", .. })
        ));
        assert!(matches!(manual_hyetograph(vec![], 10.0), Err(DesignError::Hydro(_))));
    }

    #[test]
    fn scs_storm_preserves_total_depth() {
        for curve in [ScsCurve::TypeII, ScsCurve::TypeIII] {
            let storm = scs_distribution(100.0, 7.0, curve).unwrap();
            assert_eq!(storm.len(), 7);
            assert!((storm.total() - 100.0).abs() < 1e-9);
            assert_eq!(storm.uniform_step(), Ok(60.0));
        }
    }

    #[test]
    fn type_ii_peaks_in_fourth_block() {
        let storm = scs_distribution(50.0, 2.0, ScsCurve::TypeII).unwrap();
        assert_eq!(storm.peak().0, 3);
    }

    #[test]
    fn summary_reports_hourly_intensity() {
        let rain = manual_hyetograph(vec![2.0, 5.0, 3.0], 10.0).unwrap();
        // The series step wins over the fallback block length.
        let s = rainfall_summary(&rain, 60.0).unwrap();
        assert_eq!(s.total_mm, 10.0);
        assert_eq!(s.peak_intensity_mm_hr, 30.0);
        assert_eq!(s.duration_min, 20.0);
        assert_eq!(cumulative(&rain), vec![2.0, 7.0, 10.0]);
    }

    #[test]
    fn single_block_summary_uses_given_block_length() {
        let rain = manual_hyetograph(vec![6.0], 15.0).unwrap();
        let s = rainfall_summary(&rain, 15.0).unwrap();
        assert_eq!(s.peak_intensity_mm_hr, 24.0);
        assert!(matches!(
            rainfall_summary(&rain, 0.0),
            Err(DesignError::InvalidParameter { name: "block_min", .. })
        ));
    }

    #[test]
    fn summary_rejects_irregular_series() {
        let rain = TimeSeries::new(vec![0.0, 10.0, 30.0], vec![1.0, 4.0, 2.0]).unwrap();
        assert!(matches!(rainfall_summary(&rain, 10.0), Err(DesignError::Hydro(_))));
    }
}
