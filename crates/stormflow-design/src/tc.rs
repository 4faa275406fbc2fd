//! Time of concentration formulas. All results are in minutes.

use serde::Serialize;
use tracing::debug;

use crate::error::{DesignError, require_non_negative, require_positive};

/// Two-year, 24-hour rainfall used by the TR-55 sheet-flow equation, mm.
pub const TR55_P2_MM: f64 = 50.0;

/// Runoff coefficient assumed by the FAA formula for paved surfaces.
pub const FAA_RUNOFF_COEFFICIENT: f64 = 0.9;

fn slope(value: f64) -> Result<f64, DesignError> {
    require_positive("slope", value)
}

/// Kirpich: `0.01947 L^0.77 S^-0.385`, L in metres, S in m/m.
///
/// # Errors
///
/// Returns [`DesignError::InvalidParameter`] if `length_m <= 0` or `slope <= 0`.
pub fn kirpich(length_m: f64, slope_m_m: f64) -> Result<f64, DesignError> {
    let l = require_positive("length_m", length_m)?;
    let s = slope(slope_m_m)?;
    Ok(0.01947 * l.powf(0.77) * s.powf(-0.385))
}

/// Kerby overland flow: `0.828 (L n)^0.467 / S^0.235`.
///
/// # Errors
///
/// Returns [`DesignError::InvalidParameter`] if length, roughness, or slope is not positive.
pub fn kerby(length_m: f64, roughness: f64, slope_m_m: f64) -> Result<f64, DesignError> {
    let l = require_positive("length_m", length_m)?;
    let n = require_positive("roughness", roughness)?;
    let s = slope(slope_m_m)?;
    Ok(0.828 * (l * n).powf(0.467) / s.powf(0.235))
}

/// TR-55 sheet flow plus channel travel.
///
/// Sheet flow `0.007 (n L)^0.8 / (P2^0.5 S^0.4)` with `P2 = 50` mm, then
/// `L_channel / V_channel / 60` for the channel reach.
///
/// # Errors
///
/// Returns [`DesignError::InvalidParameter`] if the sheet slope or channel velocity
/// is not positive, or a length or roughness is negative.
pub fn tr55(
    sheet_length_m: f64,
    sheet_roughness: f64,
    sheet_slope: f64,
    channel_length_m: f64,
    channel_velocity_m_s: f64,
) -> Result<f64, DesignError> {
    let l = require_non_negative("sheet_length_m", sheet_length_m)?;
    let n = require_non_negative("sheet_roughness", sheet_roughness)?;
    let s = slope(sheet_slope)?;
    let lc = require_non_negative("channel_length_m", channel_length_m)?;
    let v = require_positive("channel_velocity", channel_velocity_m_s)?;
    let sheet = 0.007 * (n * l).powf(0.8) / (TR55_P2_MM.sqrt() * s.powf(0.4));
    let channel = lc / v / 60.0;
    debug!(sheet, channel, "tr-55 travel times");
    Ok(sheet + channel)
}

/// FAA: `1.8 (1.1 - C) L^0.5 / S^0.333` with `C = 0.9`.
///
/// # Errors
///
/// Returns [`DesignError::InvalidParameter`] if `length_m <= 0` or `slope <= 0`.
pub fn faa(length_m: f64, slope_m_m: f64) -> Result<f64, DesignError> {
    let l = require_positive("length_m", length_m)?;
    let s = slope(slope_m_m)?;
    Ok(1.8 * (1.1 - FAA_RUNOFF_COEFFICIENT) * l.sqrt() / s.powf(0.333))
}

/// Flow-path description. Each formula runs only when its inputs are present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowPath {
    pub length_m: f64,
    pub slope: f64,
    /// Kerby / TR-55 sheet roughness.
    pub roughness: Option<f64>,
    /// TR-55 channel reach as `(length_m, velocity_m_s)`.
    pub channel: Option<(f64, f64)>,
}

/// Results of every applicable method, minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TcSummary {
    pub kirpich: f64,
    pub faa: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kerby: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tr55: Option<f64>,
}

impl FlowPath {
    /// Evaluate every method the path has inputs for.
    ///
    /// # Errors
    ///
    /// Propagates the first formula's [`DesignError::InvalidParameter`].
    pub fn summary(&self) -> Result<TcSummary, DesignError> {
        let kerby = self
            .roughness
            .map(|n| kerby(self.length_m, n, self.slope))
            .transpose()?;
        let tr55 = match (self.roughness, self.channel) {
            (Some(n), Some((lc, v))) => Some(tr55(self.length_m, n, self.slope, lc, v)?),
            _ => None,
        };
        Ok(TcSummary {
            kirpich: kirpich(self.length_m, self.slope)?,
            faa: faa(self.length_m, self.slope)?,
            kerby,
            tr55,
        })
    }
}
