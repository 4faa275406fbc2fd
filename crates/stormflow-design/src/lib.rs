//! Design calculators that feed the hydrograph pipeline.
//!
//! Storm hyetographs, SCS curve number and Horton losses, rainfall
//! intensity formulas, time of concentration, and storm sewer sizing.

mod error;
mod idf;
mod infiltration;
mod rainfall;
mod scs_cn;
mod sewer;

pub mod tc;

pub use error::DesignError;
pub use idf::{IdfCurve, mononobe_intensity};
pub use infiltration::{Horton, horton_excess};
pub use rainfall::{
    RainfallSummary, SCS_TYPE_II, SCS_TYPE_III, ScsCurve, cumulative, manual_hyetograph,
    rainfall_summary, scs_distribution,
};
pub use scs_cn::{CURVE_NUMBER_RANGE, DEFAULT_IA_RATIO, ScsCurveNumber, runoff_volume_m3};
pub use sewer::{
    CapacityCheck, DIAMETER_STEP_M, MAX_DIAMETER_M, MIN_DIAMETER_M, PipeFlow, check_capacity,
    manning_full_pipe, min_diameter, rational_discharge,
};
pub use tc::{FlowPath, TcSummary};
