//! Hydrograph generation and level-pool routing.
//!
//! Pure math library, zero I/O. Provides validated time series and rating
//! tables, clamped table interpolation, SCS triangular and Nakayasu
//! synthetic unit hydrographs, discrete convolution of effective rainfall
//! into a runoff hydrograph, the Santa Barbara Urban Hydrograph, and
//! Modified Puls (storage-indication) reservoir routing. Every entry point
//! is a pure function of its inputs and returns freshly allocated output.

mod catchment;
mod convolve;
mod error;
mod routing;
mod santa_barbara;
mod series;
mod table;
mod uh;

pub use catchment::{CatchmentParameters, HA_PER_KM2, M2_PER_HA};
pub use convolve::{convolve, convolve_values};
pub use error::HydroError;
pub use routing::{LevelPoolRouter, RoutingResult, RoutingState};
pub use santa_barbara::SantaBarbara;
pub use series::TimeSeries;
pub use table::{RatingTable, interpolate};
pub use uh::{
    Nakayasu, NakayasuShape, RECOMMENDED_ALPHA, REGIME_SWITCH_KM, ScsTriangular, UnitHydrograph,
    UnitHydrographMethod, nakayasu_lag_time,
};
