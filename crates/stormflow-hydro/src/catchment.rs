//! Catchment descriptors shared by the unit hydrograph generators.

use crate::error::{HydroError, require_positive};

/// Square metres per hectare.
pub const M2_PER_HA: f64 = 10_000.0;

/// Hectares per square kilometre.
pub const HA_PER_KM2: f64 = 100.0;

/// Physical description of a contributing catchment.
///
/// Immutable once built. `area_ha` is always present; the main-reach length
/// is only needed by methods that derive lag time from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchmentParameters {
    area_ha: f64,
    reach_length_km: Option<f64>,
}

impl CatchmentParameters {
    /// Create a catchment with the given contributing area in hectares.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidParameter`] if `area_ha` is not finite and positive.
    pub fn new(area_ha: f64) -> Result<Self, HydroError> {
        Ok(Self {
            area_ha: require_positive("area_ha", area_ha)?,
            reach_length_km: None,
        })
    }

    /// Attach the main-reach length in kilometres.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::InvalidParameter`] if the length is not finite and positive.
    pub fn with_reach_length(mut self, reach_length_km: f64) -> Result<Self, HydroError> {
        self.reach_length_km = Some(require_positive("reach_length_km", reach_length_km)?);
        Ok(self)
    }

    /// Return the area in hectares.
    #[must_use]
    pub fn area_ha(&self) -> f64 {
        self.area_ha
    }

    /// Return the area in square metres.
    #[must_use]
    pub fn area_m2(&self) -> f64 {
        self.area_ha * M2_PER_HA
    }

    /// Return the area in square kilometres.
    #[must_use]
    pub fn area_km2(&self) -> f64 {
        self.area_ha / HA_PER_KM2
    }

    /// Return the main-reach length in kilometres, if supplied.
    #[must_use]
    pub fn reach_length_km(&self) -> Option<f64> {
        self.reach_length_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversions() {
        let c = CatchmentParameters::new(50.0).unwrap();
        assert_eq!(c.area_m2(), 500_000.0);
        assert_eq!(c.area_km2(), 0.5);
        assert_eq!(c.reach_length_km(), None);
    }

    #[test]
    fn rejects_non_positive_area() {
        assert!(matches!(
            CatchmentParameters::new(0.0),
            Err(HydroError::InvalidParameter { name: "area_ha", .. })
        ));
    }

    #[test]
    fn rejects_non_positive_reach() {
        let c = CatchmentParameters::new(10.0).unwrap();
        assert!(matches!(
            c.with_reach_length(-2.0),
            Err(HydroError::InvalidParameter { name: "reach_length_km", .. })
        ));
    }
}
