use crate::models::spacecraft::SpacecraftProperties;
use serde::{Deserialize, Serialize};

/// Physical parameters consumed by the drag and radiation pressure terms.
///
/// Mass must be positive whenever either of those terms is enabled; nothing
/// here checks it and a zero mass yields non-finite accelerations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacecraftParameters {
    pub mass: f64,             // kg
    pub area: f64,             // m^2
    pub drag_coefficient: f64, // Cd
    pub reflectivity: f64,     // Cr
}

impl SpacecraftParameters {
    pub const MASS: f64 = 100.0; // kg
    pub const AREA: f64 = 1.0; // m^2
    pub const C_D: f64 = 2.2;
    pub const C_R: f64 = 1.2;

    pub fn new(mass: f64, area: f64, drag_coefficient: f64, reflectivity: f64) -> Self {
        Self {
            mass,
            area,
            drag_coefficient,
            reflectivity,
        }
    }

    /// Area-to-mass ratio in m^2/kg
    pub fn area_to_mass(&self) -> f64 {
        self.area / self.mass
    }
}

impl Default for SpacecraftParameters {
    fn default() -> Self {
        Self::new(Self::MASS, Self::AREA, Self::C_D, Self::C_R)
    }
}

impl SpacecraftProperties for SpacecraftParameters {
    fn mass(&self) -> f64 {
        self.mass
    }

    fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    fn reference_area(&self) -> f64 {
        self.area
    }

    fn reflectivity(&self) -> f64 {
        self.reflectivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_reference_spacecraft() {
        let params = SpacecraftParameters::default();
        assert_eq!(params.mass(), 100.0);
        assert_eq!(params.drag_coefficient(), 2.2);
        assert_relative_eq!(params.area_to_mass(), 0.01);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let data = "mass,area\n250.0,4.0\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let params: SpacecraftParameters = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(params.mass, 250.0);
        assert_eq!(params.area, 4.0);
        assert_eq!(params.reflectivity, SpacecraftParameters::C_R);
    }
}
