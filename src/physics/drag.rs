use super::environment::atmospheric_density;
use crate::constants::EARTH_ROTATION;
use crate::models::spacecraft::SpacecraftProperties;
use nalgebra as na;

/// Drag acceleration in km/s², opposing the velocity relative to the
/// co-rotating atmosphere. Undefined for a non-positive mass.
pub fn drag_acceleration<T: SpacecraftProperties>(
    spacecraft: &T,
    position: &na::Vector3<f64>,
    velocity: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    let rho = atmospheric_density(position);
    drag_acceleration_with_density(spacecraft, velocity - EARTH_ROTATION.cross(position), rho)
}

fn drag_acceleration_with_density<T: SpacecraftProperties>(
    spacecraft: &T,
    relative_velocity: na::Vector3<f64>,
    rho: f64,
) -> na::Vector3<f64> {
    // m/s
    let v_rel = relative_velocity * 1000.0;
    let v_mag = v_rel.magnitude();

    let accel_magnitude: f64 = -0.5
        * (spacecraft.drag_coefficient() * spacecraft.reference_area() / spacecraft.mass())
        * rho
        * v_mag.powi(2);
    v_rel.normalize() * (accel_magnitude / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::spacecraft::SpacecraftParameters;
    use crate::constants::EARTH_RAD_EQ;
    use approx::assert_relative_eq;

    #[test]
    fn drag_magnitude_from_density() {
        let sat = SpacecraftParameters::new(100.0, 2.0, 2.2, 1.2);
        let v = na::Vector3::new(0.0, 7.5, 0.0);
        let accel = drag_acceleration_with_density(&sat, v, 1e-12);
        // 0.5 * 2.2 * (2 / 100) * 1e-12 * 7500^2 m/s²
        let expected = 0.5 * 2.2 * 0.02 * 1e-12 * 7500.0_f64.powi(2) / 1000.0;
        assert_relative_eq!(accel.y, -expected, max_relative = 1e-12);
        assert_eq!(accel.x, 0.0);
    }

    #[test]
    fn drag_opposes_relative_velocity() {
        let sat = SpacecraftParameters::default();
        let r = EARTH_RAD_EQ + 300.0;
        let position = na::Vector3::new(r, 0.0, 0.0);
        let velocity = na::Vector3::new(0.0, 7.7, 0.0);
        let accel = drag_acceleration(&sat, &position, &velocity);
        assert!(accel.y < 0.0);
        assert!(accel.x.abs() < 1e-20);

        // The co-rotating atmosphere lowers the prograde relative speed.
        let still_air = drag_acceleration_with_density(
            &sat,
            velocity,
            atmospheric_density(&position),
        );
        assert!(accel.magnitude() < still_air.magnitude());
    }

    #[test]
    fn drag_vanishes_above_atmosphere() {
        let sat = SpacecraftParameters::default();
        let position = na::Vector3::new(0.0, 0.0, EARTH_RAD_EQ + 2000.0);
        let accel = drag_acceleration(&sat, &position, &na::Vector3::new(6.9, 0.0, 0.0));
        assert_eq!(accel, na::Vector3::zeros());
    }
}
