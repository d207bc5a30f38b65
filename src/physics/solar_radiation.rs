use super::ephemeris::sun_position;
use crate::constants::{ASTRONOMICAL_UNIT, EARTH_RAD_EQ, SOLAR_FLUX, SPEED_OF_LIGHT};
use crate::models::spacecraft::SpacecraftProperties;
use hifitime::Epoch;
use nalgebra as na;

/// Binary shadow factor: 1.0 when the satellite sees the Sun, 0.0 when the
/// Earth blocks the line of sight. The Earth is a sphere of equatorial radius;
/// a grazing line of sight counts as illuminated.
pub fn shadow_factor(r_sat: &na::Vector3<f64>, r_sun: &na::Vector3<f64>) -> f64 {
    let sat2 = r_sat.magnitude_squared();
    let sat_dot_sun = r_sat.dot(r_sun);

    // Parameter of the closest approach to the origin along sat -> sun.
    let t_min = (sat2 - sat_dot_sun) / (sat2 + r_sun.magnitude_squared() - 2.0 * sat_dot_sun);
    if !(0.0..=1.0).contains(&t_min) {
        return 1.0;
    }

    // Squared distance of the closest approach.
    let closest2 = (1.0 - t_min) * sat2 + sat_dot_sun * t_min;
    if closest2 >= EARTH_RAD_EQ.powi(2) {
        1.0
    } else {
        0.0
    }
}

/// Solar radiation pressure for a known Sun position, km/s².
pub fn radiation_acceleration<T: SpacecraftProperties>(
    spacecraft: &T,
    position: &na::Vector3<f64>,
    r_sun: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    let shadow = shadow_factor(position, r_sun);
    let from_sun = position - r_sun;
    let distance = from_sun.magnitude();

    // N/m² at the satellite's distance, times area over mass gives m/s².
    let pressure = SOLAR_FLUX / (SPEED_OF_LIGHT * 1000.0) * (ASTRONOMICAL_UNIT / distance).powi(2);
    let accel_magnitude = pressure * spacecraft.reflectivity() * spacecraft.reference_area()
        / spacecraft.mass()
        / 1000.0;

    from_sun.normalize() * (shadow * accel_magnitude)
}

pub fn solar_radiation_acceleration<T: SpacecraftProperties>(
    spacecraft: &T,
    epoch: &Epoch,
    position: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    radiation_acceleration(spacecraft, position, &sun_position(epoch))
}
