use super::ephemeris::{moon_position, sun_position};
use crate::constants::{MOON_MU, SUN_MU};
use hifitime::Epoch;
use nalgebra as na;

/// Differential attraction of a perturbing body at `body_position` on a
/// satellite at `position`, relative to the Earth. km/s².
pub fn third_body_acceleration(
    mu: f64,
    body_position: &na::Vector3<f64>,
    position: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    let relative = body_position - position;
    let direct = relative / relative.magnitude().powi(3);
    let indirect = body_position / body_position.magnitude().powi(3);
    (direct - indirect) * mu
}

pub fn sun_gravity(epoch: &Epoch, position: &na::Vector3<f64>) -> na::Vector3<f64> {
    third_body_acceleration(SUN_MU, &sun_position(epoch), position)
}

pub fn moon_gravity(epoch: &Epoch, position: &na::Vector3<f64>) -> na::Vector3<f64> {
    third_body_acceleration(MOON_MU, &moon_position(epoch), position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn vanishes_at_earth_center() {
        let body = na::Vector3::new(384_400.0, 0.0, 0.0);
        let accel = third_body_acceleration(MOON_MU, &body, &na::Vector3::zeros());
        assert_abs_diff_eq!(accel, na::Vector3::zeros(), epsilon = 1e-20);
    }

    #[test]
    fn tidal_stretch_along_body_line() {
        let d: f64 = 384_400.0;
        let r: f64 = 7000.0;
        let body = na::Vector3::new(d, 0.0, 0.0);
        let near = third_body_acceleration(MOON_MU, &body, &na::Vector3::new(r, 0.0, 0.0));
        let far = third_body_acceleration(MOON_MU, &body, &na::Vector3::new(-r, 0.0, 0.0));
        // Both sides are pulled away from the Earth, approximately 2 mu r / d³.
        assert!(near.x > 0.0 && far.x < 0.0);
        assert_relative_eq!(near.x, 2.0 * MOON_MU * r / d.powi(3), max_relative = 0.05);
    }

    #[test]
    fn moon_dominates_sun_in_leo() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        let position = na::Vector3::new(-1117.913276, 73.093299, -7000.018272);
        let moon = moon_gravity(&epoch, &position).magnitude();
        let sun = sun_gravity(&epoch, &position).magnitude();
        assert!(moon > sun);
        assert!(moon < 1e-8 && sun > 1e-14);
    }
}
