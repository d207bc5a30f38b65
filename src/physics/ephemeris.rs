//! Low-precision analytic Sun and Moon positions (Vallado, "Fundamentals of
//! Astrodynamics and Applications", algorithms 29 and 31). Both series run on
//! TT and produce mean-of-date coordinates, which are rotated back to J2000
//! with the IAU-76 precession. Results are geocentric, in km. Accuracy is
//! roughly 0.01 deg for the Sun and 0.3 deg for the Moon.

use crate::constants::{ASTRONOMICAL_UNIT, DAYS_PER_CENTURY, EARTH_RAD_EQ, J2000_JD};
use crate::coordinates::coordinate_transformation::precession_matrix;
use hifitime::Epoch;
use nalgebra as na;

fn julian_centuries(epoch: &Epoch) -> f64 {
    (epoch.to_jde_tt_days() - J2000_JD) / DAYS_PER_CENTURY
}

fn mean_of_date_to_j2000(epoch: &Epoch, position: na::Vector3<f64>) -> na::Vector3<f64> {
    precession_matrix(epoch).inverse() * position
}

/// Mean obliquity of the ecliptic, radians
fn obliquity(t: f64) -> f64 {
    (23.439291 - 0.0130042 * t).to_radians()
}

/// Sun position in km.
pub fn sun_position(epoch: &Epoch) -> na::Vector3<f64> {
    let t = julian_centuries(epoch);

    let mean_lon = 280.460 + 36000.771 * t;
    let mean_anomaly = (357.5291092 + 35999.05034 * t).to_radians();
    let ecl_lon = (mean_lon
        + 1.914666471 * mean_anomaly.sin()
        + 0.019994643 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let distance = (1.000140612
        - 0.016708617 * mean_anomaly.cos()
        - 0.000139589 * (2.0 * mean_anomaly).cos())
        * ASTRONOMICAL_UNIT;
    let eps = obliquity(t);

    let mean_of_date = na::Vector3::new(
        distance * ecl_lon.cos(),
        distance * eps.cos() * ecl_lon.sin(),
        distance * eps.sin() * ecl_lon.sin(),
    );
    mean_of_date_to_j2000(epoch, mean_of_date)
}

/// Moon position in km.
pub fn moon_position(epoch: &Epoch) -> na::Vector3<f64> {
    let t = julian_centuries(epoch);
    let deg_sin = |x: f64| x.to_radians().sin();
    let deg_cos = |x: f64| x.to_radians().cos();

    let ecl_lon = 218.32 + 481267.8813 * t
        + 6.29 * deg_sin(134.9 + 477198.85 * t)
        - 1.27 * deg_sin(259.2 - 413335.38 * t)
        + 0.66 * deg_sin(235.7 + 890534.23 * t)
        + 0.21 * deg_sin(269.9 + 954397.70 * t)
        - 0.19 * deg_sin(357.5 + 35999.05 * t)
        - 0.11 * deg_sin(186.6 + 966404.05 * t);
    let ecl_lat = 5.13 * deg_sin(93.3 + 483202.03 * t)
        + 0.28 * deg_sin(228.2 + 960400.87 * t)
        - 0.28 * deg_sin(318.3 + 6003.18 * t)
        - 0.17 * deg_sin(217.6 - 407332.20 * t);
    let parallax = 0.9508
        + 0.0518 * deg_cos(134.9 + 477198.85 * t)
        + 0.0095 * deg_cos(259.2 - 413335.38 * t)
        + 0.0078 * deg_cos(235.7 + 890534.23 * t)
        + 0.0028 * deg_cos(269.9 + 954397.70 * t);

    let (lon, lat) = (ecl_lon.to_radians(), ecl_lat.to_radians());
    let distance = EARTH_RAD_EQ / parallax.to_radians().sin();
    let eps = obliquity(t);

    let mean_of_date = na::Vector3::new(
        distance * lat.cos() * lon.cos(),
        distance * (eps.cos() * lat.cos() * lon.sin() - eps.sin() * lat.sin()),
        distance * (eps.sin() * lat.cos() * lon.sin() + eps.cos() * lat.sin()),
    );
    mean_of_date_to_j2000(epoch, mean_of_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn sun_distance_is_about_one_au() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        let r = sun_position(&epoch).magnitude();
        assert_relative_eq!(r, ASTRONOMICAL_UNIT, max_relative = 0.02);
    }

    #[test]
    fn sun_near_winter_solstice() {
        // Around the December solstice the Sun sits at -23.4 deg declination
        // and close to 270 deg right ascension.
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        let sun = sun_position(&epoch).normalize();
        let declination = sun.z.asin().to_degrees();
        let right_ascension = sun.y.atan2(sun.x).to_degrees();
        assert!((declination + 23.43).abs() < 0.1);
        assert!((right_ascension + 90.0).abs() < 2.0);
    }

    #[test]
    fn solstice_sun_is_precessed_to_j2000() {
        // 2018 December solstice at 22:23 UTC: right ascension of date is
        // 270 deg, which precession puts near 269.716 deg in J2000.
        let epoch = Epoch::from_gregorian_utc(2018, 12, 21, 22, 23, 0, 0);
        let sun = sun_position(&epoch).normalize();
        let right_ascension = sun.y.atan2(sun.x).to_degrees().rem_euclid(360.0);
        assert_abs_diff_eq!(right_ascension, 269.716, epsilon = 0.02);

        let of_date = precession_matrix(&epoch) * sun;
        let ra_of_date = of_date.y.atan2(of_date.x).to_degrees().rem_euclid(360.0);
        assert_abs_diff_eq!(ra_of_date, 270.0, epsilon = 0.02);
    }

    #[test]
    fn series_are_driven_by_terrestrial_time() {
        // TT runs 69.184 s ahead of UTC in 2018
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        let t = julian_centuries(&epoch);
        let expected_days = epoch.to_jde_utc_days() + 69.184 / 86400.0 - J2000_JD;
        assert_relative_eq!(t * DAYS_PER_CENTURY, expected_days, max_relative = 1e-12);
    }

    #[test]
    fn moon_distance_within_orbit_bounds() {
        for day in 1..=28 {
            let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, day);
            let r = moon_position(&epoch).magnitude();
            assert!(r > 356_000.0 && r < 407_000.0, "moon distance {}", r);
        }
    }
}
