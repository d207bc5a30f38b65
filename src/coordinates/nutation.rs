//! IAU 1980 theory of nutation, with the 106-term series and the 1994
//! kinematic terms of the equation of the equinoxes.

use crate::constants::{DAYS_PER_CENTURY, J2000_JD, PI, TWO_PI};
use hifitime::Epoch;
use nalgebra as na;

const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Series coefficients are in units of 0.1 milliarcsecond.
const SERIES_TO_RAD: f64 = ARCSEC_TO_RAD / 1e4;

/// Multipliers of (l, l', F, D, Ω), then the longitude sine coefficient and its
/// rate per century, then the obliquity cosine coefficient and its rate.
type NutationTerm = ([i8; 5], f64, f64, f64, f64);

#[rustfmt::skip]
const IAU80_TERMS: [NutationTerm; 106] = [
    ([ 0,  0,  0,  0,  1], -171996.0, -174.2, 92025.0, 8.9),
    ([ 0,  0,  0,  0,  2], 2062.0, 0.2, -895.0, 0.5),
    ([-2,  0,  2,  0,  1], 46.0, 0.0, -24.0, 0.0),
    ([ 2,  0, -2,  0,  0], 11.0, 0.0, 0.0, 0.0),
    ([-2,  0,  2,  0,  2], -3.0, 0.0, 1.0, 0.0),
    ([ 1, -1,  0, -1,  0], -3.0, 0.0, 0.0, 0.0),
    ([ 0, -2,  2, -2,  1], -2.0, 0.0, 1.0, 0.0),
    ([ 2,  0, -2,  0,  1], 1.0, 0.0, 0.0, 0.0),
    ([ 0,  0,  2, -2,  2], -13187.0, -1.6, 5736.0, -3.1),
    ([ 0,  1,  0,  0,  0], 1426.0, -3.4, 54.0, -0.1),
    ([ 0,  1,  2, -2,  2], -517.0, 1.2, 224.0, -0.6),
    ([ 0, -1,  2, -2,  2], 217.0, -0.5, -95.0, 0.3),
    ([ 0,  0,  2, -2,  1], 129.0, 0.1, -70.0, 0.0),
    ([ 2,  0,  0, -2,  0], 48.0, 0.0, 1.0, 0.0),
    ([ 0,  0,  2, -2,  0], -22.0, 0.0, 0.0, 0.0),
    ([ 0,  2,  0,  0,  0], 17.0, -0.1, 0.0, 0.0),
    ([ 0,  1,  0,  0,  1], -15.0, 0.0, 9.0, 0.0),
    ([ 0,  2,  2, -2,  2], -16.0, 0.1, 7.0, 0.0),
    ([ 0, -1,  0,  0,  1], -12.0, 0.0, 6.0, 0.0),
    ([-2,  0,  0,  2,  1], -6.0, 0.0, 3.0, 0.0),
    ([ 0, -1,  2, -2,  1], -5.0, 0.0, 3.0, 0.0),
    ([ 2,  0,  0, -2,  1], 4.0, 0.0, -2.0, 0.0),
    ([ 0,  1,  2, -2,  1], 4.0, 0.0, -2.0, 0.0),
    ([ 1,  0,  0, -1,  0], -4.0, 0.0, 0.0, 0.0),
    ([ 2,  1,  0, -2,  0], 1.0, 0.0, 0.0, 0.0),
    ([ 0,  0, -2,  2,  1], 1.0, 0.0, 0.0, 0.0),
    ([ 0,  1, -2,  2,  0], -1.0, 0.0, 0.0, 0.0),
    ([ 0,  1,  0,  0,  2], 1.0, 0.0, 0.0, 0.0),
    ([-1,  0,  0,  1,  1], 1.0, 0.0, 0.0, 0.0),
    ([ 0,  1,  2, -2,  0], -1.0, 0.0, 0.0, 0.0),
    ([ 0,  0,  2,  0,  2], -2274.0, -0.2, 977.0, -0.5),
    ([ 1,  0,  0,  0,  0], 712.0, 0.1, -7.0, 0.0),
    ([ 0,  0,  2,  0,  1], -386.0, -0.4, 200.0, 0.0),
    ([ 1,  0,  2,  0,  2], -301.0, 0.0, 129.0, -0.1),
    ([ 1,  0,  0, -2,  0], -158.0, 0.0, -1.0, 0.0),
    ([-1,  0,  2,  0,  2], 123.0, 0.0, -53.0, 0.0),
    ([ 0,  0,  0,  2,  0], 63.0, 0.0, -2.0, 0.0),
    ([ 1,  0,  0,  0,  1], 63.0, 0.1, -33.0, 0.0),
    ([-1,  0,  0,  0,  1], -58.0, -0.1, 32.0, 0.0),
    ([-1,  0,  2,  2,  2], -59.0, 0.0, 26.0, 0.0),
    ([ 1,  0,  2,  0,  1], -51.0, 0.0, 27.0, 0.0),
    ([ 0,  0,  2,  2,  2], -38.0, 0.0, 16.0, 0.0),
    ([ 2,  0,  0,  0,  0], 29.0, 0.0, -1.0, 0.0),
    ([ 1,  0,  2, -2,  2], 29.0, 0.0, -12.0, 0.0),
    ([ 2,  0,  2,  0,  2], -31.0, 0.0, 13.0, 0.0),
    ([ 0,  0,  2,  0,  0], 26.0, 0.0, -1.0, 0.0),
    ([-1,  0,  2,  0,  1], 21.0, 0.0, -10.0, 0.0),
    ([-1,  0,  0,  2,  1], 16.0, 0.0, -8.0, 0.0),
    ([ 1,  0,  0, -2,  1], -13.0, 0.0, 7.0, 0.0),
    ([-1,  0,  2,  2,  1], -10.0, 0.0, 5.0, 0.0),
    ([ 1,  1,  0, -2,  0], -7.0, 0.0, 0.0, 0.0),
    ([ 0,  1,  2,  0,  2], 7.0, 0.0, -3.0, 0.0),
    ([ 0, -1,  2,  0,  2], -7.0, 0.0, 3.0, 0.0),
    ([ 1,  0,  2,  2,  2], -8.0, 0.0, 3.0, 0.0),
    ([ 1,  0,  0,  2,  0], 6.0, 0.0, 0.0, 0.0),
    ([ 2,  0,  2, -2,  2], 6.0, 0.0, -3.0, 0.0),
    ([ 0,  0,  0,  2,  1], -6.0, 0.0, 3.0, 0.0),
    ([ 0,  0,  2,  2,  1], -7.0, 0.0, 3.0, 0.0),
    ([ 1,  0,  2, -2,  1], 6.0, 0.0, -3.0, 0.0),
    ([ 0,  0,  0, -2,  1], -5.0, 0.0, 3.0, 0.0),
    ([ 1, -1,  0,  0,  0], 5.0, 0.0, 0.0, 0.0),
    ([ 2,  0,  2,  0,  1], -5.0, 0.0, 3.0, 0.0),
    ([ 0,  1,  0, -2,  0], -4.0, 0.0, 0.0, 0.0),
    ([ 1,  0, -2,  0,  0], 4.0, 0.0, 0.0, 0.0),
    ([ 0,  0,  0,  1,  0], -4.0, 0.0, 0.0, 0.0),
    ([ 1,  1,  0,  0,  0], -3.0, 0.0, 0.0, 0.0),
    ([ 1,  0,  2,  0,  0], 3.0, 0.0, 0.0, 0.0),
    ([ 1, -1,  2,  0,  2], -3.0, 0.0, 1.0, 0.0),
    ([-1, -1,  2,  2,  2], -3.0, 0.0, 1.0, 0.0),
    ([-2,  0,  0,  0,  1], -2.0, 0.0, 1.0, 0.0),
    ([ 3,  0,  2,  0,  2], -3.0, 0.0, 1.0, 0.0),
    ([ 0, -1,  2,  2,  2], -3.0, 0.0, 1.0, 0.0),
    ([ 1,  1,  2,  0,  2], 2.0, 0.0, -1.0, 0.0),
    ([-1,  0,  2, -2,  1], -2.0, 0.0, 1.0, 0.0),
    ([ 2,  0,  0,  0,  1], 2.0, 0.0, -1.0, 0.0),
    ([ 1,  0,  0,  0,  2], -2.0, 0.0, 1.0, 0.0),
    ([ 3,  0,  0,  0,  0], 2.0, 0.0, 0.0, 0.0),
    ([ 0,  0,  2,  1,  2], 2.0, 0.0, -1.0, 0.0),
    ([-1,  0,  0,  0,  2], 1.0, 0.0, -1.0, 0.0),
    ([ 1,  0,  0, -4,  0], -1.0, 0.0, 0.0, 0.0),
    ([-2,  0,  2,  2,  2], 1.0, 0.0, -1.0, 0.0),
    ([-1,  0,  2,  4,  2], -2.0, 0.0, 1.0, 0.0),
    ([ 2,  0,  0, -4,  0], -1.0, 0.0, 0.0, 0.0),
    ([ 1,  1,  2, -2,  2], 1.0, 0.0, -1.0, 0.0),
    ([ 1,  0,  2,  2,  1], -1.0, 0.0, 1.0, 0.0),
    ([-2,  0,  2,  4,  2], -1.0, 0.0, 1.0, 0.0),
    ([-1,  0,  4,  0,  2], 1.0, 0.0, 0.0, 0.0),
    ([ 1, -1,  0, -2,  0], 1.0, 0.0, 0.0, 0.0),
    ([ 2,  0,  2, -2,  1], 1.0, 0.0, -1.0, 0.0),
    ([ 2,  0,  2,  2,  2], -1.0, 0.0, 0.0, 0.0),
    ([ 1,  0,  0,  2,  1], -1.0, 0.0, 0.0, 0.0),
    ([ 0,  0,  4, -2,  2], 1.0, 0.0, 0.0, 0.0),
    ([ 3,  0,  2, -2,  2], 1.0, 0.0, 0.0, 0.0),
    ([ 1,  0,  2, -2,  0], -1.0, 0.0, 0.0, 0.0),
    ([ 0,  1,  2,  0,  1], 1.0, 0.0, 0.0, 0.0),
    ([-1, -1,  0,  2,  1], 1.0, 0.0, 0.0, 0.0),
    ([ 0,  0, -2,  0,  1], -1.0, 0.0, 0.0, 0.0),
    ([ 0,  0,  2, -1,  2], -1.0, 0.0, 0.0, 0.0),
    ([ 0,  1,  0,  2,  0], -1.0, 0.0, 0.0, 0.0),
    ([ 1,  0, -2, -2,  0], -1.0, 0.0, 0.0, 0.0),
    ([ 0, -1,  2,  0,  1], -1.0, 0.0, 0.0, 0.0),
    ([ 1,  1,  0, -2,  1], -1.0, 0.0, 0.0, 0.0),
    ([ 1,  0, -2,  2,  0], -1.0, 0.0, 0.0, 0.0),
    ([ 2,  0,  0,  2,  0], 1.0, 0.0, 0.0, 0.0),
    ([ 0,  0,  2,  4,  2], -1.0, 0.0, 0.0, 0.0),
    ([ 0,  1,  0,  1,  0], 1.0, 0.0, 0.0, 0.0),
];

fn tt_centuries(epoch: &Epoch) -> f64 {
    (epoch.to_jde_tt_days() - J2000_JD) / DAYS_PER_CENTURY
}

/// Delaunay arguments (l, l', F, D, Ω) in radians.
fn fundamental_arguments(t: f64) -> [f64; 5] {
    let angle = |c0: f64, c1: f64, c2: f64, c3: f64, revolutions: f64| {
        let arcsec = c0 + (c1 + (c2 + c3 * t) * t) * t;
        (arcsec * ARCSEC_TO_RAD + (revolutions * t).rem_euclid(1.0) * TWO_PI).rem_euclid(TWO_PI)
    };

    [
        angle(485866.733, 715922.633, 31.310, 0.064, 1325.0),
        angle(1287099.804, 1292581.224, -0.577, -0.012, 99.0),
        angle(335778.877, 295263.137, -13.257, 0.011, 1342.0),
        angle(1072261.307, 1105601.328, -6.891, 0.019, 1236.0),
        angle(450160.280, -482890.539, 7.455, 0.008, -5.0),
    ]
}

/// Mean obliquity of the ecliptic (IAU-76), radians.
pub fn mean_obliquity(epoch: &Epoch) -> f64 {
    let t = tt_centuries(epoch);
    (84381.448 - 46.8150 * t - 0.00059 * t * t + 0.001813 * t * t * t) * ARCSEC_TO_RAD
}

/// Nutation in longitude, nutation in obliquity and the mean obliquity, all in
/// radians.
pub fn nutation_angles(epoch: &Epoch) -> (f64, f64, f64) {
    let t = tt_centuries(epoch);
    let args = fundamental_arguments(t);

    // Smallest terms first
    let (d_lon, d_obliq) = IAU80_TERMS.iter().rev().fold(
        (0.0, 0.0),
        |(d_lon, d_obliq), (multipliers, sin0, sin1, cos0, cos1)| {
            let arg: f64 = multipliers
                .iter()
                .zip(args.iter())
                .map(|(k, a)| f64::from(*k) * a)
                .sum();
            (
                d_lon + (sin0 + sin1 * t) * arg.sin(),
                d_obliq + (cos0 + cos1 * t) * arg.cos(),
            )
        },
    );

    (
        d_lon * SERIES_TO_RAD,
        d_obliq * SERIES_TO_RAD,
        mean_obliquity(epoch),
    )
}

/// Rotation from the mean-of-date frame to the true-of-date frame.
pub fn nutation_matrix(epoch: &Epoch) -> na::Rotation3<f64> {
    let (d_lon, d_obliq, mean_obliq) = nutation_angles(epoch);
    let obliq = mean_obliq + d_obliq;
    na::Rotation3::from_axis_angle(&na::Vector3::x_axis(), obliq)
        * na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), d_lon)
        * na::Rotation3::from_axis_angle(&na::Vector3::x_axis(), -mean_obliq)
}

/// Equation of the equinoxes (apparent minus mean sidereal time), radians.
pub fn equation_of_equinoxes(epoch: &Epoch) -> f64 {
    let (d_lon, d_obliq, mean_obliq) = nutation_angles(epoch);
    let node = fundamental_arguments(tt_centuries(epoch))[4];
    d_lon * (mean_obliq + d_obliq).cos()
        + (0.00264 * node.sin() + 0.000063 * (2.0 * node).sin()) * ARCSEC_TO_RAD
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use hifitime::Duration;

    #[test]
    fn nutation_at_mjd_53736_tt() {
        let epoch = Epoch::from_mjd_tai(53736.0) - Duration::from_seconds(32.184);
        let (d_lon, d_obliq, _) = nutation_angles(&epoch);
        assert_relative_eq!(d_lon, -0.9643658353226563966e-5, max_relative = 1e-6);
        assert_relative_eq!(d_obliq, 0.4060051006879713322e-4, max_relative = 1e-6);
    }

    #[test]
    fn vallado_example_3_15() {
        let epoch = Epoch::from_gregorian_utc(2004, 4, 6, 7, 51, 28, 386_009_000);
        let (d_lon, d_obliq, mean_obliq) = nutation_angles(&epoch);
        assert_abs_diff_eq!(d_lon.to_degrees(), -0.0034108, epsilon = 1e-7);
        assert_abs_diff_eq!(d_obliq.to_degrees(), 0.0020316, epsilon = 1e-7);
        assert_abs_diff_eq!(mean_obliq.to_degrees(), 23.4387368, epsilon = 1e-7);
    }

    #[test]
    fn nutation_stays_within_twenty_arcsec() {
        for day in 0..400 {
            let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 1, 1)
                + Duration::from_days(f64::from(day) * 17.0);
            let (d_lon, d_obliq, _) = nutation_angles(&epoch);
            assert!(d_lon.abs() < 20.0 * ARCSEC_TO_RAD);
            assert!(d_obliq.abs() < 10.0 * ARCSEC_TO_RAD);
        }
    }

    #[test]
    fn matrix_moves_pole_by_nutation() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        let (d_lon, d_obliq, mean_obliq) = nutation_angles(&epoch);
        let pole = nutation_matrix(&epoch) * na::Vector3::z();
        let expected = (d_obliq.powi(2) + (d_lon * mean_obliq.sin()).powi(2)).sqrt();
        assert_relative_eq!(pole.angle(&na::Vector3::z()), expected, max_relative = 1e-3);
    }

    #[test]
    fn equation_of_equinoxes_tracks_longitude_nutation() {
        // 2018-12-21: dpsi = -15.657", eqe = -14.363"
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        assert_abs_diff_eq!(
            equation_of_equinoxes(&epoch) / ARCSEC_TO_RAD,
            -14.363,
            epsilon = 1e-3
        );
    }
}
