use crate::constants::{EARTH_MU, PI, TWO_PI};
use log::warn;
use nalgebra as na;

pub struct OrbitalMechanics;

#[allow(non_snake_case)]
impl OrbitalMechanics {
    /// Converts Cartesian state (position and velocity) to Keplerian orbital elements
    /// Returns: [a, e, i, Omega, omega, nu]
    ///   a: semi-major axis [km]
    ///   e: eccentricity [-]
    ///   i: inclination [rad]
    ///   Omega: right ascension of ascending node [rad]
    ///   omega: argument of perigee [rad]
    ///   nu: true anomaly [rad]
    ///
    /// Angles come from arccos and are moved to the other half plane by sign
    /// tests on the node vector, the eccentricity vector and the radial
    /// velocity. Circular and equatorial orbits are singular here.
    pub fn cartesian_to_keplerian(r: &na::Vector3<f64>, v: &na::Vector3<f64>) -> na::Vector6<f64> {
        let mu = EARTH_MU;
        let mut elements = na::Vector6::zeros();

        let r_mag = r.magnitude();
        let v_mag = v.magnitude();

        // Semi-major axis
        let specific_energy = v_mag * v_mag / 2.0 - mu / r_mag;
        elements[0] = -mu / (2.0 * specific_energy);

        // Eccentricity vector
        let e_vec = ((v_mag * v_mag - mu / r_mag) * r - r.dot(v) * v) / mu;
        let e = e_vec.magnitude();
        elements[1] = e;

        // Angular momentum and node vectors
        let h = r.cross(v);
        let n = na::Vector3::z().cross(&h);
        let n_mag = n.magnitude();

        // Inclination
        elements[2] = clamped_acos(h.z / h.magnitude());

        // Right ascension of ascending node
        let mut raan = clamped_acos(n.x / n_mag);
        if n.y < 0.0 {
            raan = TWO_PI - raan;
        }
        elements[3] = raan;

        // Argument of perigee
        let mut omega = clamped_acos(n.dot(&e_vec) / (n_mag * e));
        if e_vec.z < 0.0 {
            omega = TWO_PI - omega;
        }
        elements[4] = omega;

        // True anomaly
        let mut nu = clamped_acos(e_vec.dot(r) / (e * r_mag));
        if r.dot(v) < 0.0 {
            nu = TWO_PI - nu;
        }
        elements[5] = nu;

        elements
    }

    /// Converts Keplerian orbital elements to Cartesian state vectors
    /// Input elements: [a, e, i, Omega, omega, nu]
    /// Returns: (position, velocity) in the inertial frame [km, km/s]
    pub fn keplerian_to_cartesian(
        elements: &na::Vector6<f64>,
    ) -> (na::Vector3<f64>, na::Vector3<f64>) {
        let mu = EARTH_MU;
        let (a, e, i, omega_cap, omega, nu) = (
            elements[0],
            elements[1],
            elements[2],
            elements[3],
            elements[4],
            elements[5],
        );

        // Calculate position and velocity in orbital plane
        let p = a * (1.0 - e * e);
        let r_mag = p / (1.0 + e * nu.cos());

        // Position in orbital plane
        let r_orbital = na::Vector3::new(r_mag * nu.cos(), r_mag * nu.sin(), 0.0);

        // Velocity in orbital plane
        let v_orbital = na::Vector3::new(
            -(mu / p).sqrt() * nu.sin(),
            (mu / p).sqrt() * (e + nu.cos()),
            0.0,
        );

        // Rotation matrices
        let rot_omega = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), omega);
        let rot_i = na::Rotation3::from_axis_angle(&na::Vector3::x_axis(), i);
        let rot_omega_cap = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), omega_cap);

        // Transform to inertial frame
        let transform = rot_omega_cap * rot_i * rot_omega;
        let r_eci = transform * r_orbital;
        let v_eci = transform * v_orbital;

        (r_eci, v_eci)
    }

    pub fn compute_mean_motion(a: f64) -> f64 {
        (EARTH_MU / a.powi(3)).sqrt()
    }

    pub fn compute_orbital_period(a: f64) -> f64 {
        TWO_PI * (a.powi(3) / EARTH_MU).sqrt()
    }

    pub fn compute_circular_velocity(r: f64) -> f64 {
        (EARTH_MU / r).sqrt()
    }

    // Anomaly conversion functions
    pub fn true_to_eccentric_anomaly(nu: f64, e: f64) -> f64 {
        if e < 1e-11 {
            return nu;
        }

        let cos_nu = nu.cos();
        let mut E = ((1.0 - e * e).sqrt() * nu.sin()).atan2(e + cos_nu);

        if E < 0.0 {
            E += TWO_PI;
        }
        E
    }

    pub fn eccentric_to_true_anomaly(E: f64, e: f64) -> f64 {
        if e < 1e-11 {
            return E;
        }

        let mut nu = ((1.0 - e * e).sqrt() * E.sin()).atan2(E.cos() - e);
        if nu < 0.0 {
            nu += TWO_PI;
        }
        nu
    }

    pub fn eccentric_to_mean_anomaly(E: f64, e: f64) -> f64 {
        let mut M = E - e * E.sin();
        if M < 0.0 {
            M += TWO_PI;
        }
        M
    }

    /// Solves Kepler's equation with Newton-Raphson. On non-convergence the
    /// last iterate is returned.
    pub fn mean_to_eccentric_anomaly(M: f64, e: f64, tolerance: f64, max_iterations: i32) -> f64 {
        let M = M.rem_euclid(TWO_PI);
        if e < 1e-11 {
            return M;
        }

        // Initial guess
        let mut E = if M < PI { M + e / 2.0 } else { M - e / 2.0 };

        // Newton-Raphson iteration
        let mut converged = false;
        for _ in 0..max_iterations {
            let delta = (E - e * E.sin() - M) / (1.0 - e * E.cos());
            E -= delta;
            if delta.abs() <= tolerance {
                converged = true;
                break;
            }
        }
        if !converged {
            warn!(
                "Kepler's equation did not converge after {} iterations (M = {}, e = {})",
                max_iterations, M, e
            );
        }

        if E < 0.0 {
            E += TWO_PI;
        }
        E
    }
}

fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use test_case::test_case;

    #[test_case(0.0, 0.0, 0.0; "circular orbit is identity")]
    #[test_case(PI, 0.5, PI; "apogee stays at apogee")]
    #[test_case(1.0, 0.1, 0.9179; "small eccentricity")]
    #[test_case(2.5, 0.7, 1.8032; "high eccentricity")]
    fn true_to_eccentric_anomaly(nu: f64, e: f64, expected: f64) {
        let result = OrbitalMechanics::true_to_eccentric_anomaly(nu, e);
        assert_abs_diff_eq!(result, expected, epsilon = 1e-3);
    }

    #[test_case(0.3, 0.0; "circular")]
    #[test_case(0.3, 0.2; "low eccentricity")]
    #[test_case(5.9, 0.6; "fourth quadrant")]
    #[test_case(3.0, 0.95; "near parabolic")]
    fn kepler_solve_inverts_kepler_equation(M: f64, e: f64) {
        let E = OrbitalMechanics::mean_to_eccentric_anomaly(M, e, 1e-12, 50);
        let recovered = OrbitalMechanics::eccentric_to_mean_anomaly(E, e);
        assert_abs_diff_eq!(recovered, M, epsilon = 1e-10);
    }

    #[test]
    fn eccentric_and_true_anomaly_are_inverse() {
        for k in 0..12 {
            let nu = 0.5 * k as f64;
            let E = OrbitalMechanics::true_to_eccentric_anomaly(nu, 0.3);
            let back = OrbitalMechanics::eccentric_to_true_anomaly(E, 0.3);
            assert_abs_diff_eq!(back, nu.rem_euclid(TWO_PI), epsilon = 1e-12);
        }
    }

    #[test_case(6778.137, 5553.6; "ISS altitude")]
    #[test_case(42164.17, 86164.1; "geostationary")]
    fn compute_orbital_period(a: f64, expected: f64) {
        let result = OrbitalMechanics::compute_orbital_period(a);
        assert_abs_diff_eq!(result, expected, epsilon = 1.0);
    }

    #[test]
    fn circular_velocity_matches_vis_viva() {
        let r = 7000.0;
        let v = OrbitalMechanics::compute_circular_velocity(r);
        assert_relative_eq!(v * v, EARTH_MU / r, max_relative = 1e-12);
    }

    #[test]
    fn cartesian_to_keplerian_quadrants() {
        // Descending leg: position below the equator, moving toward perigee.
        let elements = na::Vector6::new(8000.0, 0.2, 1.1, 4.0, 5.0, 4.5);
        let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements);
        let result = OrbitalMechanics::cartesian_to_keplerian(&r, &v);
        assert_abs_diff_eq!(result, elements, epsilon = 1e-8);
    }

    #[test]
    fn zero_state_is_not_finite() {
        let r = na::Vector3::zeros();
        let v = na::Vector3::zeros();
        let elements = OrbitalMechanics::cartesian_to_keplerian(&r, &v);
        assert!(elements.iter().any(|x| !x.is_finite()));
    }
}
