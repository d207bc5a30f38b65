//! Spherical-harmonic Earth gravity field.
//!
//! Coefficients come from an ICGEM `.gfc` file. The bundled model is EGM2008
//! truncated to degree and order 70. The field is evaluated in the Earth-fixed
//! frame with the V/W recursion of Montenbruck and Gill, "Satellite Orbits",
//! section 3.2, on unnormalised coefficients.

use crate::coordinates::coordinate_transformation::j2000_to_itrs_matrix;
use crate::errors::PropagatorErrors;
use hifitime::Epoch;
use lazy_static::lazy_static;
use log::error;
use nalgebra as na;
use std::num::ParseFloatError;

const EGM2008_GFC: &str = include_str!("../../data/EGM2008_70.gfc");

lazy_static! {
    static ref EGM2008: GravityField = GravityField::from_gfc(EGM2008_GFC).unwrap_or_else(|e| {
        error!("Bundled EGM2008 coefficients failed to load: {}", e);
        GravityField::point_mass()
    });
}

/// The bundled EGM2008 field.
pub fn egm2008() -> &'static GravityField {
    &EGM2008
}

/// Gravity field coefficients, stored unnormalised in a packed lower
/// triangle indexed by degree n and order m.
#[derive(Debug, Clone, PartialEq)]
pub struct GravityField {
    name: String,
    mu: f64,
    radius: f64,
    max_degree: usize,
    c: Vec<f64>,
    s: Vec<f64>,
}

fn triangle_index(n: usize, m: usize) -> usize {
    n * (n + 1) / 2 + m
}

/// Factor turning a fully normalised coefficient into an unnormalised one.
fn normalization(n: usize, m: usize) -> f64 {
    let delta = if m == 0 { 1.0 } else { 2.0 };
    let factorial_ratio = ((n - m + 1)..=(n + m)).fold(1.0, |acc, k| acc / k as f64);
    (delta * (2 * n + 1) as f64 * factorial_ratio).sqrt()
}

/// ICGEM files may carry Fortran `D` exponents.
fn parse_number(value: &str) -> Result<f64, ParseFloatError> {
    value.replace(['d', 'D'], "e").parse()
}

impl GravityField {
    /// Central term only.
    pub fn point_mass() -> Self {
        GravityField {
            name: String::from("point mass"),
            mu: crate::constants::EARTH_MU,
            radius: crate::constants::EARTH_RAD_EQ,
            max_degree: 0,
            c: vec![1.0],
            s: vec![0.0],
        }
    }

    /// Parse an ICGEM gravity field file. `earth_gravity_constant` (m³/s²) and
    /// `radius` (m) are required in the header; coefficients are taken as fully
    /// normalised unless the header says `norm unnormalized`.
    pub fn from_gfc(text: &str) -> Result<Self, PropagatorErrors> {
        let mut name = String::from("unnamed");
        let mut mu = None;
        let mut radius = None;
        let mut normalized = true;

        let mut lines = text.lines().enumerate();
        for (_, line) in lines.by_ref() {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("end_of_head"), _) => break,
                (Some("modelname"), Some(value)) => name = value.to_string(),
                (Some("earth_gravity_constant"), Some(value)) => {
                    mu = Some(parse_number(value)? / 1e9)
                }
                (Some("radius"), Some(value)) => radius = Some(parse_number(value)? / 1e3),
                (Some("norm"), Some(value)) => normalized = value != "unnormalized",
                _ => {}
            }
        }
        let mu = mu.ok_or(PropagatorErrors::MissingGravityHeader("earth_gravity_constant"))?;
        let radius = radius.ok_or(PropagatorErrors::MissingGravityHeader("radius"))?;

        let mut records = Vec::new();
        for (index, line) in lines {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.first() != Some(&"gfc") {
                continue;
            }
            if fields.len() < 5 {
                return Err(PropagatorErrors::MalformedGravityRecord(index + 1));
            }
            let n: usize = fields[1].parse()?;
            let m: usize = fields[2].parse()?;
            if m > n {
                return Err(PropagatorErrors::MalformedGravityRecord(index + 1));
            }
            records.push((n, m, parse_number(fields[3])?, parse_number(fields[4])?));
        }

        let max_degree = records.iter().map(|(n, _, _, _)| *n).max().unwrap_or(0);
        let size = triangle_index(max_degree, max_degree) + 1;
        let mut c = vec![0.0; size];
        let mut s = vec![0.0; size];
        for (n, m, cnm, snm) in records {
            let scale = if normalized { normalization(n, m) } else { 1.0 };
            let k = triangle_index(n, m);
            c[k] = cnm * scale;
            s[k] = snm * scale;
        }

        Ok(GravityField {
            name,
            mu,
            radius,
            max_degree,
            c,
            s,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gravitational parameter, km³/s².
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Reference radius, km.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Unnormalised (C, S) coefficient pair; zero beyond the model.
    pub fn coefficients(&self, n: usize, m: usize) -> (f64, f64) {
        if m > n || n > self.max_degree {
            return (0.0, 0.0);
        }
        let k = triangle_index(n, m);
        (self.c[k], self.s[k])
    }

    /// V and W harmonics of the Earth-fixed `position` up to degree `n_max`.
    fn harmonics(
        &self,
        position: &na::Vector3<f64>,
        n_max: usize,
    ) -> (na::DMatrix<f64>, na::DMatrix<f64>) {
        let r2 = position.norm_squared();
        let rho = self.radius * self.radius / r2;
        let x0 = self.radius * position.x / r2;
        let y0 = self.radius * position.y / r2;
        let z0 = self.radius * position.z / r2;

        let mut v = na::DMatrix::zeros(n_max + 1, n_max + 1);
        let mut w = na::DMatrix::zeros(n_max + 1, n_max + 1);

        v[(0, 0)] = self.radius / r2.sqrt();
        if n_max == 0 {
            return (v, w);
        }
        v[(1, 0)] = z0 * v[(0, 0)];
        for n in 2..=n_max {
            let nf = n as f64;
            v[(n, 0)] = ((2.0 * nf - 1.0) * z0 * v[(n - 1, 0)] - (nf - 1.0) * rho * v[(n - 2, 0)]) / nf;
        }

        for m in 1..=n_max {
            let mf = m as f64;
            let (v_prev, w_prev) = (v[(m - 1, m - 1)], w[(m - 1, m - 1)]);
            v[(m, m)] = (2.0 * mf - 1.0) * (x0 * v_prev - y0 * w_prev);
            w[(m, m)] = (2.0 * mf - 1.0) * (x0 * w_prev + y0 * v_prev);

            if m < n_max {
                v[(m + 1, m)] = (2.0 * mf + 1.0) * z0 * v[(m, m)];
                w[(m + 1, m)] = (2.0 * mf + 1.0) * z0 * w[(m, m)];
            }
            for n in (m + 2)..=n_max {
                let nf = n as f64;
                let a = (2.0 * nf - 1.0) * z0;
                let b = (nf + mf - 1.0) * rho;
                let d = nf - mf;
                v[(n, m)] = (a * v[(n - 1, m)] - b * v[(n - 2, m)]) / d;
                w[(n, m)] = (a * w[(n - 1, m)] - b * w[(n - 2, m)]) / d;
            }
        }

        (v, w)
    }

    /// Non-central part of the potential at an Earth-fixed position, km²/s²,
    /// summed over degrees 2..=`degree` and orders 0..=`order`.
    pub fn potential(&self, position: &na::Vector3<f64>, degree: usize, order: usize) -> f64 {
        let degree = degree.min(self.max_degree);
        let order = order.min(degree);
        if degree < 2 {
            return 0.0;
        }

        let (v, w) = self.harmonics(position, degree);
        let mut sum = 0.0;
        for m in 0..=order {
            for n in m.max(2)..=degree {
                let (c, s) = self.coefficients(n, m);
                sum += c * v[(n, m)] + s * w[(n, m)];
            }
        }
        sum * self.mu / self.radius
    }

    /// Non-central acceleration at an Earth-fixed position (km), km/s², over
    /// degrees 2..=`degree` and orders 0..=`order`. Both limits are clamped to
    /// the model.
    pub fn acceleration(
        &self,
        position: &na::Vector3<f64>,
        degree: usize,
        order: usize,
    ) -> na::Vector3<f64> {
        let degree = degree.min(self.max_degree);
        let order = order.min(degree);
        if degree < 2 {
            return na::Vector3::zeros();
        }

        let (v, w) = self.harmonics(position, degree + 1);
        let mut accel = na::Vector3::zeros();
        for m in 0..=order {
            for n in m.max(2)..=degree {
                let (c, s) = self.coefficients(n, m);
                if m == 0 {
                    accel.x -= c * v[(n + 1, 1)];
                    accel.y -= c * w[(n + 1, 1)];
                    accel.z -= (n + 1) as f64 * c * v[(n + 1, 0)];
                } else {
                    let fac = 0.5 * ((n - m + 1) * (n - m + 2)) as f64;
                    accel.x += 0.5 * (-c * v[(n + 1, m + 1)] - s * w[(n + 1, m + 1)])
                        + fac * (c * v[(n + 1, m - 1)] + s * w[(n + 1, m - 1)]);
                    accel.y += 0.5 * (-c * w[(n + 1, m + 1)] + s * v[(n + 1, m + 1)])
                        + fac * (-c * w[(n + 1, m - 1)] + s * v[(n + 1, m - 1)]);
                    accel.z += (n - m + 1) as f64 * (-c * v[(n + 1, m)] - s * w[(n + 1, m)]);
                }
            }
        }

        accel * (self.mu / (self.radius * self.radius))
    }
}

/// Non-central EGM2008 acceleration on a J2000 position (km), km/s². The field
/// is evaluated in the Earth-fixed frame of `epoch`.
pub fn earth_gravity_acceleration(
    epoch: &Epoch,
    position: &na::Vector3<f64>,
    degree: usize,
    order: usize,
) -> na::Vector3<f64> {
    if degree < 2 {
        return na::Vector3::zeros();
    }
    let rotation = j2000_to_itrs_matrix(epoch);
    let fixed = egm2008().acceleration(&(rotation * position), degree, order);
    rotation.inverse() * fixed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EARTH_MU, EARTH_RAD_EQ};
    use crate::physics::gravity::{j2_acceleration, j3_acceleration};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use test_case::test_case;

    fn leo() -> na::Vector3<f64> {
        na::Vector3::new(-1117.913276, 73.093299, -7000.018272)
    }

    #[test]
    fn bundled_model_loads() {
        let field = egm2008();
        assert_eq!(field.name(), "EGM2008");
        assert_eq!(field.max_degree(), 70);
        assert_relative_eq!(field.mu(), EARTH_MU, max_relative = 1e-12);
        assert_relative_eq!(field.radius(), EARTH_RAD_EQ, max_relative = 1e-12);
        // Unnormalised C20 is -J2
        assert_relative_eq!(field.coefficients(2, 0).0, -1.08262617e-3, max_relative = 1e-7);
    }

    #[test]
    fn degree_two_zonal_matches_closed_form_j2() {
        let r = leo();
        let field = egm2008().acceleration(&r, 2, 0);
        assert_relative_eq!(field, j2_acceleration(&r), max_relative = 1e-5);
    }

    #[test]
    fn degree_three_zonal_matches_closed_form_j3() {
        let r = leo();
        let j3_only = egm2008().acceleration(&r, 3, 0) - egm2008().acceleration(&r, 2, 0);
        assert_relative_eq!(j3_only, j3_acceleration(&r), max_relative = 5e-4);
    }

    #[test_case(2, 2; "degree 2")]
    #[test_case(8, 8; "degree 8")]
    #[test_case(50, 50; "degree 50")]
    #[test_case(70, 30; "order below degree")]
    fn acceleration_is_potential_gradient(degree: usize, order: usize) {
        let field = egm2008();
        let r = na::Vector3::new(4000.0, -3500.0, 4200.0);
        let h = 1e-3;
        let gradient = na::Vector3::from_fn(|i, _| {
            let mut step = na::Vector3::zeros();
            step[i] = h;
            (field.potential(&(r + step), degree, order) - field.potential(&(r - step), degree, order))
                / (2.0 * h)
        });
        let accel = field.acceleration(&r, degree, order);
        assert_abs_diff_eq!(accel, gradient, epsilon = 1e-12);
    }

    #[test]
    fn zonal_field_is_symmetric_about_the_pole() {
        let field = egm2008();
        let r = leo();
        let spin = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), 1.234);
        assert_relative_eq!(
            field.acceleration(&(spin * r), 20, 0),
            spin * field.acceleration(&r, 20, 0),
            max_relative = 1e-10
        );
        // Tesseral terms break that symmetry
        let diff = field.acceleration(&(spin * r), 20, 20) - spin * field.acceleration(&r, 20, 20);
        assert!(diff.magnitude() > 1e-9);
    }

    #[test]
    fn limits_are_clamped_to_the_model() {
        let field = egm2008();
        let r = leo();
        assert_eq!(field.acceleration(&r, 500, 500), field.acceleration(&r, 70, 70));
        assert_eq!(field.acceleration(&r, 1, 1), na::Vector3::zeros());
        assert_eq!(field.coefficients(71, 0), (0.0, 0.0));
    }

    #[test]
    fn inertial_wrapper_rotates_through_earth_fixed_frame() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        let r = leo();
        let rotation = j2000_to_itrs_matrix(&epoch);
        let accel = earth_gravity_acceleration(&epoch, &r, 50, 50);
        assert_abs_diff_eq!(
            rotation * accel,
            egm2008().acceleration(&(rotation * r), 50, 50),
            epsilon = 1e-18
        );
        assert_eq!(earth_gravity_acceleration(&epoch, &r, 0, 0), na::Vector3::zeros());
    }

    #[test]
    fn parses_unnormalized_fortran_records() {
        let text = "modelname  tiny\n\
                    earth_gravity_constant 0.3986004415E+15\n\
                    radius 0.63781363E+07\n\
                    norm unnormalized\n\
                    end_of_head ====\n\
                    gfc 0 0 1.0d0 0.0d0\n\
                    gfc 2 0 -1.0826D-03 0.0\n";
        let field = GravityField::from_gfc(text).unwrap();
        assert_eq!(field.name(), "tiny");
        assert_eq!(field.max_degree(), 2);
        assert_abs_diff_eq!(field.coefficients(2, 0).0, -1.0826e-3, epsilon = 1e-15);
    }

    #[test]
    fn rejects_bad_files() {
        assert!(matches!(
            GravityField::from_gfc("radius 6378136.3\nend_of_head\n"),
            Err(PropagatorErrors::MissingGravityHeader("earth_gravity_constant"))
        ));
        let text = "earth_gravity_constant 3.986e14\nradius 6378136.3\nend_of_head\ngfc 2 3 0.0 0.0\n";
        assert!(matches!(
            GravityField::from_gfc(text),
            Err(PropagatorErrors::MalformedGravityRecord(4))
        ));
        let text = "earth_gravity_constant 3.986e14\nradius 6378136.3\nend_of_head\ngfc 2 x 0.0 0.0\n";
        assert!(matches!(
            GravityField::from_gfc(text),
            Err(PropagatorErrors::ParseIntError(_))
        ));
    }
}
