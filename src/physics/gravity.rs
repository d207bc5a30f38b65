//! Central-body gravity: the point-mass term and the J2, J3 and J4 zonal
//! corrections. All accelerations are in km/s² for J2000 positions in km.

use crate::constants::{EARTH_J2, EARTH_J3, EARTH_J4, EARTH_MU, EARTH_RAD_EQ};
use nalgebra as na;

pub fn gravity_acceleration(position: &na::Vector3<f64>) -> na::Vector3<f64> {
    let r: f64 = position.magnitude();
    position * (-EARTH_MU / r.powi(3))
}

pub fn j2_acceleration(position: &na::Vector3<f64>) -> na::Vector3<f64> {
    let (x, y, z) = (position.x, position.y, position.z);
    let r = position.magnitude();
    let z2_r2 = z * z / (r * r);

    let pre = -(3.0 * EARTH_J2 * EARTH_MU * EARTH_RAD_EQ.powi(2)) / (2.0 * r.powi(5));
    let xy_post = 1.0 - 5.0 * z2_r2;
    let z_post = 3.0 - 5.0 * z2_r2;

    na::Vector3::new(pre * x * xy_post, pre * y * xy_post, pre * z * z_post)
}

pub fn j3_acceleration(position: &na::Vector3<f64>) -> na::Vector3<f64> {
    let (x, y, z) = (position.x, position.y, position.z);
    let r = position.magnitude();
    let r2 = r * r;

    let pre = -(5.0 * EARTH_J3 * EARTH_MU * EARTH_RAD_EQ.powi(3)) / (2.0 * r.powi(7));
    let xy_post = 3.0 * z - 7.0 * z.powi(3) / r2;
    let z_post = 6.0 * z * z - 7.0 * z.powi(4) / r2 - 0.6 * r2;

    na::Vector3::new(pre * x * xy_post, pre * y * xy_post, pre * z_post)
}

pub fn j4_acceleration(position: &na::Vector3<f64>) -> na::Vector3<f64> {
    let (x, y, z) = (position.x, position.y, position.z);
    let r = position.magnitude();
    let z2_r2 = z * z / (r * r);

    let pre = (15.0 * EARTH_J4 * EARTH_MU * EARTH_RAD_EQ.powi(4)) / (8.0 * r.powi(7));
    let xy_post = 1.0 - 14.0 * z2_r2 + 21.0 * z2_r2 * z2_r2;
    let z_post = 5.0 - (70.0 / 3.0) * z2_r2 + 21.0 * z2_r2 * z2_r2;

    na::Vector3::new(pre * x * xy_post, pre * y * xy_post, pre * z * z_post)
}
