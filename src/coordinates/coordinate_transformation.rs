use super::nutation::{equation_of_equinoxes, nutation_matrix};
use crate::constants::*;
use crate::models::state::State;
use hifitime::Epoch;
use nalgebra as na;

const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Geodetic coordinates on the WGS84 ellipsoid. Angles in radians, altitude in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Geodetic {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Geodetic {
            latitude,
            longitude,
            altitude,
        }
    }

    pub fn from_itrs(position: &na::Vector3<f64>) -> Self {
        let (longitude, latitude, altitude) = itrs_to_geodetic(position);
        Geodetic::new(latitude.to_radians(), longitude.to_radians(), altitude)
    }

    pub fn to_itrs(&self) -> na::Vector3<f64> {
        geodetic_to_itrs(self.latitude, self.longitude, self.altitude)
    }
}

/// Convert ITRS Cartesian (km) to Geodetic coordinates (WGS84).
/// Returns (longitude deg, latitude deg, altitude km).
pub fn itrs_to_geodetic(pos: &na::Vector3<f64>) -> (f64, f64, f64) {
    let x = pos[0];
    let y = pos[1];
    let z = pos[2];

    let longitude = y.atan2(x);

    let a = WGS84_A;
    let f = WGS84_F;
    let b = a * (1.0 - f); // Semi-minor axis
    let e2 = 2.0 * f - f * f; // First eccentricity squared

    let p = (x * x + y * y).sqrt();

    // On the polar axis
    if p < 1e-10 {
        let latitude: f64 = if z < 0.0 { -PI / 2.0 } else { PI / 2.0 };
        return (0.0, latitude.to_degrees(), z.abs() - b);
    }

    let mut latitude = z.atan2(p * (1.0 - e2));

    for _ in 0..10 {
        let sin_lat = latitude.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let h = p / latitude.cos() - n;

        let prev_lat = latitude;
        latitude = (z / p).atan2(1.0 - e2 * n / (n + h));

        if (latitude - prev_lat).abs() < 1e-12 {
            break;
        }
    }

    let sin_lat = latitude.sin();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let altitude = p / latitude.cos() - n;

    (longitude.to_degrees(), latitude.to_degrees(), altitude)
}

/// Geodetic latitude/longitude (radians) and altitude (km) to ITRS Cartesian (km).
pub fn geodetic_to_itrs(latitude: f64, longitude: f64, altitude: f64) -> na::Vector3<f64> {
    let e2 = 2.0 * WGS84_F - WGS84_F * WGS84_F;
    let sin_lat = latitude.sin();
    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    na::Vector3::new(
        (n + altitude) * latitude.cos() * longitude.cos(),
        (n + altitude) * latitude.cos() * longitude.sin(),
        (n * (1.0 - e2) + altitude) * sin_lat,
    )
}

/// Greenwich mean sidereal time (IAU-82), radians in [0, 2π). UTC stands in for UT1.
pub fn gmst(epoch: &Epoch) -> f64 {
    let t = (epoch.to_jde_utc_days() - J2000_JD) / DAYS_PER_CENTURY;
    let seconds = 67310.54841 + (876600.0 * 3600.0 + 8640184.812866) * t + 0.093104 * t * t
        - 6.2e-6 * t * t * t;
    (seconds.rem_euclid(SECONDS_PER_DAY) / 240.0).to_radians()
}

/// IAU-76 precession angles (zeta, theta, z) in radians.
pub fn precession_angles(epoch: &Epoch) -> (f64, f64, f64) {
    let t = (epoch.to_jde_tt_days() - J2000_JD) / DAYS_PER_CENTURY;
    let t2 = t * t;
    let t3 = t2 * t;

    let zeta = 2306.2181 * t + 0.30188 * t2 + 0.017998 * t3;
    let theta = 2004.3109 * t - 0.42665 * t2 - 0.041833 * t3;
    let z = 2306.2181 * t + 1.09468 * t2 + 0.018203 * t3;

    (zeta * ARCSEC_TO_RAD, theta * ARCSEC_TO_RAD, z * ARCSEC_TO_RAD)
}

/// Rotation from the J2000 frame to the mean-of-date frame.
pub fn precession_matrix(epoch: &Epoch) -> na::Rotation3<f64> {
    let (zeta, theta, z) = precession_angles(epoch);
    na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), z)
        * na::Rotation3::from_axis_angle(&na::Vector3::y_axis(), -theta)
        * na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), zeta)
}

/// Greenwich apparent sidereal time, radians.
pub fn gast(epoch: &Epoch) -> f64 {
    (gmst(epoch) + equation_of_equinoxes(epoch)).rem_euclid(TWO_PI)
}

/// Rotation from J2000 to the Earth-fixed frame: precession, nutation and
/// apparent sidereal rotation. Polar motion is neglected.
pub fn j2000_to_itrs_matrix(epoch: &Epoch) -> na::Rotation3<f64> {
    na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), -gast(epoch))
        * nutation_matrix(epoch)
        * precession_matrix(epoch)
}

/// Earth-fixed position and velocity (km, km/s) of an inertial state.
pub fn j2000_to_itrs(state: &State) -> (na::Vector3<f64>, na::Vector3<f64>) {
    let rotation = j2000_to_itrs_matrix(&state.epoch);
    let position = rotation * state.position;
    let velocity = rotation * state.velocity - EARTH_ROTATION.cross(&position);
    (position, velocity)
}

/// Inertial state of an Earth-fixed position and velocity at `epoch`.
pub fn itrs_to_j2000(
    epoch: Epoch,
    position: &na::Vector3<f64>,
    velocity: &na::Vector3<f64>,
) -> State {
    let rotation = j2000_to_itrs_matrix(&epoch).inverse();
    let inertial_velocity = velocity + EARTH_ROTATION.cross(position);
    State::new(epoch, rotation * position, rotation * inertial_velocity)
}

/// South-East-Zenith components of `target` (ITRS, km) seen from `observer`.
pub fn topocentric_sez(observer: &Geodetic, target: &na::Vector3<f64>) -> na::Vector3<f64> {
    let rho = target - observer.to_itrs();
    let (sin_lat, cos_lat) = observer.latitude.sin_cos();
    let (sin_lon, cos_lon) = observer.longitude.sin_cos();

    na::Vector3::new(
        sin_lat * cos_lon * rho.x + sin_lat * sin_lon * rho.y - cos_lat * rho.z,
        -sin_lon * rho.x + cos_lon * rho.y,
        cos_lat * cos_lon * rho.x + cos_lat * sin_lon * rho.y + sin_lat * rho.z,
    )
}

/// Range (km), azimuth from north and elevation (radians) of `target` (ITRS, km).
pub fn look_angles(observer: &Geodetic, target: &na::Vector3<f64>) -> (f64, f64, f64) {
    let sez = topocentric_sez(observer, target);
    let range = sez.magnitude();
    let azimuth = sez.y.atan2(-sez.x).rem_euclid(TWO_PI);
    let elevation = (sez.z / range).asin();
    (range, azimuth, elevation)
}
