use lazy_static::lazy_static;
use nalgebra as na;

// Earth
pub const EARTH_MU: f64 = 398600.4415; // Gravitational parameter (km³/s²)
pub const EARTH_RAD_EQ: f64 = 6378.1363; // Equatorial radius (km)
pub const EARTH_J2: f64 = 1.08262668355315e-3;
pub const EARTH_J3: f64 = -2.53265648533224e-6;
pub const EARTH_J4: f64 = -1.619621591367e-6;
pub const EARTH_ANGULAR_VELOCITY: f64 = 7.292115146706979e-5; // Earth's rotation rate (rad/s)
lazy_static! {
    /// Earth rotation vector in the inertial frame (rad/s)
    pub static ref EARTH_ROTATION: na::Vector3<f64> =
        na::Vector3::new(0.0, 0.0, EARTH_ANGULAR_VELOCITY);
}
pub const WGS84_A: f64 = 6378.137; // Semi-major axis [km]
pub const WGS84_F: f64 = 1.0 / 298.257223563; // Flattening

// Third bodies
pub const SUN_MU: f64 = 132712440017.987; // km³/s²
pub const MOON_MU: f64 = 4902.801; // km³/s²

// Environmental constants
pub const SOLAR_FLUX: f64 = 1367.0; // Solar constant at 1 AU (W/m^2)
pub const ASTRONOMICAL_UNIT: f64 = 149597870.691; // km
pub const SPEED_OF_LIGHT: f64 = 299792.458; // km/s

// Time
pub const SECONDS_PER_DAY: f64 = 86400.0;
pub const J2000_JD: f64 = 2451545.0;
pub const DAYS_PER_CENTURY: f64 = 36525.0;

// Math
pub const PI: f64 = std::f64::consts::PI;
pub const TWO_PI: f64 = 2.0 * PI;
