use crate::coordinates::coordinate_transformation::itrs_to_geodetic;
use nalgebra as na;

/// Piecewise exponential atmosphere: (base altitude km, base density kg/m³,
/// scale height km). Vallado, table 8-4.
const EXPONENTIAL_ATMOSPHERE: [(f64, f64, f64); 28] = [
    (0.0, 1.225, 7.249),
    (25.0, 3.899e-2, 6.349),
    (30.0, 1.774e-2, 6.682),
    (40.0, 3.972e-3, 7.554),
    (50.0, 1.057e-3, 8.382),
    (60.0, 3.206e-4, 7.714),
    (70.0, 8.770e-5, 6.549),
    (80.0, 1.905e-5, 5.799),
    (90.0, 3.396e-6, 5.382),
    (100.0, 5.297e-7, 5.877),
    (110.0, 9.661e-8, 7.263),
    (120.0, 2.438e-8, 9.473),
    (130.0, 8.484e-9, 12.636),
    (140.0, 3.845e-9, 16.149),
    (150.0, 2.070e-9, 22.523),
    (180.0, 5.464e-10, 29.740),
    (200.0, 2.789e-10, 37.105),
    (250.0, 7.248e-11, 45.546),
    (300.0, 2.418e-11, 53.628),
    (350.0, 9.518e-12, 53.298),
    (400.0, 3.725e-12, 58.515),
    (450.0, 1.585e-12, 60.828),
    (500.0, 6.967e-13, 63.822),
    (600.0, 1.454e-13, 71.835),
    (700.0, 3.614e-14, 88.667),
    (800.0, 1.170e-14, 124.64),
    (900.0, 5.245e-15, 181.05),
    (1000.0, 3.019e-15, 268.00),
];

const MAX_ALTITUDE: f64 = 1000.0; // km

pub struct Environment {
    pub altitude: f64, // km, geodetic
    pub density: f64,  // kg/m³
}

impl Environment {
    pub fn new(position: &na::Vector3<f64>) -> Self {
        // Geodetic altitude only depends on latitude and radius, so the
        // inertial position can be used without rotating to Earth-fixed.
        let (_, _, altitude) = itrs_to_geodetic(position);
        Environment {
            altitude,
            density: density_at_altitude(altitude),
        }
    }
}

/// Atmospheric density in kg/m³ at an inertial position in km.
pub fn atmospheric_density(position: &na::Vector3<f64>) -> f64 {
    Environment::new(position).density
}

pub fn density_at_altitude(altitude: f64) -> f64 {
    if altitude > MAX_ALTITUDE {
        return 0.0;
    }
    let (h0, rho0, scale_height) = EXPONENTIAL_ATMOSPHERE
        .iter()
        .rev()
        .find(|(h0, _, _)| altitude >= *h0)
        .copied()
        .unwrap_or(EXPONENTIAL_ATMOSPHERE[0]);
    if altitude < 0.0 {
        return rho0;
    }
    rho0 * (-(altitude - h0) / scale_height).exp()
}
