pub mod coordinate_transformation;
pub mod nutation;

pub use coordinate_transformation::{gast, gmst, Geodetic};
pub use nutation::nutation_angles;
