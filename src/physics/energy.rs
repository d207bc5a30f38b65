use crate::constants::EARTH_MU;
use crate::models::state::State;
use nalgebra as na;

/// Specific orbital energy (km²/s²).
pub fn calculate_energy(state: &State) -> f64 {
    let r = state.position.magnitude();
    let v = state.velocity.magnitude();

    0.5 * v * v - EARTH_MU / r
}

/// Specific angular momentum (km²/s).
pub fn calculate_angular_momentum(state: &State) -> na::Vector3<f64> {
    state.position.cross(&state.velocity)
}
