use crate::models::elements::ClassicalElements;
use crate::physics::energy::{calculate_angular_momentum, calculate_energy};
use crate::physics::orbital::OrbitalMechanics;
use hifitime::{Duration, Epoch};
use nalgebra as na;

/// Inertial (J2000) satellite state: position in km, velocity in km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub epoch: Epoch,
    pub position: na::Vector3<f64>,
    pub velocity: na::Vector3<f64>,
}

impl State {
    pub fn new(epoch: Epoch, position: na::Vector3<f64>, velocity: na::Vector3<f64>) -> Self {
        State {
            epoch,
            position,
            velocity,
        }
    }

    /// Split a position/velocity 6-vector into a state at `epoch`.
    pub fn from_posvel(epoch: Epoch, posvel: &na::Vector6<f64>) -> Self {
        State {
            epoch,
            position: posvel.fixed_rows::<3>(0).into_owned(),
            velocity: posvel.fixed_rows::<3>(3).into_owned(),
        }
    }

    /// Joint position/velocity 6-vector.
    pub fn posvel(&self) -> na::Vector6<f64> {
        na::Vector6::new(
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        )
    }

    /// Epoch rolled by `seconds` (negative rolls backwards).
    pub fn roll(&self, seconds: f64) -> Epoch {
        self.epoch + Duration::from_seconds(seconds)
    }

    /// Position distance to another state, in km.
    pub fn distance(&self, other: &State) -> f64 {
        (self.position - other.position).magnitude()
    }

    pub fn to_classical_elements(&self) -> ClassicalElements {
        let elements = OrbitalMechanics::cartesian_to_keplerian(&self.position, &self.velocity);
        ClassicalElements::from_vector(self.epoch, &elements)
    }

    pub fn specific_energy(&self) -> f64 {
        calculate_energy(self)
    }

    pub fn angular_momentum(&self) -> na::Vector3<f64> {
        calculate_angular_momentum(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn posvel_split_and_join() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        let state = State::new(
            epoch,
            na::Vector3::new(1.0, 2.0, 3.0),
            na::Vector3::new(4.0, 5.0, 6.0),
        );
        let posvel = state.posvel();
        assert_eq!(posvel, na::Vector6::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
        assert_eq!(State::from_posvel(epoch, &posvel), state);
    }

    #[test]
    fn roll_is_signed() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2018, 12, 21);
        let state = State::new(epoch, na::Vector3::zeros(), na::Vector3::zeros());
        assert_abs_diff_eq!((state.roll(-90.0) - epoch).to_seconds(), -90.0);
        assert_abs_diff_eq!((state.roll(12.5) - epoch).to_seconds(), 12.5);
    }
}
