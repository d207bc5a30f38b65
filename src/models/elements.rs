use crate::models::state::State;
use crate::physics::orbital::OrbitalMechanics;
use hifitime::Epoch;
use nalgebra as na;

/// Classical orbital elements at an epoch. Angles in radians, distances in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicalElements {
    pub epoch: Epoch,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    pub true_anomaly: f64,
}

impl ClassicalElements {
    pub fn new(
        epoch: Epoch,
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        raan: f64,
        arg_perigee: f64,
        true_anomaly: f64,
    ) -> Self {
        Self {
            epoch,
            semi_major_axis,
            eccentricity,
            inclination,
            raan,
            arg_perigee,
            true_anomaly,
        }
    }

    /// Builds elements from the `[a, e, i, Omega, omega, nu]` vector layout.
    pub fn from_vector(epoch: Epoch, elements: &na::Vector6<f64>) -> Self {
        Self::new(
            epoch,
            elements[0],
            elements[1],
            elements[2],
            elements[3],
            elements[4],
            elements[5],
        )
    }

    pub fn to_vector(&self) -> na::Vector6<f64> {
        na::Vector6::new(
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.raan,
            self.arg_perigee,
            self.true_anomaly,
        )
    }

    pub fn to_state(&self) -> State {
        let (position, velocity) = OrbitalMechanics::keplerian_to_cartesian(&self.to_vector());
        State::new(self.epoch, position, velocity)
    }

    /// Mean motion in rad/s
    pub fn mean_motion(&self) -> f64 {
        OrbitalMechanics::compute_mean_motion(self.semi_major_axis)
    }

    /// Orbital period in seconds
    pub fn period(&self) -> f64 {
        OrbitalMechanics::compute_orbital_period(self.semi_major_axis)
    }

    pub fn eccentric_anomaly(&self) -> f64 {
        OrbitalMechanics::true_to_eccentric_anomaly(self.true_anomaly, self.eccentricity)
    }

    pub fn mean_anomaly(&self) -> f64 {
        OrbitalMechanics::eccentric_to_mean_anomaly(self.eccentric_anomaly(), self.eccentricity)
    }

    pub fn apogee_radius(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    pub fn perigee_radius(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }
}
