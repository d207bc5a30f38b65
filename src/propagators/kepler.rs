use super::{Propagator, PropagatorKind};
use crate::constants::{EARTH_J2, EARTH_RAD_EQ, TWO_PI};
use crate::models::elements::ClassicalElements;
use crate::models::state::State;
use crate::physics::orbital::OrbitalMechanics;
use hifitime::Epoch;
use log::debug;

pub const KEPLER_TOLERANCE: f64 = 1e-12;
pub const KEPLER_MAX_ITERATIONS: i32 = 50;

/// Optional secular effects layered on two-body motion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeplerModel {
    /// Secular RAAN, argument of perigee and mean anomaly drift from J2.
    pub j2_effect: bool,
    /// Mean motion change from `n_dot` and `n_ddot`, with the matching decay
    /// of semi-major axis and eccentricity. Eccentricity bottoms out at zero.
    pub atmospheric_drag: bool,
    /// First derivative of mean motion (rad/s²).
    pub n_dot: f64,
    /// Second derivative of mean motion (rad/s³).
    pub n_ddot: f64,
}

impl KeplerModel {
    pub fn j2() -> Self {
        KeplerModel {
            j2_effect: true,
            ..Self::default()
        }
    }

    pub fn drag(n_dot: f64, n_ddot: f64) -> Self {
        KeplerModel {
            atmospheric_drag: true,
            n_dot,
            n_ddot,
            ..Self::default()
        }
    }
}

/// Analytic two-body propagator solving Kepler's equation.
pub struct KeplerPropagator {
    init_elements: ClassicalElements,
    init_state: State,
    cache_state: State,
    model: KeplerModel,
}

impl KeplerPropagator {
    pub fn new(elements: ClassicalElements) -> Self {
        Self::with_model(elements, KeplerModel::default())
    }

    pub fn with_model(elements: ClassicalElements, model: KeplerModel) -> Self {
        let state = elements.to_state();
        KeplerPropagator {
            init_elements: elements,
            init_state: state,
            cache_state: state,
            model,
        }
    }

    pub fn from_state(state: &State) -> Self {
        let mut propagator = Self::new(state.to_classical_elements());
        propagator.init_state = *state;
        propagator.cache_state = *state;
        propagator
    }

    pub fn init_elements(&self) -> &ClassicalElements {
        &self.init_elements
    }

    pub fn model(&self) -> &KeplerModel {
        &self.model
    }

    pub fn set_model(&mut self, model: KeplerModel) {
        debug!("Kepler model set to {:?}", model);
        self.model = model;
    }

    /// Mean elements at `epoch`, with the true anomaly recovered from the
    /// propagated mean anomaly.
    pub fn elements_at(&self, epoch: Epoch) -> ClassicalElements {
        let el = &self.init_elements;
        let dt = (epoch - el.epoch).to_seconds();
        let n = el.mean_motion();

        let mut a = el.semi_major_axis;
        let mut e = el.eccentricity;
        let mut raan = el.raan;
        let mut arg_perigee = el.arg_perigee;
        let mut mean_anomaly = el.mean_anomaly() + n * dt;

        if self.model.atmospheric_drag {
            let n_dot = self.model.n_dot;
            mean_anomaly += n_dot / 2.0 * dt * dt + self.model.n_ddot / 6.0 * dt * dt * dt;
            a -= 2.0 * el.semi_major_axis / (3.0 * n) * n_dot * dt;
            e = (e - 2.0 * (1.0 - el.eccentricity) / (3.0 * n) * n_dot * dt).max(0.0);
        }

        if self.model.j2_effect {
            let p = el.semi_major_axis * (1.0 - el.eccentricity * el.eccentricity);
            let k = n * EARTH_J2 * (EARTH_RAD_EQ / p).powi(2);
            let (sin_i, cos_i) = el.inclination.sin_cos();
            let sin2_i = sin_i * sin_i;
            let beta = (1.0 - el.eccentricity * el.eccentricity).sqrt();

            raan += -1.5 * k * cos_i * dt;
            arg_perigee += 0.75 * k * (4.0 - 5.0 * sin2_i) * dt;
            mean_anomaly += 0.75 * k * beta * (2.0 - 3.0 * sin2_i) * dt;
        }

        let eccentric_anomaly = OrbitalMechanics::mean_to_eccentric_anomaly(
            mean_anomaly,
            e,
            KEPLER_TOLERANCE,
            KEPLER_MAX_ITERATIONS,
        );

        ClassicalElements::new(
            epoch,
            a,
            e,
            el.inclination,
            raan.rem_euclid(TWO_PI),
            arg_perigee.rem_euclid(TWO_PI),
            OrbitalMechanics::eccentric_to_true_anomaly(eccentric_anomaly, e),
        )
    }
}

impl Propagator for KeplerPropagator {
    fn kind(&self) -> PropagatorKind {
        PropagatorKind::Kepler
    }

    fn state(&self) -> &State {
        &self.cache_state
    }

    fn propagate(&mut self, epoch: Epoch) -> State {
        self.cache_state = if epoch == self.init_state.epoch {
            self.init_state
        } else {
            self.elements_at(epoch).to_state()
        };
        self.cache_state
    }

    fn reset(&mut self) {
        debug!("Resetting {} propagator to {}", self.kind(), self.init_state.epoch);
        self.cache_state = self.init_state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EARTH_MU;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use hifitime::Duration;
    use nalgebra as na;

    fn start() -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2018, 12, 21)
    }

    fn leo() -> ClassicalElements {
        ClassicalElements::new(
            start(),
            7000.0,
            0.01,
            51.6_f64.to_radians(),
            1.0,
            0.5,
            0.25,
        )
    }

    #[test]
    fn full_period_returns_to_start() {
        let elements = leo();
        let mut propagator = KeplerPropagator::new(elements);
        let initial = *propagator.state();
        let after = propagator.propagate(start() + Duration::from_seconds(elements.period()));
        assert_abs_diff_eq!(after.position, initial.position, epsilon = 1e-6);
        assert_abs_diff_eq!(after.velocity, initial.velocity, epsilon = 1e-9);
    }

    #[test]
    fn half_period_reaches_opposite_apsis() {
        let elements = ClassicalElements::new(start(), 8000.0, 0.1, 0.3, 0.0, 0.0, 0.0);
        let mut propagator = KeplerPropagator::new(elements);
        let state = propagator.propagate(start() + Duration::from_seconds(elements.period() / 2.0));
        assert_relative_eq!(state.position.magnitude(), elements.apogee_radius(), max_relative = 1e-9);
    }

    #[test]
    fn energy_is_conserved() {
        let mut propagator = KeplerPropagator::new(leo());
        let energy = |s: &State| s.velocity.magnitude_squared() / 2.0 - EARTH_MU / s.position.magnitude();
        let initial = energy(propagator.state());
        for hours in [1.0, 7.5, 24.0, -3.0] {
            let state = propagator.propagate(start() + Duration::from_seconds(hours * 3600.0));
            assert_relative_eq!(energy(&state), initial, max_relative = 1e-10);
        }
    }

    #[test]
    fn initial_epoch_returns_initial_state_exactly() {
        let state = State::new(
            start(),
            na::Vector3::new(-1117.913276, 73.093299, -7000.018272),
            na::Vector3::new(3.531365461, 6.583914964, -0.495649656),
        );
        let mut propagator = KeplerPropagator::from_state(&state);
        propagator.propagate(start() + Duration::from_seconds(500.0));
        assert_eq!(propagator.propagate(start()), state);
        propagator.reset();
        assert_eq!(*propagator.state(), state);
    }

    #[test]
    fn j2_regresses_node_of_prograde_orbit() {
        let elements = leo();
        let propagator = KeplerPropagator::with_model(elements, KeplerModel::j2());
        let day = propagator.elements_at(start() + Duration::from_seconds(86400.0));

        // About -4.5 deg/day for a 51.6 deg LEO
        let drift = (day.raan - elements.raan).to_degrees();
        assert!(drift < -4.0 && drift > -5.0, "node drift {} deg/day", drift);
        assert_eq!(day.semi_major_axis, elements.semi_major_axis);
    }

    #[test]
    fn j2_apsides_freeze_at_critical_inclination() {
        let mut elements = leo();
        elements.inclination = (4.0_f64 / 5.0).sqrt().asin();
        let propagator = KeplerPropagator::with_model(elements, KeplerModel::j2());
        let later = propagator.elements_at(start() + Duration::from_seconds(86400.0));
        assert_abs_diff_eq!(later.arg_perigee, elements.arg_perigee, epsilon = 1e-12);
    }

    #[test]
    fn drag_decays_orbit() {
        let elements = leo();
        let propagator = KeplerPropagator::with_model(elements, KeplerModel::drag(1e-13, 0.0));
        let later = propagator.elements_at(start() + Duration::from_seconds(86400.0));
        assert!(later.semi_major_axis < elements.semi_major_axis);
        assert!(later.eccentricity < elements.eccentricity);
    }

    #[test]
    fn drag_decay_stops_at_circular() {
        let mut elements = leo();
        elements.eccentricity = 1e-4;
        let mut propagator =
            KeplerPropagator::with_model(elements, KeplerModel::drag(1e-12, 0.0));
        let month = start() + Duration::from_seconds(30.0 * 86400.0);

        let later = propagator.elements_at(month);
        assert_eq!(later.eccentricity, 0.0);
        assert!(later.semi_major_axis < elements.semi_major_axis);

        let state = propagator.propagate(month);
        assert!(state.position.iter().all(|x| x.is_finite()));
        assert_relative_eq!(
            state.position.magnitude(),
            later.semi_major_axis,
            max_relative = 1e-9
        );
    }

    #[test]
    fn default_model_keeps_shape_and_orientation() {
        let elements = leo();
        let propagator = KeplerPropagator::new(elements);
        let later = propagator.elements_at(start() + Duration::from_seconds(12345.0));
        assert_eq!(later.semi_major_axis, elements.semi_major_axis);
        assert_eq!(later.eccentricity, elements.eccentricity);
        assert_eq!(later.raan, elements.raan);
        assert_eq!(later.arg_perigee, elements.arg_perigee);
    }
}
