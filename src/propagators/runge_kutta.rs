use super::{Propagator, PropagatorKind};
use crate::integrators::rk4::RK4;
use crate::models::state::State;
use crate::physics::force_model::ForceModel;
use hifitime::Epoch;
use log::{debug, trace, warn};

/// Default RK4 sub-step in seconds.
pub const DEFAULT_STEP_SIZE: f64 = 15.0;

/// Numerical propagator: fixed-size RK4 sub-steps over a configurable force model.
pub struct RungeKutta4Propagator {
    init_state: State,
    cache_state: State,
    step_size: f64,
    integrator: RK4<ForceModel>,
}

impl RungeKutta4Propagator {
    /// Two-body force model, default step size.
    pub fn new(state: State) -> Self {
        Self::with_force_model(state, ForceModel::new())
    }

    pub fn with_force_model(state: State, force_model: ForceModel) -> Self {
        RungeKutta4Propagator {
            init_state: state,
            cache_state: state,
            step_size: DEFAULT_STEP_SIZE,
            integrator: RK4::new(force_model),
        }
    }

    pub fn init_state(&self) -> &State {
        &self.init_state
    }

    /// Replaces the initial state and resets the cache to it.
    pub fn set_init_state(&mut self, state: State) {
        self.init_state = state;
        self.cache_state = state;
    }

    pub fn force_model(&self) -> &ForceModel {
        self.integrator.eom()
    }

    pub fn force_model_mut(&mut self) -> &mut ForceModel {
        self.integrator.eom_mut()
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Sub-step magnitude in seconds; the sign is ignored. A zero or
    /// non-finite step could never reach the target epoch, so it is logged and
    /// the current step size is kept.
    pub fn set_step_size(&mut self, seconds: f64) {
        if seconds == 0.0 || !seconds.is_finite() {
            warn!(
                "Ignoring RK4 step size of {} s, keeping {} s",
                seconds, self.step_size
            );
            return;
        }
        self.step_size = seconds.abs();
        debug!("RK4 step size set to {} s", self.step_size);
    }

    fn integrate(&self, state: &State, dt: f64) -> State {
        let posvel = self.integrator.integrate(&state.epoch, &state.posvel(), dt);
        State::from_posvel(state.roll(dt), &posvel)
    }
}

impl Propagator for RungeKutta4Propagator {
    fn kind(&self) -> PropagatorKind {
        PropagatorKind::RungeKutta4
    }

    fn state(&self) -> &State {
        &self.cache_state
    }

    /// Sub-steps from the cached state towards `epoch`, in whichever direction
    /// it lies. The last sub-step is shortened to land exactly on `epoch`.
    fn propagate(&mut self, epoch: Epoch) -> State {
        let mut sub_steps = 0usize;

        while self.cache_state.epoch != epoch {
            let delta = (epoch - self.cache_state.epoch).to_seconds();
            let magnitude = self.step_size.min(delta.abs());
            let mut next = self.integrate(&self.cache_state, magnitude.copysign(delta));

            if magnitude >= delta.abs() {
                next.epoch = epoch;
            }

            self.cache_state = next;
            sub_steps += 1;
        }

        trace!(
            "RK4 reached {} in {} sub-steps of {} s",
            epoch,
            sub_steps,
            self.step_size
        );
        self.cache_state
    }

    fn reset(&mut self) {
        debug!("Resetting {} propagator to {}", self.kind(), self.init_state.epoch);
        self.cache_state = self.init_state;
    }
}
