use super::runge_kutta::RungeKutta4Propagator;
use super::{Propagator, PropagatorKind};
use crate::errors::PropagatorErrors;
use crate::models::state::State;
use crate::models::trajectory::Trajectory;
use crate::numerics::interpolation::{centered_window, lagrange_interpolate};
use crate::physics::force_model::{ForceModel, Perturbation};
use hifitime::Epoch;
use log::{debug, warn};
use nalgebra as na;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMethod {
    /// Short RK4 integration from the nearest sample.
    ForceModel,
    /// Lagrange polynomial through `order + 1` samples around the query.
    Lagrange { order: usize },
}

impl Default for InterpolationMethod {
    fn default() -> Self {
        InterpolationMethod::ForceModel
    }
}

/// Reconstructs states between the samples of a precomputed trajectory.
///
/// Queries outside the sampled span are extrapolated from the closest end
/// sample; a warning is logged but the answer is still returned.
pub struct InterpolatorPropagator {
    trajectory: Trajectory,
    method: InterpolationMethod,
    refiner: RungeKutta4Propagator,
    cache_state: State,
    last_index: Option<usize>,
}

impl InterpolatorPropagator {
    pub fn new(trajectory: Trajectory) -> Self {
        let first = *trajectory.first();
        let force_model = ForceModel::new().with(Perturbation::J2);
        InterpolatorPropagator {
            trajectory,
            method: InterpolationMethod::default(),
            refiner: RungeKutta4Propagator::with_force_model(first, force_model),
            cache_state: first,
            last_index: None,
        }
    }

    pub fn from_states(states: Vec<State>) -> Result<Self, PropagatorErrors> {
        Ok(Self::new(Trajectory::new(states)?))
    }

    pub fn with_method(mut self, method: InterpolationMethod) -> Self {
        self.set_method(method);
        self
    }

    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    pub fn set_method(&mut self, method: InterpolationMethod) {
        debug!("Interpolation method set to {:?}", method);
        self.method = method;
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Force model used by [`InterpolationMethod::ForceModel`] refinement.
    pub fn force_model_mut(&mut self) -> &mut ForceModel {
        self.refiner.force_model_mut()
    }

    pub fn set_step_size(&mut self, seconds: f64) {
        self.refiner.set_step_size(seconds);
    }

    fn refine(&mut self, index: usize, epoch: Epoch) -> State {
        self.refiner.set_init_state(self.trajectory.states()[index]);
        self.refiner.propagate(epoch)
    }

    fn lagrange(&self, index: usize, order: usize, epoch: Epoch) -> State {
        let states = self.trajectory.states();
        let start = centered_window(index, order + 1, states.len());
        let window = &states[start..(start + (order + 1).min(states.len()))];

        let origin = window[0].epoch;
        let times: Vec<f64> = window.iter().map(|s| (s.epoch - origin).to_seconds()).collect();
        let t = (epoch - origin).to_seconds();

        let mut posvel = na::Vector6::zeros();
        for component in 0..6 {
            let values: Vec<f64> = window.iter().map(|s| s.posvel()[component]).collect();
            posvel[component] = lagrange_interpolate(&times, &values, t);
        }

        State::from_posvel(epoch, &posvel)
    }
}

impl Propagator for InterpolatorPropagator {
    fn kind(&self) -> PropagatorKind {
        PropagatorKind::Interpolator
    }

    fn state(&self) -> &State {
        &self.cache_state
    }

    fn propagate(&mut self, epoch: Epoch) -> State {
        if !self.trajectory.covers(&epoch) {
            warn!(
                "Interpolation epoch {} outside trajectory [{}, {}], extrapolating",
                epoch,
                self.trajectory.first().epoch,
                self.trajectory.last().epoch
            );
        }

        let index = self.trajectory.nearest_index(&epoch, self.last_index);
        self.last_index = Some(index);

        self.cache_state = match self.method {
            InterpolationMethod::ForceModel => self.refine(index, epoch),
            InterpolationMethod::Lagrange { order } => self.lagrange(index, order, epoch),
        };
        self.cache_state
    }

    fn reset(&mut self) {
        debug!("Resetting {} propagator", self.kind());
        self.cache_state = *self.trajectory.first();
        self.last_index = None;
    }
}
