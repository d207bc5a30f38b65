pub mod interpolator;
pub mod kepler;
pub mod runge_kutta;

pub use interpolator::{InterpolationMethod, InterpolatorPropagator};
pub use kepler::{KeplerModel, KeplerPropagator};
pub use runge_kutta::RungeKutta4Propagator;

use crate::models::state::State;
use hifitime::{Duration, Epoch};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagatorKind {
    RungeKutta4,
    Kepler,
    Interpolator,
}

impl fmt::Display for PropagatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropagatorKind::RungeKutta4 => "runge-kutta-4",
            PropagatorKind::Kepler => "kepler",
            PropagatorKind::Interpolator => "interpolator",
        };
        write!(f, "{}", name)
    }
}

/// Common contract of the propagator family.
///
/// A propagator keeps its initial state untouched and caches the result of the
/// last propagation; `reset` copies the initial state back into the cache.
pub trait Propagator {
    fn kind(&self) -> PropagatorKind;

    /// Most recently propagated state.
    fn state(&self) -> &State;

    fn propagate(&mut self, epoch: Epoch) -> State;

    /// Propagates to `epoch` and then `count` more times, `interval` seconds
    /// apart. A negative interval steps backwards in time. Returns `count + 1`
    /// states.
    fn step(&mut self, epoch: Epoch, interval: f64, count: usize) -> Vec<State> {
        let mut output = Vec::with_capacity(count + 1);
        output.push(self.propagate(epoch));

        let mut target = epoch;
        for _ in 0..count {
            target = target + Duration::from_seconds(interval);
            output.push(self.propagate(target));
        }

        output
    }

    fn reset(&mut self);
}
