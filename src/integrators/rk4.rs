use crate::physics::dynamics::EquationsOfMotion;
use hifitime::{Duration, Epoch};

/// Classical fourth-order Runge-Kutta step over any equations of motion.
pub struct RK4<T: EquationsOfMotion> {
    eom: T,
}

impl<T: EquationsOfMotion> RK4<T>
where
    T::State: Clone + std::ops::Add<Output = T::State> + std::ops::Mul<f64, Output = T::State>,
{
    pub fn new(eom: T) -> Self {
        RK4 { eom }
    }

    pub fn eom(&self) -> &T {
        &self.eom
    }

    pub fn eom_mut(&mut self) -> &mut T {
        &mut self.eom
    }

    /// Advances `state`, valid at `epoch`, by `dt` seconds. `dt` may be negative.
    pub fn integrate(&self, epoch: &Epoch, state: &T::State, dt: f64) -> T::State {
        let mid_epoch = *epoch + Duration::from_seconds(dt / 2.0);
        let end_epoch = *epoch + Duration::from_seconds(dt);

        let k1 = self.eom.compute_derivative(epoch, state);

        let state2 = state.clone() + k1.clone() * (dt / 2.0);
        let k2 = self.eom.compute_derivative(&mid_epoch, &state2);

        let state3 = state.clone() + k2.clone() * (dt / 2.0);
        let k3 = self.eom.compute_derivative(&mid_epoch, &state3);

        let state4 = state.clone() + k3.clone() * dt;
        let k4 = self.eom.compute_derivative(&end_epoch, &state4);

        state.clone() + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra as na;

    struct Decay;

    impl EquationsOfMotion for Decay {
        type State = f64;

        fn compute_derivative(&self, _epoch: &Epoch, state: &f64) -> f64 {
            -state
        }
    }

    /// x'' = -x, as [x, v]
    struct Oscillator;

    impl EquationsOfMotion for Oscillator {
        type State = na::Vector2<f64>;

        fn compute_derivative(&self, _epoch: &Epoch, state: &na::Vector2<f64>) -> na::Vector2<f64> {
            na::Vector2::new(state[1], -state[0])
        }
    }

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2020, 1, 1)
    }

    #[test]
    fn single_step_matches_taylor_series() {
        let h: f64 = 0.1;
        let result = RK4::new(Decay).integrate(&epoch(), &1.0, h);
        let expected = 1.0 - h + h.powi(2) / 2.0 - h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert_abs_diff_eq!(result, expected, epsilon = 1e-15);
    }

    #[test]
    fn backward_step_inverts_forward_step() {
        let rk4 = RK4::new(Oscillator);
        let start = na::Vector2::new(1.0, 0.0);
        let forward = rk4.integrate(&epoch(), &start, 0.01);
        let back = rk4.integrate(&epoch(), &forward, -0.01);
        assert_abs_diff_eq!(back, start, epsilon = 1e-11);
    }

    #[test]
    fn oscillator_period() {
        let rk4 = RK4::new(Oscillator);
        let mut state = na::Vector2::new(1.0, 0.0);
        let steps = 1000;
        let dt = 2.0 * std::f64::consts::PI / steps as f64;
        for _ in 0..steps {
            state = rk4.integrate(&epoch(), &state, dt);
        }
        assert_abs_diff_eq!(state, na::Vector2::new(1.0, 0.0), epsilon = 1e-9);
    }
}
