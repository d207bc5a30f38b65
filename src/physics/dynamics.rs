use hifitime::Epoch;

pub trait EquationsOfMotion {
    type State;

    /// Time derivative of `state` at `epoch`.
    fn compute_derivative(&self, epoch: &Epoch, state: &Self::State) -> Self::State;
}
