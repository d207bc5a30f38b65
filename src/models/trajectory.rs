use crate::errors::PropagatorErrors;
use crate::models::state::State;
use hifitime::Epoch;
use serde::Serialize;
use std::io::Write;

/// Time-ordered series of states. Epochs are strictly increasing or strictly
/// decreasing, and there is at least one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    states: Vec<State>,
}

#[derive(Serialize)]
struct StateRecord {
    epoch: String,
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
}

impl From<&State> for StateRecord {
    fn from(state: &State) -> Self {
        StateRecord {
            epoch: state.epoch.to_string(),
            x: state.position.x,
            y: state.position.y,
            z: state.position.z,
            vx: state.velocity.x,
            vy: state.velocity.y,
            vz: state.velocity.z,
        }
    }
}

impl Trajectory {
    pub fn new(states: Vec<State>) -> Result<Self, PropagatorErrors> {
        if states.is_empty() {
            return Err(PropagatorErrors::EmptyTrajectory);
        }

        if states.len() > 1 {
            let ascending = states[1].epoch > states[0].epoch;
            for (index, pair) in states.windows(2).enumerate() {
                let ordered = if ascending {
                    pair[1].epoch > pair[0].epoch
                } else {
                    pair[1].epoch < pair[0].epoch
                };
                if !ordered {
                    return Err(PropagatorErrors::UnorderedTrajectory(index + 1));
                }
            }
        }

        Ok(Trajectory { states })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn into_states(self) -> Vec<State> {
        self.states
    }

    pub fn first(&self) -> &State {
        &self.states[0]
    }

    pub fn last(&self) -> &State {
        &self.states[self.states.len() - 1]
    }

    pub fn is_ascending(&self) -> bool {
        self.last().epoch >= self.first().epoch
    }

    /// Whether `epoch` lies within the sampled span, endpoints included.
    pub fn covers(&self, epoch: &Epoch) -> bool {
        let (start, end) = if self.is_ascending() {
            (self.first().epoch, self.last().epoch)
        } else {
            (self.last().epoch, self.first().epoch)
        };
        *epoch >= start && *epoch <= end
    }

    fn offset(&self, index: usize, epoch: &Epoch) -> f64 {
        (self.states[index].epoch - *epoch).to_seconds().abs()
    }

    /// Index of the sample closest in time to `epoch`.
    ///
    /// With a `hint` (typically the previous answer) the search walks from the
    /// hint, which is constant time for sequential queries; otherwise it is a
    /// binary search. Ties go to the earlier index.
    pub fn nearest_index(&self, epoch: &Epoch, hint: Option<usize>) -> usize {
        let last = self.states.len() - 1;

        let mut index = match hint {
            Some(hint) => hint.min(last),
            None => {
                let split = if self.is_ascending() {
                    self.states.partition_point(|s| s.epoch < *epoch)
                } else {
                    self.states.partition_point(|s| s.epoch > *epoch)
                };
                split.saturating_sub(1)
            }
        };

        // |t_i - t| is unimodal over a monotonic series
        while index < last && self.offset(index + 1, epoch) < self.offset(index, epoch) {
            index += 1;
        }
        while index > 0 && self.offset(index - 1, epoch) <= self.offset(index, epoch) {
            index -= 1;
        }

        index
    }

    /// Writes one CSV row per state (epoch, position in km, velocity in km/s).
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), PropagatorErrors> {
        let mut wtr = csv::Writer::from_writer(writer);
        for state in &self.states {
            wtr.serialize(StateRecord::from(state))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
