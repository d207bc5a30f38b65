pub mod elements;
pub mod spacecraft;
pub mod state;
pub mod trajectory;

pub use elements::ClassicalElements;
pub use state::State;
pub use trajectory::Trajectory;
