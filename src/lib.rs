pub mod config;
pub mod constants;
pub mod coordinates;
pub mod errors;
pub mod integrators;
pub mod models;
pub mod numerics;
pub mod physics;
pub mod propagators;
