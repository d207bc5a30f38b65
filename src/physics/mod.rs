pub mod drag;
pub mod dynamics;
pub mod energy;
pub mod environment;
pub mod ephemeris;
pub mod force_model;
pub mod geopotential;
pub mod gravity;
pub mod orbital;
pub mod solar_radiation;
pub mod third_body;
