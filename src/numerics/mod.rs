pub mod interpolation;
