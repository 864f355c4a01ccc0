pub mod interpolate;
pub mod spring;
