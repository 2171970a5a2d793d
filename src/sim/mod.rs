pub mod integrator;
pub mod runner;
pub mod event;
pub mod wind;

pub use runner::{simulate, simulate_with, Sample, SimOutput};
pub use integrator::kinematic_step;
pub use wind::{ConstantWind, SteppedWind, WindProvider};
