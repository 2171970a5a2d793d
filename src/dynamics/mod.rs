pub mod state;

pub use state::{BoatState, ControlCommand, SimConfig, Wind, RUDDER_LIMIT, SAIL_LIMIT};
