use crate::dynamics::state::{BoatState, ControlCommand, SimConfig};

// ---------------------------------------------------------------------------
// Kinematic boat model (test harness only)
// ---------------------------------------------------------------------------

/// Advance the boat one tick: turn by `rudder * rudder_gain`, then move
/// `speed * dt` along the new heading. Deterministic.
pub fn kinematic_step(state: &BoatState, cmd: &ControlCommand, config: &SimConfig) -> BoatState {
    let heading = state.heading + cmd.rudder * config.rudder_gain;
    let dir = nalgebra::Vector2::new(heading.cos(), heading.sin());

    BoatState {
        time: state.time + config.dt,
        pos: state.pos + dir * (config.speed * config.dt),
        heading,
    }
}
