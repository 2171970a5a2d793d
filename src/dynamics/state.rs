use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Actuator limits
// ---------------------------------------------------------------------------

pub const RUDDER_LIMIT: f64 = FRAC_PI_4; // rad, symmetric
pub const SAIL_LIMIT: f64 = FRAC_PI_2; // rad, upper bound of the sheet opening

// ---------------------------------------------------------------------------
// Boat kinematic state
// ---------------------------------------------------------------------------

/// Planar kinematic state of the boat. Heading is CCW from +x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoatState {
    pub time: f64,            // s
    pub pos: Vector2<f64>,    // leg units
    pub heading: f64,         // rad
}

impl BoatState {
    pub fn new(pos: Vector2<f64>, heading: f64) -> Self {
        Self { time: 0.0, pos, heading }
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.pos.x.is_finite()
            && self.pos.y.is_finite()
            && self.heading.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Wind observation
// ---------------------------------------------------------------------------

/// Instantaneous wind. `speed` is carried for downstream sail power
/// decisions; the control law only reads `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    pub direction: f64, // rad
    pub speed: f64,
}

impl Wind {
    pub fn new(direction: f64, speed: f64) -> Self {
        Self { direction, speed }
    }

    pub fn is_finite(&self) -> bool {
        self.direction.is_finite() && self.speed.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Control command output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlCommand {
    pub rudder: f64,   // rad, in [-RUDDER_LIMIT, RUDDER_LIMIT]
    pub max_sail: f64, // rad, in [0, SAIL_LIMIT]; a limit for the sheet actuator, not a setpoint
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,
    /// Heading change per tick per radian of rudder. Negative: a positive
    /// rudder deflection yaws the hull clockwise.
    pub rudder_gain: f64,
    pub speed: f64,
    pub max_steps: usize,
    /// The run ends once the boat is this close to the leg end, or when it
    /// crosses the perpendicular through the leg end, whichever comes first.
    pub arrival_radius: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            rudder_gain: -0.1,
            speed: 5.0,     // 5 units per tick at dt = 1
            max_steps: 500,
            arrival_radius: 10.0, // two ticks of travel
        }
    }
}
