//! Line-following guidance and tack controller for autonomous sailboats.
//!
//! Per tick the controller turns a position, heading, wind direction and the
//! current leg into a rudder deflection and a sail opening limit, holding one
//! piece of state between ticks: the tack.
//!
//! ```
//! use nalgebra::Vector2;
//! use sail_guidance::gnc::{control, ControllerParams, Tack};
//!
//! let params = ControllerParams::default();
//! let out = control(
//!     &Vector2::new(0.0, -50.0),
//!     0.0,
//!     std::f64::consts::FRAC_PI_3,
//!     &Vector2::new(-50.0, 50.0),
//!     &Vector2::new(50.0, 50.0),
//!     Tack::Starboard,
//!     &params,
//! )?;
//! assert_eq!(out.tack, Tack::Port);
//! # Ok::<(), sail_guidance::error::GuidanceError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod dynamics;
mod gnc_mod;
pub mod sim;
pub mod driver;
pub mod telemetry;
pub mod config;
pub mod io;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub mod types {
    pub use crate::dynamics::state::{BoatState, ControlCommand, SimConfig, Wind};
    pub use crate::error::GuidanceError;
    pub use crate::geometry::Leg;
    pub use crate::gnc::{ControllerParams, Tack};
}
