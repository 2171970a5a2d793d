use std::fmt;

use serde::{Deserialize, Serialize};

use super::params::ControllerParams;

// ---------------------------------------------------------------------------
// Tack state machine
// ---------------------------------------------------------------------------

/// Side of the path the boat is committed to correcting from.
///
/// There is deliberately no `Default`: the caller picks the initial tack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Tack {
    Port,
    Starboard,
}

impl Tack {
    /// -1 for port, +1 for starboard.
    pub fn sign(self) -> f64 {
        match self {
            Tack::Port => -1.0,
            Tack::Starboard => 1.0,
        }
    }

    /// Tack matching the sign of `value`, or `None` for zero/NaN.
    pub fn from_sign(value: f64) -> Option<Tack> {
        if value > 0.0 {
            Some(Tack::Starboard)
        } else if value < 0.0 {
            Some(Tack::Port)
        } else {
            None
        }
    }

    /// Hysteresis update: commit to `sign(cross_track)` only outside the band
    /// `|cross_track| > params.hysteresis_band()`, otherwise hold.
    ///
    /// Zero cross-track is always inside the band, and `from_sign` returning
    /// `None` falls back to the held tack, so no third state can appear.
    pub fn update(self, cross_track: f64, params: &ControllerParams) -> Tack {
        if cross_track.abs() > params.hysteresis_band() {
            Tack::from_sign(cross_track).unwrap_or(self)
        } else {
            self
        }
    }
}

impl From<Tack> for i8 {
    fn from(tack: Tack) -> i8 {
        match tack {
            Tack::Port => -1,
            Tack::Starboard => 1,
        }
    }
}

impl TryFrom<i8> for Tack {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Tack::Port),
            1 => Ok(Tack::Starboard),
            other => Err(format!("tack must be -1 or +1, got {}", other)),
        }
    }
}

impl fmt::Display for Tack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Tack::Port => "port",
            Tack::Starboard => "starboard",
        })
    }
}
