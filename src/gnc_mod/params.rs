use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

use crate::error::GuidanceError;

// ---------------------------------------------------------------------------
// Controller parameters (validated once, immutable afterwards)
// ---------------------------------------------------------------------------

/// Tuning of the line-following law.
///
/// Fields are private so a value of this type is always valid: construction
/// fails closed instead of clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerParams {
    cutoff_distance: f64,
    incidence_angle: f64,
    close_hauled_angle: f64,
}

impl ControllerParams {
    /// * `cutoff_distance` (r): cross-track scale of the heading law, also the
    ///   width of the tack hysteresis band (`r / 2` each side). Must be > 0.
    /// * `incidence_angle` (gamma_inf): maximum heading deviation from the leg
    ///   bearing, in (0, pi/2).
    /// * `close_hauled_angle` (zeta): closest angle to the wind the boat can
    ///   hold, in (0, pi/2).
    pub fn new(
        cutoff_distance: f64,
        incidence_angle: f64,
        close_hauled_angle: f64,
    ) -> Result<Self, GuidanceError> {
        if !(cutoff_distance.is_finite() && cutoff_distance > 0.0) {
            return Err(GuidanceError::InvalidParameter {
                name: "cutoff_distance",
                value: cutoff_distance,
                reason: "must be finite and > 0",
            });
        }
        check_open_quarter("incidence_angle", incidence_angle)?;
        check_open_quarter("close_hauled_angle", close_hauled_angle)?;

        Ok(Self {
            cutoff_distance,
            incidence_angle,
            close_hauled_angle,
        })
    }

    pub fn cutoff_distance(&self) -> f64 {
        self.cutoff_distance
    }

    pub fn incidence_angle(&self) -> f64 {
        self.incidence_angle
    }

    pub fn close_hauled_angle(&self) -> f64 {
        self.close_hauled_angle
    }

    /// Half-width of the band inside which the tack is held.
    pub fn hysteresis_band(&self) -> f64 {
        self.cutoff_distance / 2.0
    }
}

impl Default for ControllerParams {
    /// r = 50, gamma_inf = pi/4, zeta = pi/3.
    fn default() -> Self {
        Self {
            cutoff_distance: 50.0,
            incidence_angle: FRAC_PI_4,
            close_hauled_angle: FRAC_PI_3,
        }
    }
}

fn check_open_quarter(name: &'static str, value: f64) -> Result<(), GuidanceError> {
    if value > 0.0 && value < FRAC_PI_2 {
        Ok(())
    } else {
        Err(GuidanceError::InvalidParameter {
            name,
            value,
            reason: "must lie in (0, pi/2)",
        })
    }
}
