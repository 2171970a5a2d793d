use std::f64::consts::PI;

use super::params::ControllerParams;
use super::tack::Tack;

// ---------------------------------------------------------------------------
// Guidance: desired heading from cross-track error and wind
// ---------------------------------------------------------------------------

/// Heading the rudder loop should steer to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingTarget {
    pub heading: f64,       // rad
    pub close_hauled: bool, // true when the line-of-sight heading was in the no-go zone
}

/// Line-of-sight heading `phi - (2 gamma_inf / pi) atan(e / r)`.
///
/// Bounded by `phi +/- gamma_inf` and equal to `phi` on the line.
pub fn nominal_heading(bearing: f64, cross_track: f64, params: &ControllerParams) -> f64 {
    let gain = 2.0 * params.incidence_angle() / PI;
    bearing - gain * (cross_track / params.cutoff_distance()).atan()
}

/// True when `heading` cannot be sailed directly with the wind blowing
/// towards `wind_dir`: `cos(psi - theta) + cos(zeta) < 0`.
pub fn in_no_go_zone(wind_dir: f64, heading: f64, close_hauled_angle: f64) -> bool {
    (wind_dir - heading).cos() + close_hauled_angle.cos() < 0.0
}

/// Target heading: the line-of-sight heading, or the close-hauled course
/// `pi + psi - q zeta` on the current tack when it points upwind.
pub fn target_heading(
    bearing: f64,
    cross_track: f64,
    wind_dir: f64,
    tack: Tack,
    params: &ControllerParams,
) -> HeadingTarget {
    let nominal = nominal_heading(bearing, cross_track, params);
    let zeta = params.close_hauled_angle();

    if in_no_go_zone(wind_dir, nominal, zeta) {
        HeadingTarget {
            heading: PI + wind_dir - tack.sign() * zeta,
            close_hauled: true,
        }
    } else {
        HeadingTarget {
            heading: nominal,
            close_hauled: false,
        }
    }
}
