pub mod leg;

pub use leg::{cross_track, Leg, LegGeometry};

use std::f64::consts::{PI, TAU};

/// Wrap an angle into (-pi, pi].
pub fn wrap_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
