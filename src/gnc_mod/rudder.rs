use crate::dynamics::state::RUDDER_LIMIT;

// ---------------------------------------------------------------------------
// Rudder law
// ---------------------------------------------------------------------------

/// Rudder deflection for heading `heading` and target `target` (rad).
///
/// Proportional to `sin(heading - target)` while the error is within +/-90
/// deg, then held at the limit so turning effort does not fade as the error
/// approaches 180 deg. At exactly 180 deg `sin` is +/-0 and `signum` picks the
/// side from its sign bit.
pub fn rudder_angle(heading: f64, target: f64) -> f64 {
    let error = heading - target;
    if error.cos() >= 0.0 {
        RUDDER_LIMIT * error.sin()
    } else {
        RUDDER_LIMIT * error.sin().signum()
    }
}
