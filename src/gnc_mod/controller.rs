use crate::dynamics::state::{BoatState, ControlCommand, Wind};
use crate::error::GuidanceError;
use crate::geometry::Leg;

use super::guidance::HeadingTarget;
use super::tack::Tack;

/// Trait for steering controllers.
///
/// Implement this to plug a custom controller into the simulation runner or
/// the periodic driver. Each instance belongs to exactly one control stream.
pub trait Controller {
    /// Compute the command for the current snapshot.
    fn control(
        &mut self,
        boat: &BoatState,
        wind: &Wind,
        leg: &Leg,
    ) -> Result<ControlCommand, GuidanceError>;

    /// Restore the controller to its initial state.
    fn reset(&mut self) {}

    /// Current tack, for controllers that keep one.
    fn tack(&self) -> Option<Tack> {
        None
    }

    /// Heading target used by the last `control` call.
    fn last_target(&self) -> Option<HeadingTarget> {
        None
    }

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
