use crate::geometry::Leg;
use crate::gnc::Tack;
use super::runner::Sample;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    TackSwitch { from: Tack, to: Tack },
    CloseHauledEntered,
    CloseHauledLeft,
    Arrival,
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub step: usize,
    pub time: f64,
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind>;
}

/// Detects a change of tack between ticks.
pub struct TackSwitchDetector;

impl EventDetector for TackSwitchDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        match (prev.tack, current.tack) {
            (Some(from), Some(to)) if from != to => Some(EventKind::TackSwitch { from, to }),
            _ => None,
        }
    }
}

/// Detects the heading target entering or leaving the close-hauled substitute.
pub struct CloseHauledDetector;

impl EventDetector for CloseHauledDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        let was = prev.target.map_or(false, |t| t.close_hauled);
        let is = current.target.map_or(false, |t| t.close_hauled);
        match (was, is) {
            (false, true) => Some(EventKind::CloseHauledEntered),
            (true, false) => Some(EventKind::CloseHauledLeft),
            _ => None,
        }
    }
}

/// Fires once when the boat comes within `radius` of the leg end, or failing
/// that, when it crosses the perpendicular through the leg end.
pub struct ArrivalDetector {
    leg: Leg,
    radius: f64,
    fired: bool,
}

impl ArrivalDetector {
    pub fn new(leg: Leg, radius: f64) -> Self {
        Self { leg, radius, fired: false }
    }
}

impl EventDetector for ArrivalDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let length = self.leg.length();
        let within = (current.state.pos - self.leg.end()).norm() <= self.radius;
        let crossed = self.leg.along_track(&prev.state.pos) < length
            && self.leg.along_track(&current.state.pos) >= length;
        if within || crossed {
            self.fired = true;
            Some(EventKind::Arrival)
        } else {
            None
        }
    }
}
