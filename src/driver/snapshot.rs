use std::sync::{Arc, Mutex, PoisonError};

use crate::dynamics::state::{BoatState, Wind};
use crate::geometry::Leg;
use crate::telemetry::{validate_angle, LocalFrame, TelemetryRecord};
use super::DriverError;

// ---------------------------------------------------------------------------
// Input snapshot
// ---------------------------------------------------------------------------

/// Everything the controller needs for one tick, captured together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub boat: BoatState,
    pub wind: Wind,
    pub leg: Leg,
}

impl Snapshot {
    /// Snapshot from a relayed sensor record: heading from the attitude yaw,
    /// position from the GPS fix projected into `frame`.
    pub fn from_telemetry(
        record: &TelemetryRecord,
        frame: &LocalFrame,
        wind: Wind,
        leg: Leg,
    ) -> Result<Self, DriverError> {
        let heading = record.heading()?;
        let pos = record.position(frame)?;
        let snapshot = Snapshot { boat: BoatState::new(pos, heading), wind, leg };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject non-finite values and out-of-range angles so they can never
    /// reach an actuator.
    pub fn validate(&self) -> Result<(), DriverError> {
        if !self.boat.is_finite() {
            return Err(DriverError::InvalidSnapshot("boat state"));
        }
        if !self.wind.is_finite() {
            return Err(DriverError::InvalidSnapshot("wind"));
        }
        let (a, b) = (self.leg.start(), self.leg.end());
        if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
            return Err(DriverError::InvalidSnapshot("leg"));
        }
        validate_angle("heading", self.boat.heading)?;
        validate_angle("wind direction", self.wind.direction)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Input providers
// ---------------------------------------------------------------------------

/// Where the driver pulls its input from each tick.
pub trait InputProvider {
    /// Latest snapshot, or `None` if nothing has been published yet.
    fn latest(&mut self) -> Result<Option<Snapshot>, DriverError>;
}

/// Latest-value handoff between an acquisition thread and the driver.
///
/// Writers replace the whole record, readers get a complete copy; a record is
/// never observed half-written.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    slot: Mutex<Option<Arc<Snapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(next);
    }

    pub fn load(&self) -> Option<Arc<Snapshot>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl InputProvider for &SnapshotCell {
    fn latest(&mut self) -> Result<Option<Snapshot>, DriverError> {
        Ok(self.load().map(|s| *s))
    }
}

impl InputProvider for Arc<SnapshotCell> {
    fn latest(&mut self) -> Result<Option<Snapshot>, DriverError> {
        Ok(self.load().map(|s| *s))
    }
}

/// Feeds the driver from relayed sensor records.
///
/// Wind and leg come from the caller; the record supplies heading and
/// position. A record that fails validation is reported on the tick that
/// reads it.
#[derive(Debug, Clone)]
pub struct TelemetryInput {
    frame: LocalFrame,
    wind: Wind,
    leg: Leg,
    record: Option<TelemetryRecord>,
}

impl TelemetryInput {
    pub fn new(frame: LocalFrame, wind: Wind, leg: Leg) -> Self {
        Self { frame, wind, leg, record: None }
    }

    pub fn push(&mut self, record: TelemetryRecord) {
        self.record = Some(record);
    }

    pub fn set_wind(&mut self, wind: Wind) {
        self.wind = wind;
    }

    pub fn set_leg(&mut self, leg: Leg) {
        self.leg = leg;
    }
}

impl InputProvider for TelemetryInput {
    fn latest(&mut self) -> Result<Option<Snapshot>, DriverError> {
        self.record
            .as_ref()
            .map(|r| Snapshot::from_telemetry(r, &self.frame, self.wind, self.leg))
            .transpose()
    }
}
