//! Fixed-rate control loop.
//!
//! The driver pulls the latest [`Snapshot`] from an [`InputProvider`] on a
//! wall-clock period, runs the controller, and hands the result to an
//! [`Observer`]. Observers only read: nothing they do feeds back into the
//! controller.

pub mod snapshot;

pub use snapshot::{InputProvider, Snapshot, SnapshotCell, TelemetryInput};

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dynamics::state::ControlCommand;
use crate::error::GuidanceError;
use crate::gnc::Controller;
use crate::telemetry::TelemetryError;

// ---------------------------------------------------------------------------
// Errors and config
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Rejected snapshot: non-finite {0}")]
    InvalidSnapshot(&'static str),

    #[error("Control rate must be finite and > 0 Hz, found {0}")]
    InvalidRate(f64),

    #[error(transparent)]
    Guidance(#[from] GuidanceError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub rate_hz: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { rate_hz: 10.0 }
    }
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

/// Read-only subscriber to the driver's output.
pub trait Observer {
    fn observe(&mut self, snapshot: &Snapshot, command: &ControlCommand);
}

/// Discards everything.
pub struct NullObserver;

impl Observer for NullObserver {
    fn observe(&mut self, _snapshot: &Snapshot, _command: &ControlCommand) {}
}

/// Keeps every (snapshot, command) pair.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub records: Vec<(Snapshot, ControlCommand)>,
}

impl Observer for RecordingObserver {
    fn observe(&mut self, snapshot: &Snapshot, command: &ControlCommand) {
        self.records.push((*snapshot, *command));
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub ticks: usize,
    pub commanded: usize,
    pub idle: usize,
    pub rejected: usize,
}

pub struct Driver<C: Controller> {
    controller: C,
    period: Duration,
    stats: DriverStats,
}

impl<C: Controller> Driver<C> {
    pub fn new(controller: C, config: &DriverConfig) -> Result<Self, DriverError> {
        if !(config.rate_hz.is_finite() && config.rate_hz > 0.0) {
            return Err(DriverError::InvalidRate(config.rate_hz));
        }
        Ok(Self {
            controller,
            period: Duration::from_secs_f64(1.0 / config.rate_hz),
            stats: DriverStats::default(),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// One tick, no sleeping.
    ///
    /// `Ok(None)` when nothing has been published yet. Invalid snapshots and
    /// guidance failures are returned to the caller and nothing is observed.
    pub fn tick(
        &mut self,
        provider: &mut dyn InputProvider,
        observer: &mut dyn Observer,
    ) -> Result<Option<ControlCommand>, DriverError> {
        self.stats.ticks += 1;

        let latest = provider.latest().map_err(|e| {
            self.stats.rejected += 1;
            e
        })?;
        let snapshot = match latest {
            Some(s) => s,
            None => {
                self.stats.idle += 1;
                return Ok(None);
            }
        };

        let command = snapshot
            .validate()
            .and_then(|_| {
                self.controller
                    .control(&snapshot.boat, &snapshot.wind, &snapshot.leg)
                    .map_err(DriverError::from)
            })
            .map_err(|e| {
                self.stats.rejected += 1;
                e
            })?;

        self.stats.commanded += 1;
        observer.observe(&snapshot, &command);
        Ok(Some(command))
    }

    /// Run `ticks` ticks at the configured rate. Failed ticks are logged and
    /// the loop carries on with the next one.
    pub fn run(
        &mut self,
        provider: &mut dyn InputProvider,
        observer: &mut dyn Observer,
        ticks: usize,
    ) -> DriverStats {
        info!(
            "Driving {} at {:.1} Hz for {} ticks",
            self.controller.name(),
            1.0 / self.period.as_secs_f64(),
            ticks
        );

        let mut deadline = Instant::now();
        for _ in 0..ticks {
            match self.tick(provider, observer) {
                Ok(Some(cmd)) => {
                    debug!("rudder {:.3} rad, max sail {:.3} rad", cmd.rudder, cmd.max_sail)
                }
                Ok(None) => debug!("no snapshot yet"),
                Err(e) => warn!("tick skipped: {}", e),
            }

            deadline += self.period;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                // Overran: restart the schedule rather than bursting to catch up
                deadline = now;
            }
        }

        info!("Driver stopped: {:?}", self.stats);
        self.stats
    }
}
