use log::info;

use crate::dynamics::state::{BoatState, ControlCommand, SimConfig, Wind};
use crate::error::GuidanceError;
use crate::geometry::Leg;
use crate::gnc::{Controller, ControllerParams, HeadingTarget, LineFollowController, Tack};
use super::event::{
    ArrivalDetector, CloseHauledDetector, EventDetector, EventKind, SimEvent, TackSwitchDetector,
};
use super::integrator::kinematic_step;
use super::wind::WindProvider;

// ---------------------------------------------------------------------------
// Per-tick record
// ---------------------------------------------------------------------------

/// What the controller saw and commanded on one tick.
#[derive(Debug, Clone)]
pub struct Sample {
    pub step: usize,
    pub state: BoatState,
    pub wind: Wind,
    pub command: ControlCommand,
    pub tack: Option<Tack>,
    pub target: Option<HeadingTarget>,
    pub cross_track: f64,
}

#[derive(Debug, Clone)]
pub struct SimOutput {
    pub samples: Vec<Sample>,
    pub events: Vec<SimEvent>,
    pub final_state: BoatState,
    pub arrived: bool,
}

impl SimOutput {
    pub fn tack_switches(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::TackSwitch { .. }))
            .count()
    }

    pub fn max_abs_cross_track(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.cross_track.abs())
            .fold(0.0_f64, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Closed-loop run
// ---------------------------------------------------------------------------

/// Run the controller against the kinematic model until the boat passes the
/// end of `leg` or `config.max_steps` ticks have elapsed.
pub fn simulate_with(
    initial: BoatState,
    leg: &Leg,
    wind: &mut dyn WindProvider,
    config: &SimConfig,
    controller: &mut dyn Controller,
) -> Result<SimOutput, GuidanceError> {
    info!(
        "Simulating {} on leg {:?} -> {:?} ({} steps max)",
        controller.name(),
        leg.start(),
        leg.end(),
        config.max_steps
    );

    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(TackSwitchDetector),
        Box::new(CloseHauledDetector),
        Box::new(ArrivalDetector::new(*leg, config.arrival_radius)),
    ];

    let mut state = initial;
    let mut samples: Vec<Sample> = Vec::with_capacity(config.max_steps.min(100_000));
    let mut events = Vec::new();
    let mut arrived = false;

    for step in 0..config.max_steps {
        let w = wind.wind_at(step, state.time);
        let command = controller.control(&state, &w, leg)?;

        let sample = Sample {
            step,
            state,
            wind: w,
            command,
            tack: controller.tack(),
            target: controller.last_target(),
            cross_track: leg.geometry(&state.pos).cross_track,
        };

        if let Some(prev) = samples.last() {
            for det in detectors.iter_mut() {
                if let Some(kind) = det.check(prev, &sample) {
                    arrived |= kind == EventKind::Arrival;
                    events.push(SimEvent { step, time: state.time, kind });
                }
            }
        }
        samples.push(sample);

        if arrived {
            break;
        }

        state = kinematic_step(&state, &command, config);
    }

    info!(
        "Finished after {} ticks: arrived={}, {} events",
        samples.len(),
        arrived,
        events.len()
    );

    Ok(SimOutput {
        samples,
        events,
        final_state: state,
        arrived,
    })
}

/// Simulate with a fresh `LineFollowController` (convenience wrapper).
pub fn simulate(
    initial: BoatState,
    leg: &Leg,
    wind: &mut dyn WindProvider,
    config: &SimConfig,
    params: ControllerParams,
    initial_tack: Tack,
) -> Result<SimOutput, GuidanceError> {
    let mut controller = LineFollowController::new(params, initial_tack);
    simulate_with(initial, leg, wind, config, &mut controller)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
