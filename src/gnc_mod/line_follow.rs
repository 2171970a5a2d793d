use log::debug;
use nalgebra::Vector2;

use crate::dynamics::state::{BoatState, ControlCommand, Wind};
use crate::error::GuidanceError;
use crate::geometry::{cross_track, Leg, LegGeometry};
use super::guidance::{target_heading, HeadingTarget};
use super::params::ControllerParams;
use super::rudder::rudder_angle;
use super::sail::max_sail_angle;
use super::tack::Tack;

// ---------------------------------------------------------------------------
// Single tick: geometry -> tack -> target -> rudder, sail
// ---------------------------------------------------------------------------

/// Everything one tick of the line-following law produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput {
    pub command: ControlCommand,
    /// Tack to pass back in on the next tick.
    pub tack: Tack,
    pub target: HeadingTarget,
    pub cross_track: f64,
}

/// Stateless form of the controller. Angles in rad, CCW from +x.
///
/// Fails only on a degenerate leg: coincident endpoints, or endpoints so far
/// apart that the leg length is not finite.
pub fn control(
    position: &Vector2<f64>,
    heading: f64,
    wind_dir: f64,
    leg_start: &Vector2<f64>,
    leg_end: &Vector2<f64>,
    previous_tack: Tack,
    params: &ControllerParams,
) -> Result<ControlOutput, GuidanceError> {
    let geom = cross_track(position, leg_start, leg_end)?;
    Ok(compute(&geom, heading, wind_dir, previous_tack, params))
}

fn compute(
    geom: &LegGeometry,
    heading: f64,
    wind_dir: f64,
    previous_tack: Tack,
    params: &ControllerParams,
) -> ControlOutput {
    let tack = previous_tack.update(geom.cross_track, params);
    let target = target_heading(geom.bearing, geom.cross_track, wind_dir, tack, params);

    ControlOutput {
        command: ControlCommand {
            rudder: rudder_angle(heading, target.heading),
            max_sail: max_sail_angle(wind_dir, target.heading),
        },
        tack,
        target,
        cross_track: geom.cross_track,
    }
}

// ---------------------------------------------------------------------------
// LineFollowController: owns the tack between ticks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LineFollowController {
    params: ControllerParams,
    initial_tack: Tack,
    tack: Tack,
    last: Option<ControlOutput>,
}

impl LineFollowController {
    pub fn new(params: ControllerParams, initial_tack: Tack) -> Self {
        Self {
            params,
            initial_tack,
            tack: initial_tack,
            last: None,
        }
    }

    pub fn params(&self) -> &ControllerParams {
        &self.params
    }

    /// Output of the most recent tick.
    pub fn last_output(&self) -> Option<&ControlOutput> {
        self.last.as_ref()
    }

    /// Run one tick and commit the new tack.
    pub fn update(&mut self, boat: &BoatState, wind: &Wind, leg: &Leg) -> ControlOutput {
        let geom = leg.geometry(&boat.pos);
        let out = compute(&geom, boat.heading, wind.direction, self.tack, &self.params);

        if out.tack != self.tack {
            debug!(
                "t={:.2}: tack {} -> {} (e = {:.2})",
                boat.time, self.tack, out.tack, out.cross_track
            );
        }
        let was_close_hauled = self.last.map_or(false, |o| o.target.close_hauled);
        if out.target.close_hauled != was_close_hauled {
            debug!(
                "t={:.2}: {} close-hauled (target {:.3} rad)",
                boat.time,
                if out.target.close_hauled { "entering" } else { "leaving" },
                out.target.heading
            );
        }

        self.tack = out.tack;
        self.last = Some(out);
        out
    }

    pub fn reset(&mut self) {
        self.tack = self.initial_tack;
        self.last = None;
    }
}

impl super::Controller for LineFollowController {
    fn control(
        &mut self,
        boat: &BoatState,
        wind: &Wind,
        leg: &Leg,
    ) -> Result<ControlCommand, GuidanceError> {
        Ok(self.update(boat, wind, leg).command)
    }

    fn reset(&mut self) {
        LineFollowController::reset(self);
    }

    fn tack(&self) -> Option<Tack> {
        Some(self.tack)
    }

    fn last_target(&self) -> Option<HeadingTarget> {
        self.last.map(|o| o.target)
    }

    fn name(&self) -> &str {
        "LineFollowController"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::{RUDDER_LIMIT, SAIL_LIMIT};
    use crate::gnc::Controller;
    use std::f64::consts::{FRAC_PI_3, PI};

    fn leg_ends() -> (Vector2<f64>, Vector2<f64>) {
        (Vector2::new(-50.0, 50.0), Vector2::new(50.0, 50.0))
    }

    #[test]
    fn off_track_tack_flip() {
        let (a, b) = leg_ends();
        let p = ControllerParams::default();
        let out = control(&Vector2::new(0.0, -50.0), 0.0, FRAC_PI_3, &a, &b, Tack::Starboard, &p)
            .unwrap();
        assert!((out.cross_track + 100.0).abs() < 1e-12);
        assert_eq!(out.tack, Tack::Port);
    }

    #[test]
    fn on_line_tack_holds() {
        let (a, b) = leg_ends();
        let p = ControllerParams::default();
        for prev in [Tack::Port, Tack::Starboard] {
            let out = control(&Vector2::new(0.0, 50.0), 0.0, FRAC_PI_3, &a, &b, prev, &p).unwrap();
            assert_eq!(out.cross_track, 0.0);
            assert_eq!(out.tack, prev);
        }
    }

    #[test]
    fn upwind_switches_to_close_hauled() {
        let (a, b) = leg_ends();
        let p = ControllerParams::default();
        // On the line theta* = 0; wind blowing west means the leg is dead upwind
        let psi = PI;
        let out = control(&Vector2::new(0.0, 50.0), 0.0, psi, &a, &b, Tack::Starboard, &p).unwrap();
        assert!(out.target.close_hauled);
        assert!((out.target.heading - (PI + psi - FRAC_PI_3)).abs() < 1e-12);
        // Sail nearly sheeted in on a close-hauled course
        assert!(out.command.max_sail < SAIL_LIMIT / 2.0);
    }

    #[test]
    fn degenerate_leg_reported() {
        let p = ControllerParams::default();
        let a = Vector2::new(1.0, 1.0);
        let res = control(&Vector2::zeros(), 0.0, 0.0, &a, &a, Tack::Port, &p);
        assert!(matches!(res, Err(GuidanceError::DegenerateLeg { .. })));

        // Endpoints far enough apart to overflow the length never yield NaN commands
        let (a, b) = (Vector2::new(-1e308, 0.0), Vector2::new(1e308, 0.0));
        let res = control(&Vector2::new(0.0, -100.0), 0.0, 0.0, &a, &b, Tack::Port, &p);
        assert!(matches!(res, Err(GuidanceError::DegenerateLeg { .. })));
    }

    #[test]
    fn outputs_bounded_and_deterministic() {
        let (a, b) = leg_ends();
        let p = ControllerParams::default();
        for ix in -4..=4 {
            for iy in -4..=4 {
                for ih in 0..8 {
                    for iw in 0..8 {
                        let pos = Vector2::new(ix as f64 * 40.0, iy as f64 * 40.0);
                        let heading = ih as f64 * PI / 4.0 - PI;
                        let psi = iw as f64 * PI / 4.0;
                        let o1 = control(&pos, heading, psi, &a, &b, Tack::Port, &p).unwrap();
                        let o2 = control(&pos, heading, psi, &a, &b, Tack::Port, &p).unwrap();
                        assert_eq!(o1, o2);
                        assert!(o1.command.rudder.abs() <= RUDDER_LIMIT);
                        assert!((0.0..=SAIL_LIMIT).contains(&o1.command.max_sail));
                    }
                }
            }
        }
    }

    #[test]
    fn controller_keeps_tack_between_ticks() {
        let (a, b) = leg_ends();
        let leg = Leg::new(a, b).unwrap();
        let wind = Wind::new(FRAC_PI_3, 10.0);
        let mut ctrl = LineFollowController::new(ControllerParams::default(), Tack::Starboard);

        let below = BoatState::new(Vector2::new(0.0, -50.0), 0.0);
        ctrl.control(&below, &wind, &leg).unwrap();
        assert_eq!(Controller::tack(&ctrl), Some(Tack::Port));

        // Back inside the band: tack persists
        let near = BoatState::new(Vector2::new(0.0, 60.0), 0.0);
        ctrl.control(&near, &wind, &leg).unwrap();
        assert_eq!(Controller::tack(&ctrl), Some(Tack::Port));

        ctrl.reset();
        assert_eq!(Controller::tack(&ctrl), Some(Tack::Starboard));
        assert!(ctrl.last_output().is_none());
    }
}
