//! Run configuration loaded from TOML.
//!
//! Every section is optional; missing values fall back to the reference
//! scenario (r = 50, gamma_inf = 45 deg, zeta = 60 deg, leg (-50, 50) ->
//! (50, 50), boat at (0, -50) heading east on starboard, wind 60 deg at 10).
//!
//! ```toml
//! [controller]
//! cutoff_distance = 50.0
//! incidence_angle_deg = 45.0
//! close_hauled_angle_deg = 60.0
//!
//! [wind]
//! direction_deg = 60.0
//! speed = 10.0
//! steps = [{ from_step = 40, direction_deg = 180.0, speed = 12.0 }]
//! ```

use std::fs::read_to_string;
use std::path::Path;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::driver::DriverConfig;
use crate::dynamics::state::{BoatState, SimConfig, Wind};
use crate::error::GuidanceError;
use crate::geometry::Leg;
use crate::gnc::{ControllerParams, Tack};
use crate::sim::SteppedWind;

// ---------------------------------------------------------------------------
// ERRORS
// ---------------------------------------------------------------------------

/// An error that occurs while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot load the config file: {0}")]
    FileLoadError(#[from] std::io::Error),

    #[error("Cannot read the config file: {0}")]
    DeserialiseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] GuidanceError),
}

// ---------------------------------------------------------------------------
// SECTIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSection {
    pub cutoff_distance: f64,
    pub incidence_angle_deg: f64,
    pub close_hauled_angle_deg: f64,
}

impl Default for ControllerSection {
    fn default() -> Self {
        Self {
            cutoff_distance: 50.0,
            incidence_angle_deg: 45.0,
            close_hauled_angle_deg: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegSection {
    pub start: [f64; 2],
    pub end: [f64; 2],
}

impl Default for LegSection {
    fn default() -> Self {
        Self { start: [-50.0, 50.0], end: [50.0, 50.0] }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoatSection {
    pub position: [f64; 2],
    pub heading_deg: f64,
    pub tack: Tack,
}

impl Default for BoatSection {
    fn default() -> Self {
        Self {
            position: [0.0, -50.0],
            heading_deg: 0.0,
            tack: Tack::Starboard,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindStep {
    pub from_step: usize,
    pub direction_deg: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSection {
    pub direction_deg: f64,
    pub speed: f64,
    pub steps: Vec<WindStep>,
}

impl Default for WindSection {
    fn default() -> Self {
        Self { direction_deg: 60.0, speed: 10.0, steps: vec![] }
    }
}

// ---------------------------------------------------------------------------
// CONFIG
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub controller: ControllerSection,
    pub sim: SimConfig,
    pub leg: LegSection,
    pub boat: BoatSection,
    pub wind: WindSection,
    pub driver: DriverConfig,
}

impl Config {
    /// Validated controller parameters.
    pub fn params(&self) -> Result<ControllerParams, GuidanceError> {
        ControllerParams::new(
            self.controller.cutoff_distance,
            self.controller.incidence_angle_deg.to_radians(),
            self.controller.close_hauled_angle_deg.to_radians(),
        )
    }

    pub fn leg(&self) -> Result<Leg, GuidanceError> {
        Leg::new(vec2(self.leg.start), vec2(self.leg.end))
    }

    pub fn initial_state(&self) -> BoatState {
        BoatState::new(vec2(self.boat.position), self.boat.heading_deg.to_radians())
    }

    pub fn initial_tack(&self) -> Tack {
        self.boat.tack
    }

    pub fn wind(&self) -> SteppedWind {
        let initial = Wind::new(self.wind.direction_deg.to_radians(), self.wind.speed);
        self.wind.steps.iter().fold(SteppedWind::new(initial), |w, s| {
            w.change_at(s.from_step, Wind::new(s.direction_deg.to_radians(), s.speed))
        })
    }

    /// Check everything that can fail at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params()?;
        self.leg()?;
        let radius = self.sim.arrival_radius;
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(ConfigError::Invalid(GuidanceError::InvalidParameter {
                name: "arrival_radius",
                value: radius,
                reason: "must be finite and >= 0",
            }));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load and validate a configuration file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config_str = read_to_string(path)?;
    from_str(&config_str)
}

/// Parse and validate configuration text.
pub fn from_str(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

fn vec2(v: [f64; 2]) -> Vector2<f64> {
    Vector2::new(v[0], v[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WindProvider;
    use std::f64::consts::{FRAC_PI_3, FRAC_PI_4};

    #[test]
    fn empty_file_gives_reference_scenario() {
        let c = from_str("").unwrap();
        let p = c.params().unwrap();
        assert_eq!(p.cutoff_distance(), 50.0);
        assert!((p.incidence_angle() - FRAC_PI_4).abs() < 1e-12);
        assert!((p.close_hauled_angle() - FRAC_PI_3).abs() < 1e-12);
        assert_eq!(c.initial_tack(), Tack::Starboard);
        assert_eq!(c.initial_state().pos, Vector2::new(0.0, -50.0));
        assert_eq!(c.leg().unwrap().end(), Vector2::new(50.0, 50.0));
        assert_eq!(c.sim.max_steps, SimConfig::default().max_steps);
    }

    #[test]
    fn sections_override_defaults() {
        let c = from_str(
            r#"
            [controller]
            cutoff_distance = 20.0

            [boat]
            tack = -1

            [sim]
            max_steps = 42

            [wind]
            direction_deg = 180.0
            steps = [{ from_step = 10, direction_deg = 90.0, speed = 3.0 }]
            "#,
        )
        .unwrap();
        assert_eq!(c.params().unwrap().cutoff_distance(), 20.0);
        assert_eq!(c.initial_tack(), Tack::Port);
        assert_eq!(c.sim.max_steps, 42);
        assert_eq!(c.sim.speed, 5.0);
        let mut wind = c.wind();
        assert!((wind.wind_at(0, 0.0).direction - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(wind.wind_at(10, 10.0).speed, 3.0);
    }

    #[test]
    fn invalid_parameters_fail_closed() {
        let err = from_str("[controller]\nclose_hauled_angle_deg = 95.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(GuidanceError::InvalidParameter { .. })));

        let err = from_str("[leg]\nstart = [1.0, 1.0]\nend = [1.0, 1.0]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(GuidanceError::DegenerateLeg { .. })));
    }

    #[test]
    fn arrival_radius_is_read_and_checked() {
        let c = from_str("[sim]\narrival_radius = 5.0\n").unwrap();
        assert_eq!(c.sim.arrival_radius, 5.0);
        assert_eq!(from_str("").unwrap().sim.arrival_radius, SimConfig::default().arrival_radius);

        let err = from_str("[sim]\narrival_radius = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(GuidanceError::InvalidParameter { name: "arrival_radius", .. })
        ));
    }

    #[test]
    fn bad_tack_value_rejected() {
        assert!(matches!(
            from_str("[boat]\ntack = 0\n"),
            Err(ConfigError::DeserialiseError(_))
        ));
    }

    #[test]
    fn missing_file_reported() {
        assert!(matches!(
            load("/nonexistent/sail-guidance.toml"),
            Err(ConfigError::FileLoadError(_))
        ));
    }
}
