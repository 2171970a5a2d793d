//! Decoding of relayed sensor records.
//!
//! The acquisition side publishes one JSON object per datagram with the
//! latest IMU and GPS messages, either of which may still be an empty object
//! before the first reading arrives:
//!
//! ```json
//! {"imu": {"type": "ATTITUDE", "roll": 0.01, "pitch": -0.02, "yaw": 1.2},
//!  "gps": {"type": "GGA", "lat": 43.1, "lon": 5.9, "alt": 2.0}}
//! ```
//!
//! Values are validated here so that a NaN or out-of-range reading is
//! rejected before it can reach the controller.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::Vector2;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::wrap_pi;

// ---------------------------------------------------------------------------
// ERRORS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Malformed telemetry record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Non-finite value for `{0}`")]
    NonFinite(&'static str),

    #[error("Value for `{name}` out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("Record carries no {0} data")]
    Missing(&'static str),
}

// ---------------------------------------------------------------------------
// RECORD MODEL
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// IMU message, tagged with the autopilot message name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImuRecord {
    #[serde(rename = "ATTITUDE")]
    Attitude { roll: f64, pitch: f64, yaw: f64 },

    #[serde(rename = "RAW_IMU", alias = "SCALED_IMU2", alias = "SCALED_IMU3")]
    Raw { acc: Axes, gyro: Axes, mag: Axes },
}

/// GPS sentence, tagged with the NMEA message id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GpsRecord {
    #[serde(rename = "GGA")]
    Fix { lat: f64, lon: f64, alt: f64 },

    /// Speed over ground, km/h.
    #[serde(rename = "VTG")]
    Velocity { speed: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub imu: Option<ImuRecord>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub gps: Option<GpsRecord>,
}

impl TelemetryRecord {
    /// Parse one datagram payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, TelemetryError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Heading in the controller's convention (rad, CCW from +x / east),
    /// converted from the attitude yaw (clockwise from north).
    pub fn heading(&self) -> Result<f64, TelemetryError> {
        match self.imu {
            Some(ImuRecord::Attitude { yaw, .. }) => {
                let yaw = validate_angle("yaw", yaw)?;
                Ok(compass_to_math(yaw))
            }
            _ => Err(TelemetryError::Missing("attitude")),
        }
    }

    /// Latitude and longitude in degrees.
    pub fn fix(&self) -> Result<(f64, f64), TelemetryError> {
        match self.gps {
            Some(GpsRecord::Fix { lat, lon, .. }) => {
                let lat = validate_finite("lat", lat)?;
                let lon = validate_finite("lon", lon)?;
                if lat.abs() > 90.0 {
                    return Err(TelemetryError::OutOfRange { name: "lat", value: lat });
                }
                if lon.abs() > 180.0 {
                    return Err(TelemetryError::OutOfRange { name: "lon", value: lon });
                }
                Ok((lat, lon))
            }
            _ => Err(TelemetryError::Missing("position fix")),
        }
    }

    /// Speed over ground, m/s.
    pub fn speed_over_ground(&self) -> Result<f64, TelemetryError> {
        match self.gps {
            Some(GpsRecord::Velocity { speed }) => {
                let kmh = validate_finite("speed", speed)?;
                if kmh < 0.0 {
                    return Err(TelemetryError::OutOfRange { name: "speed", value: kmh });
                }
                Ok(kmh / 3.6)
            }
            _ => Err(TelemetryError::Missing("velocity")),
        }
    }
}

// ---------------------------------------------------------------------------
// LOCAL FRAME
// ---------------------------------------------------------------------------

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Flat-earth projection of GPS fixes around a fixed origin.
///
/// x points east and y north, in metres. Good for the few kilometres a leg
/// spans; the error grows with distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    pub origin_lat: f64,
    pub origin_lon: f64,
}

impl LocalFrame {
    pub fn new(origin_lat: f64, origin_lon: f64) -> Self {
        Self { origin_lat, origin_lon }
    }

    pub fn to_local(&self, lat: f64, lon: f64) -> Vector2<f64> {
        let x = (lon - self.origin_lon).to_radians() * self.origin_lat.to_radians().cos();
        let y = (lat - self.origin_lat).to_radians();
        Vector2::new(x, y) * EARTH_RADIUS_M
    }
}

impl TelemetryRecord {
    /// Position of the GPS fix in `frame`.
    pub fn position(&self, frame: &LocalFrame) -> Result<Vector2<f64>, TelemetryError> {
        let (lat, lon) = self.fix()?;
        Ok(frame.to_local(lat, lon))
    }
}

// ---------------------------------------------------------------------------
// VALIDATION
// ---------------------------------------------------------------------------

pub fn validate_finite(name: &'static str, value: f64) -> Result<f64, TelemetryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TelemetryError::NonFinite(name))
    }
}

/// Accept any finite angle within one turn either side of zero.
pub fn validate_angle(name: &'static str, value: f64) -> Result<f64, TelemetryError> {
    let value = validate_finite(name, value)?;
    if value.abs() > TAU {
        return Err(TelemetryError::OutOfRange { name, value });
    }
    Ok(value)
}

/// Clockwise-from-north to counter-clockwise-from-east, wrapped to (-pi, pi].
pub fn compass_to_math(yaw: f64) -> f64 {
    wrap_pi(FRAC_PI_2 - yaw)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Treat `{}` (nothing received yet) as `None`.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
        Some(v) => serde_json::from_value(v).map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn decodes_attitude_and_fix() {
        let rec = TelemetryRecord::decode(
            br#"{"imu": {"type": "ATTITUDE", "roll": 0.0, "pitch": 0.0, "yaw": 0.0},
                 "gps": {"type": "GGA", "lat": 43.1, "lon": 5.9, "alt": 2.0}}"#,
        )
        .unwrap();
        // North in compass terms is +y in the controller frame
        assert!((rec.heading().unwrap() - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(rec.fix().unwrap(), (43.1, 5.9));
    }

    #[test]
    fn empty_sections_before_first_reading() {
        let rec = TelemetryRecord::decode(br#"{"imu": {}, "gps": {}}"#).unwrap();
        assert_eq!(rec, TelemetryRecord::default());
        assert!(matches!(rec.heading(), Err(TelemetryError::Missing(_))));
    }

    #[test]
    fn raw_imu_aliases() {
        let rec = TelemetryRecord::decode(
            br#"{"imu": {"type": "SCALED_IMU2",
                         "acc": {"x": 1, "y": 2, "z": 3},
                         "gyro": {"x": 0, "y": 0, "z": 0},
                         "mag": {"x": 0, "y": 0, "z": 0}}}"#,
        )
        .unwrap();
        assert!(matches!(rec.imu, Some(ImuRecord::Raw { .. })));
        assert!(rec.gps.is_none());
    }

    #[test]
    fn vtg_speed_in_metres_per_second() {
        let rec = TelemetryRecord::decode(br#"{"gps": {"type": "VTG", "speed": 36.0}}"#).unwrap();
        assert!((rec.speed_over_ground().unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn malformed_rejected() {
        assert!(matches!(
            TelemetryRecord::decode(b"{'imu': {}}"),
            Err(TelemetryError::Decode(_))
        ));
    }

    #[test]
    fn bad_angles_rejected() {
        assert!(matches!(validate_angle("yaw", f64::NAN), Err(TelemetryError::NonFinite("yaw"))));
        assert!(matches!(
            validate_angle("yaw", 10.0),
            Err(TelemetryError::OutOfRange { .. })
        ));
        assert_eq!(validate_angle("yaw", -1.0).unwrap(), -1.0);
    }

    #[test]
    fn local_frame_axes() {
        let frame = LocalFrame::new(43.0, 5.0);
        assert_eq!(frame.to_local(43.0, 5.0), Vector2::zeros());

        // 0.001 deg of latitude is about 111 m north
        let north = frame.to_local(43.001, 5.0);
        assert!(north.x.abs() < 1e-9);
        assert!((north.y - 111.19).abs() < 0.01, "y = {}", north.y);

        // Longitude shrinks with cos(lat)
        let east = frame.to_local(43.0, 5.001);
        assert!((east.x - north.y * 43.0_f64.to_radians().cos()).abs() < 1e-9);
        assert!(east.y.abs() < 1e-9);
    }

    #[test]
    fn position_needs_a_fix() {
        let frame = LocalFrame::new(0.0, 0.0);
        let rec = TelemetryRecord::decode(br#"{"gps": {"type": "VTG", "speed": 1.0}}"#).unwrap();
        assert!(matches!(rec.position(&frame), Err(TelemetryError::Missing(_))));
    }

    #[test]
    fn compass_conversion() {
        // East
        assert!(compass_to_math(FRAC_PI_2).abs() < 1e-12);
        // South
        assert!((compass_to_math(PI) + FRAC_PI_2).abs() < 1e-12);
        // West
        assert!((compass_to_math(-FRAC_PI_2) - PI).abs() < 1e-12);
    }
}
