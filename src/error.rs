use nalgebra::Vector2;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Guidance errors
// ---------------------------------------------------------------------------

/// Errors raised by the guidance core. Neither is retried internally: both
/// are reported to the caller of the tick (or of parameter construction).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuidanceError {
    #[error("Degenerate leg {start:?} -> {end:?}: length must be finite and > 0")]
    DegenerateLeg {
        start: Vector2<f64>,
        end: Vector2<f64>,
    },

    #[error("Invalid controller parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}
