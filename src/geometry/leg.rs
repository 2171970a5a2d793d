use nalgebra::Vector2;

use crate::error::GuidanceError;

// ---------------------------------------------------------------------------
// Leg: the straight waypoint segment currently being tracked
// ---------------------------------------------------------------------------

/// A straight waypoint leg from `start` to `end`.
///
/// A `Leg` is immutable; moving on to the next waypoint means building a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    start: Vector2<f64>,
    end: Vector2<f64>,
}

impl Leg {
    /// Build a leg, rejecting coincident endpoints and any pair whose
    /// separation is not a finite, positive length.
    pub fn new(start: Vector2<f64>, end: Vector2<f64>) -> Result<Self, GuidanceError> {
        let length = (end - start).norm();
        if !(length.is_finite() && length > 0.0) {
            return Err(GuidanceError::DegenerateLeg { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Vector2<f64> {
        self.start
    }

    pub fn end(&self) -> Vector2<f64> {
        self.end
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end.
    pub fn direction(&self) -> Vector2<f64> {
        (self.end - self.start) / self.length()
    }

    /// Path bearing (rad, CCW from +x).
    pub fn bearing(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    /// Signed distance travelled along the leg, measured from `start`.
    pub fn along_track(&self, position: &Vector2<f64>) -> f64 {
        self.direction().dot(&(position - self.start))
    }

    /// Cross-track error and bearing for `position` against this leg.
    pub fn geometry(&self, position: &Vector2<f64>) -> LegGeometry {
        let direction = self.direction();
        LegGeometry {
            cross_track: perp_dot(&direction, &(position - self.start)),
            bearing: self.bearing(),
            direction,
        }
    }
}

// ---------------------------------------------------------------------------
// Cross-track geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegGeometry {
    /// Signed perpendicular distance to the leg line. Positive to the left of
    /// the direction of travel.
    pub cross_track: f64,
    /// Leg bearing, rad.
    pub bearing: f64,
    /// Unit leg direction.
    pub direction: Vector2<f64>,
}

/// Signed cross-track error `det([u; m - a])` and bearing of the leg `a -> b`.
pub fn cross_track(
    position: &Vector2<f64>,
    start: &Vector2<f64>,
    end: &Vector2<f64>,
) -> Result<LegGeometry, GuidanceError> {
    let leg = Leg::new(*start, *end)?;
    Ok(leg.geometry(position))
}

/// 2D cross product (determinant of the matrix with rows `a`, `b`).
fn perp_dot(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}
