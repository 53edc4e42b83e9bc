//! Pointer-driven heading simulation for platforms without sensors.
//!
//! Desktop platforms rarely expose an orientation sensor, so the compass
//! falls back to deriving a synthetic heading from pointer position: the
//! angle of the pointer around the viewport center becomes the heading.
//! Pointing straight up from center is north, right is east.
//!
//! Screen coordinates grow rightward in x and *downward* in y, which is why
//! a quarter-turn offset lands "up" on 0° rather than 270°.

use crate::heading::HeadingSample;

/// Offset that rotates the atan2 frame (0° pointing right) onto the compass
/// frame (0° pointing up).
const QUARTER_TURN_DEG: f64 = 90.0;

/// A position on the input surface, in the surface's own units
/// (pixels, terminal cells, anything with x right / y down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

impl SurfacePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Converts pointer positions into synthetic orientation samples.
///
/// The simulator is pure math over a fixed reference center; feeding it is
/// the acquisition controller's job once the simulated fallback engages.
#[derive(Debug, Clone, Copy)]
pub struct PointerSimulator {
    /// Reference point the pointer angle is measured around.
    center: SurfacePoint,
}

impl PointerSimulator {
    /// Create a simulator around an explicit center point.
    pub fn new(center: SurfacePoint) -> Self {
        Self { center }
    }

    /// Create a simulator centered on a surface of the given dimensions.
    pub fn for_surface(width: f64, height: f64) -> Self {
        Self::new(SurfacePoint::new(width / 2.0, height / 2.0))
    }

    /// The reference center.
    pub fn center(&self) -> SurfacePoint {
        self.center
    }

    /// Heading in degrees for a pointer position, in `[0, 360)`.
    pub fn heading_degrees(&self, pointer: SurfacePoint) -> f64 {
        let dx = pointer.x - self.center.x;
        let dy = pointer.y - self.center.y;

        let degrees = dy.atan2(dx).to_degrees() + QUARTER_TURN_DEG;
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    }

    /// Build the orientation sample for a pointer position.
    ///
    /// The heading is emitted through `absolute_heading` so normalization
    /// treats it exactly like a platform compass reading.
    pub fn sample(&self, pointer: SurfacePoint) -> HeadingSample {
        HeadingSample::from_absolute(self.heading_degrees(pointer))
    }
}
