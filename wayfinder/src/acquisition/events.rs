//! Display events emitted by the acquisition controller.

use serde::Serialize;

use super::StatusMessage;
use crate::heading::{Cardinal, Heading};
use crate::location::Coordinate;

/// One display update for the UI sink.
///
/// The controller is the only producer. Frontends subscribe through a
/// broadcast receiver and render each variant however their surface allows;
/// a dropped receiver simply stops observing, it never blocks acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CompassEvent {
    /// New heading projections for the dial and readouts.
    Heading(HeadingUpdate),

    /// New location fix, full precision. Use the `Coordinate` display
    /// helpers for 4-decimal readouts.
    Fix(Coordinate),

    /// The platform has no location capability; render the N/A sentinel.
    LocationUnavailable,

    /// Status line change.
    Status(StatusMessage),

    /// Show or hide the permission prompt control.
    PermissionControl { visible: bool },
}

/// Projections of one canonical heading, precomputed for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadingUpdate {
    /// Canonical heading in degrees, `[0, 360)`.
    pub degrees: f64,

    /// Rounded numeric readout. Can read 360 (see `Heading::display_degrees`).
    pub display_degrees: u16,

    /// 8-point cardinal label.
    pub cardinal: Cardinal,

    /// Dial rotation: the negated heading, not renormalized.
    pub rotation_deg: f64,
}

impl HeadingUpdate {
    pub fn from_heading(heading: Heading) -> Self {
        Self {
            degrees: heading.degrees(),
            display_degrees: heading.display_degrees(),
            cardinal: heading.cardinal(),
            rotation_deg: heading.dial_rotation(),
        }
    }
}
