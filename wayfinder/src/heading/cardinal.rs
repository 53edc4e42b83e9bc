//! 8-point cardinal direction mapping.
//!
//! Divides the compass rose into eight 45° sectors, each centered on its
//! cardinal point: N covers `[337.5, 360) ∪ [0, 22.5)`, NE covers
//! `[22.5, 67.5)`, and so on. Sector boundaries round half-up, so exactly
//! 22.5° reads NE.

use serde::Serialize;

use super::Heading;

/// Width of one cardinal sector in degrees.
const SECTOR_WIDTH_DEG: f64 = 45.0;

/// An 8-point cardinal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinal {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Cardinal {
    /// All directions in compass order, starting at north and going
    /// clockwise. Index k is the sector centered on `k * 45°`.
    pub const ALL: [Cardinal; 8] = [
        Cardinal::N,
        Cardinal::NE,
        Cardinal::E,
        Cardinal::SE,
        Cardinal::S,
        Cardinal::SW,
        Cardinal::W,
        Cardinal::NW,
    ];

    /// Map a canonical heading to its cardinal sector.
    pub fn from_heading(heading: Heading) -> Self {
        // Heading is already in [0, 360); round half-up picks the nearest
        // sector center, and % 8 folds the top of the rose back onto N.
        let index = (heading.degrees() / SECTOR_WIDTH_DEG).round() as usize % 8;
        Self::ALL[index]
    }

    /// Map arbitrary degrees to a cardinal sector, normalizing first.
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_heading(Heading::from_degrees(degrees))
    }

    /// Compass label for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinal::N => "N",
            Cardinal::NE => "NE",
            Cardinal::E => "E",
            Cardinal::SE => "SE",
            Cardinal::S => "S",
            Cardinal::SW => "SW",
            Cardinal::W => "W",
            Cardinal::NW => "NW",
        }
    }
}

impl std::fmt::Display for Cardinal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
