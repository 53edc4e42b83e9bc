//! Compass heading model and normalization.
//!
//! Converts raw platform orientation samples into a canonical compass
//! heading: degrees clockwise from north, always in `[0, 360)`.
//!
//! # Absolute vs alpha
//!
//! Platforms report orientation in one of two conventions, and a sample may
//! carry either, both, or neither:
//!
//! - **Absolute heading** is already a compass heading (clockwise from
//!   north). WebKit's `webkitCompassHeading` is the canonical example.
//! - **Alpha** is a device rotation angle measured *counter-clockwise* from
//!   north, so the compass heading is `360 - alpha`.
//!
//! When both are present the absolute heading wins. When neither is present
//! the sample carries no orientation at all and produces no heading.
//!
//! # Example
//!
//! ```ignore
//! use wayfinder::heading::{Heading, HeadingSample};
//!
//! let sample = HeadingSample::from_alpha(350.0);
//! let heading = Heading::from_sample(sample).unwrap();
//!
//! assert_eq!(heading.degrees(), 10.0);
//! assert_eq!(heading.cardinal().as_str(), "N");
//! assert_eq!(heading.dial_rotation(), -10.0);
//! ```

mod cardinal;

pub use cardinal::Cardinal;

// =============================================================================
// Raw samples
// =============================================================================

/// A raw orientation sample as delivered by a platform sensor.
///
/// Both fields are optional because real platforms populate them
/// inconsistently. An empty sample is valid input and simply produces no
/// heading update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadingSample {
    /// Compass heading in degrees clockwise from north, if the platform
    /// provides one directly.
    ///
    /// An explicit `Some(0.0)` means due north. (Some web platforms coerce
    /// a zero heading to "absent" through a truthiness check; this model
    /// keeps absence and zero distinct.)
    pub absolute_heading: Option<f64>,

    /// Device alpha angle in degrees counter-clockwise from north.
    pub alpha: Option<f64>,
}

impl HeadingSample {
    /// Create a sample carrying an absolute compass heading.
    pub fn from_absolute(degrees: f64) -> Self {
        Self {
            absolute_heading: Some(degrees),
            alpha: None,
        }
    }

    /// Create a sample carrying only an alpha angle.
    pub fn from_alpha(alpha: f64) -> Self {
        Self {
            absolute_heading: None,
            alpha: Some(alpha),
        }
    }

    /// Whether the sample carries any orientation data at all.
    pub fn is_empty(&self) -> bool {
        self.absolute_heading.is_none() && self.alpha.is_none()
    }
}

// =============================================================================
// Canonical heading
// =============================================================================

/// Normalize an angle in degrees to the `[0, 360)` range.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// A canonical compass heading: degrees clockwise from north in `[0, 360)`.
///
/// Construction always normalizes, so every `Heading` in the system upholds
/// the range invariant. Derived display values (rounded degrees, cardinal
/// label, dial rotation) hang off this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading(f64);

impl Heading {
    /// Create a heading from degrees, normalizing into `[0, 360)`.
    pub fn from_degrees(degrees: f64) -> Self {
        Self(normalize_degrees(degrees))
    }

    /// Derive a heading from a raw sample, if the sample carries one.
    ///
    /// Selection order:
    /// 1. `absolute_heading`, used as-is (already clockwise from north)
    /// 2. `alpha`, converted via `360 - alpha`
    /// 3. neither: `None` (the sample is silently dropped upstream)
    pub fn from_sample(sample: HeadingSample) -> Option<Self> {
        if let Some(absolute) = sample.absolute_heading {
            return Some(Self::from_degrees(absolute));
        }
        if let Some(alpha) = sample.alpha {
            return Some(Self::from_degrees(360.0 - alpha));
        }
        None
    }

    /// The heading in degrees, in `[0, 360)`.
    #[inline]
    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// The heading rounded to whole degrees for display (half rounds up).
    ///
    /// Headings in `[359.5, 360)` round to 360, so the displayed value can
    /// read "360" while the canonical heading stays below it.
    #[inline]
    pub fn display_degrees(&self) -> u16 {
        self.0.round() as u16
    }

    /// The 8-point cardinal direction for this heading.
    pub fn cardinal(&self) -> Cardinal {
        Cardinal::from_heading(*self)
    }

    /// The rotation to apply to a compass dial so its north marker points
    /// at true north: the negated heading.
    ///
    /// Deliberately not renormalized. A heading of 350° yields −350°, not
    /// 10°, so a dial animates along the short path the platform expects.
    #[inline]
    pub fn dial_rotation(&self) -> f64 {
        -self.0
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.display_degrees())
    }
}
