//! Geolocation fixes and the shared location store.
//!
//! Fixes are kept at full `f64` precision; rounding happens only in the
//! display formatters. Consumers that need exact coordinates (the map link
//! builder) read the stored value, never a formatted string.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

/// Decimal places shown for coordinates in user-facing output.
const DISPLAY_DECIMALS: usize = 4;

/// A geographic fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90, north positive).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180, east positive).
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude formatted for display, rounded to 4 decimal places.
    pub fn display_latitude(&self) -> String {
        format!("{:.prec$}", self.latitude, prec = DISPLAY_DECIMALS)
    }

    /// Longitude formatted for display, rounded to 4 decimal places.
    pub fn display_longitude(&self) -> String {
        format!("{:.prec$}", self.longitude, prec = DISPLAY_DECIMALS)
    }
}

/// Most recent fix, shared between the acquisition controller (writer) and
/// read-only consumers such as the map link builder.
///
/// Cloning is cheap and every clone observes the same fix. Last write wins;
/// there is no history.
#[derive(Debug, Clone, Default)]
pub struct LocationStore {
    inner: Arc<RwLock<Option<Coordinate>>>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new fix, replacing any previous one.
    pub fn record(&self, fix: Coordinate) {
        *self.inner.write() = Some(fix);
    }

    /// The most recent fix, if any has been recorded.
    pub fn latest(&self) -> Option<Coordinate> {
        *self.inner.read()
    }

    /// Whether any fix has been recorded yet.
    pub fn has_fix(&self) -> bool {
        self.inner.read().is_some()
    }
}
