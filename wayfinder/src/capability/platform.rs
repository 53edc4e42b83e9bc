//! Probed platform capabilities.

use std::sync::Arc;

use super::{LocationSource, OrientationSource, SensorAccess};

/// The capabilities found by a one-time platform probe.
///
/// Probing happens once, before acquisition starts; the controller never
/// re-checks for capabilities appearing later. A source that is `None`
/// means the platform genuinely lacks that input, which is a supported
/// configuration (the desktop probe finds nothing and the compass runs on
/// simulated headings).
#[derive(Clone, Default)]
pub struct Platform {
    orientation: Option<Arc<dyn OrientationSource>>,
    location: Option<Arc<dyn LocationSource>>,
}

impl Platform {
    /// A platform with no input capabilities at all.
    ///
    /// This is what probing a plain desktop environment yields: no
    /// orientation sensor, no location provider. The acquisition controller
    /// falls back to the pointer simulator and the placeholder fix.
    pub fn headless() -> Self {
        Self::default()
    }

    /// Attach a probed orientation source.
    pub fn with_orientation(mut self, source: Arc<dyn OrientationSource>) -> Self {
        self.orientation = Some(source);
        self
    }

    /// Attach a probed location source.
    pub fn with_location(mut self, source: Arc<dyn LocationSource>) -> Self {
        self.location = Some(source);
        self
    }

    /// The orientation source, if the platform has one.
    pub fn orientation(&self) -> Option<&Arc<dyn OrientationSource>> {
        self.orientation.as_ref()
    }

    /// The location source, if the platform has one.
    pub fn location(&self) -> Option<&Arc<dyn LocationSource>> {
        self.location.as_ref()
    }

    /// How the orientation sensor is accessed, or `None` without a sensor.
    pub fn sensor_access(&self) -> Option<SensorAccess> {
        self.orientation.as_ref().map(|source| source.access())
    }

    /// Whether any location capability exists.
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Whether startup passes through the awaiting-permission state.
    ///
    /// True when the sensor is permission-gated or any location capability
    /// exists; both mean the user sees a permission step before data flows.
    pub fn needs_permission_step(&self) -> bool {
        matches!(self.sensor_access(), Some(SensorAccess::Gated)) || self.has_location()
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("sensor_access", &self.sensor_access())
            .field("has_location", &self.has_location())
            .finish()
    }
}
