//! Acquisition controller configuration.

use std::time::Duration;

use crate::capability::WatchOptions;
use crate::location::Coordinate;
use crate::simulator::SurfacePoint;

/// Default grace period before the simulated fallback engages (ms).
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 1000;

/// Placeholder fix seeded when no location capability exists (lower
/// Manhattan).
pub const PLACEHOLDER_LATITUDE: f64 = 40.7128;
pub const PLACEHOLDER_LONGITUDE: f64 = -74.0060;

/// Default capacity for the sample/fix/pointer channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Default capacity of the broadcast event channel. Slow subscribers that
/// lag past this many events miss the oldest ones.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Configuration for the acquisition controller.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// How long to wait for a first orientation sample before engaging the
    /// pointer simulator.
    pub grace_period: Duration,

    /// Options handed to the location watch.
    pub watch_options: WatchOptions,

    /// Fix seeded into the store when the platform has no location
    /// capability at all.
    pub placeholder_fix: Coordinate,

    /// Reference center for the pointer simulator.
    pub simulator_center: SurfacePoint,

    /// Capacity for the mpsc channels feeding the controller.
    pub channel_capacity: usize,

    /// Capacity for the broadcast event channel.
    pub event_capacity: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_millis(DEFAULT_GRACE_PERIOD_MS),
            watch_options: WatchOptions::default(),
            placeholder_fix: Coordinate::new(PLACEHOLDER_LATITUDE, PLACEHOLDER_LONGITUDE),
            simulator_center: SurfacePoint::default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl AcquisitionConfig {
    /// Set the grace period.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Set the location watch options.
    pub fn with_watch_options(mut self, watch_options: WatchOptions) -> Self {
        self.watch_options = watch_options;
        self
    }

    /// Set the placeholder fix.
    pub fn with_placeholder_fix(mut self, placeholder_fix: Coordinate) -> Self {
        self.placeholder_fix = placeholder_fix;
        self
    }

    /// Set the simulator's reference center.
    pub fn with_simulator_center(mut self, simulator_center: SurfacePoint) -> Self {
        self.simulator_center = simulator_center;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AcquisitionConfig::default();

        assert_eq!(config.grace_period, Duration::from_millis(1000));
        assert!((config.placeholder_fix.latitude - 40.7128).abs() < 1e-9);
        assert!((config.placeholder_fix.longitude - -74.0060).abs() < 1e-9);
        assert!(config.watch_options.high_accuracy);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_builders() {
        let config = AcquisitionConfig::default()
            .with_grace_period(Duration::from_millis(50))
            .with_placeholder_fix(Coordinate::new(51.5074, -0.1278))
            .with_simulator_center(SurfacePoint::new(40.0, 12.0));

        assert_eq!(config.grace_period, Duration::from_millis(50));
        assert!((config.placeholder_fix.latitude - 51.5074).abs() < 1e-9);
        assert!((config.simulator_center.x - 40.0).abs() < 1e-9);
    }
}
