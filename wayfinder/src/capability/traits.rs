//! Source traits and the types that cross them.

use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::heading::HeadingSample;
use crate::location::Coordinate;

/// Default location watch timeout in seconds.
pub const DEFAULT_WATCH_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// Errors
// =============================================================================

/// Failure to set up a capability. None of these abort the process; the
/// acquisition controller degrades to a status message instead.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The permission request mechanism itself failed (distinct from the
    /// user denying the prompt, which is a successful `Denied` resolution).
    #[error("permission request failed: {0}")]
    PermissionRequest(String),

    /// Could not begin delivering orientation samples.
    #[error("orientation subscription failed: {0}")]
    Subscribe(String),

    /// Could not begin the location watch.
    #[error("location watch failed: {0}")]
    Watch(String),
}

/// A per-fix failure from an active location watch.
///
/// These arrive interleaved with fixes and never terminate the watch. The
/// numeric codes match the W3C Geolocation API so logs line up with what
/// web consoles print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WatchError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("timeout")]
    Timeout,
}

impl WatchError {
    /// W3C Geolocation error code (1, 2, or 3).
    pub fn code(&self) -> u8 {
        match self {
            WatchError::PermissionDenied => 1,
            WatchError::PositionUnavailable => 2,
            WatchError::Timeout => 3,
        }
    }
}

// =============================================================================
// Orientation
// =============================================================================

/// How a platform gates access to its orientation sensor.
///
/// "No sensor" is not a variant here: a platform without a sensor simply
/// has no [`OrientationSource`] at all (see [`Platform`](super::Platform)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorAccess {
    /// An explicit async permission request must resolve `Granted` before
    /// samples flow (iOS-style).
    Gated,

    /// Samples flow on subscription with no permission step.
    Ambient,
}

/// Outcome of a resolved permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    Granted,
    Denied,
}

/// An orientation sensor the platform probe discovered.
///
/// Implementations live with the frontend (a browser shim, a mobile bridge,
/// a test script); the acquisition controller only sees this trait.
pub trait OrientationSource: Send + Sync {
    /// How access to this sensor is gated.
    fn access(&self) -> SensorAccess;

    /// Request permission to read the sensor.
    ///
    /// Single-shot: the platform prompt resolves exactly once per startup,
    /// and the decision is never re-requested. Sources with
    /// [`SensorAccess::Ambient`] may resolve `Granted` immediately.
    fn request_permission(&self) -> BoxFuture<'_, Result<PermissionDecision, CapabilityError>>;

    /// Begin delivering samples into `sink` until `cancel` fires.
    ///
    /// Implementations typically spawn their own delivery task and return
    /// immediately. Dropping the sink or cancelling the token ends
    /// delivery.
    fn subscribe(
        &self,
        sink: mpsc::Sender<HeadingSample>,
        cancel: CancellationToken,
    ) -> Result<(), CapabilityError>;
}

// =============================================================================
// Location
// =============================================================================

/// Options for a location watch, mirroring W3C-style geolocation APIs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Ask the platform for its most accurate positioning.
    pub high_accuracy: bool,

    /// How long the platform may take to produce each fix before reporting
    /// [`WatchError::Timeout`].
    pub timeout: Duration,

    /// Oldest cached fix the platform may return. Zero means fresh fixes
    /// only.
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(DEFAULT_WATCH_TIMEOUT_SECS),
            maximum_age: Duration::ZERO,
        }
    }
}

/// A single delivery from an active location watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationUpdate {
    /// A new fix.
    Fix(Coordinate),

    /// A per-fix failure. The watch stays active and later fixes may still
    /// arrive.
    Error(WatchError),
}

/// A location capability the platform probe discovered.
pub trait LocationSource: Send + Sync {
    /// Begin a continuous watch, delivering into `sink` until `cancel`
    /// fires.
    ///
    /// Per-fix errors are delivered as [`LocationUpdate::Error`] and must
    /// not end the watch.
    fn watch(
        &self,
        options: WatchOptions,
        sink: mpsc::Sender<LocationUpdate>,
        cancel: CancellationToken,
    ) -> Result<(), CapabilityError>;
}
