//! Platform capability model for orientation and location input.
//!
//! Real deployments sit on wildly different platforms: some gate the
//! orientation sensor behind an async permission prompt, some deliver
//! samples ambiently, some have no sensor at all, and location may or may
//! not exist independently of all that. This module makes those differences
//! explicit values probed once at startup, instead of duck-typed checks
//! scattered through the acquisition path:
//!
//! - [`Platform`] bundles whatever sources the probe found.
//! - [`OrientationSource`] / [`LocationSource`] are the integration seams;
//!   frontends supply implementations for their platform.
//! - [`SensorAccess`] distinguishes permission-gated from ambient sensors;
//!   a missing source is the "no sensor" case.
//!
//! Sources deliver into channels and stop when their cancellation token
//! fires, so a long-running service can always unsubscribe.

mod platform;
mod traits;

pub use platform::Platform;
pub use traits::{
    CapabilityError, LocationSource, LocationUpdate, OrientationSource, PermissionDecision,
    SensorAccess, WatchError, WatchOptions, DEFAULT_WATCH_TIMEOUT_SECS,
};
