//! Wayfinder - Device-orientation compass with a simulated desktop fallback
//!
//! This library turns platform orientation and geolocation capabilities into
//! a stream of compass display events: canonical headings, cardinal
//! directions, dial rotations, and location fixes. Platforms without usable
//! sensors fall back to a pointer-driven simulated heading source after a
//! short grace period.
//!
//! # Architecture
//!
//! ```text
//! Platform capabilities ──► AcquisitionController ──► CompassEvent stream
//! (orientation, location)   (lifecycle state machine)  (heading, fix, status)
//!          │                        │
//!          └── permission probe     └── PointerSimulator (fallback)
//! ```
//!
//! [`service::CompassService`] wraps the controller with its own runtime for
//! synchronous frontends; async callers spawn
//! [`acquisition::AcquisitionController::run`] directly.

pub mod acquisition;
pub mod capability;
pub mod config;
pub mod heading;
pub mod location;
pub mod logging;
pub mod maplink;
pub mod service;
pub mod simulator;

/// Library version from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
