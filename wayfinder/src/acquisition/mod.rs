//! Heading and location acquisition lifecycle.
//!
//! The controller here is the only stateful piece of the compass: it walks
//! the permission/fallback state machine, pipes sensor and location feeds
//! into display events, and owns the current heading. Everything upstream
//! ([`crate::capability`]) and downstream ([`crate::heading`],
//! [`crate::maplink`]) is stateless or read-only.
//!
//! # State machine
//!
//! ```text
//!        ┌─(permission step)─► AwaitingPermission ─denied─► PermissionDenied
//!        │                             │ granted
//! Idle ──┤                             ▼
//!        ├─(ambient sensor)────► ActiveSensors ─(grace, no samples)─┐
//!        │                                                          ▼
//!        └─(no sensor, grace expires)────────────────► ActiveSimulated
//! ```
//!
//! `PermissionDenied` halts heading acquisition for good; an already
//! started location watch keeps delivering fixes in every state.

mod config;
mod controller;
mod events;
mod state;

pub use config::{
    AcquisitionConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_EVENT_CAPACITY, DEFAULT_GRACE_PERIOD_MS,
    PLACEHOLDER_LATITUDE, PLACEHOLDER_LONGITUDE,
};
pub use controller::AcquisitionController;
pub use events::{CompassEvent, HeadingUpdate};
pub use state::{AcquisitionState, StatusMessage};
