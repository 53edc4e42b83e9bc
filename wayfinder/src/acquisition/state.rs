//! Acquisition lifecycle state and user-facing status text.

use serde::Serialize;

/// Heading acquisition lifecycle state.
///
/// Transitions are driven solely by permission resolutions and the grace
/// timer; there is no external "retry" input. `PermissionDenied` is
/// terminal for heading acquisition, though an already-started location
/// watch keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AcquisitionState {
    /// Created, nothing attempted yet.
    Idle,

    /// A permission step is pending resolution.
    AwaitingPermission,

    /// The permission request resolved denied. Heading acquisition halts
    /// and is never retried.
    PermissionDenied,

    /// Real platform feeds are subscribed.
    ActiveSensors,

    /// Pointer-simulated headings are flowing.
    ActiveSimulated,
}

impl AcquisitionState {
    /// Human-readable description for logging/UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionState::Idle => "Idle",
            AcquisitionState::AwaitingPermission => "AwaitingPermission",
            AcquisitionState::PermissionDenied => "PermissionDenied",
            AcquisitionState::ActiveSensors => "ActiveSensors",
            AcquisitionState::ActiveSimulated => "ActiveSimulated",
        }
    }
}

impl std::fmt::Display for AcquisitionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status line text shown to the user.
///
/// The exact strings are part of the product surface; frontends render them
/// verbatim and tests match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusMessage {
    /// A permission step stands between the user and live data.
    PermissionsRequired,

    /// The orientation permission request resolved denied.
    PermissionDenied,

    /// Live feeds are subscribed.
    Active,

    /// Simulated headings from pointer movement.
    SimulatedMode,
}

impl StatusMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusMessage::PermissionsRequired => "Permissions required",
            StatusMessage::PermissionDenied => "Compass permission denied",
            StatusMessage::Active => "Active",
            StatusMessage::SimulatedMode => "Desktop Mode (Simulated)",
        }
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
