//! Service facade: runtime ownership and lifecycle.
//!
//! [`CompassService`] wraps the acquisition controller in a self-contained
//! unit for synchronous frontends: it creates its own Tokio runtime, spawns
//! the controller on it, and hands back the channel handles a frontend
//! needs. Frontends stay entirely runtime-free; the CLI drives everything
//! through the returned [`CompassHandles`].
//!
//! # Example
//!
//! ```ignore
//! use wayfinder::acquisition::AcquisitionConfig;
//! use wayfinder::capability::Platform;
//! use wayfinder::service::CompassService;
//!
//! let (service, mut handles) = CompassService::start(
//!     Platform::headless(),
//!     AcquisitionConfig::default(),
//! )?;
//!
//! while let Ok(event) = handles.events.blocking_recv() {
//!     // render
//! }
//!
//! service.shutdown();
//! ```

use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::acquisition::{
    AcquisitionConfig, AcquisitionController, AcquisitionState, CompassEvent,
};
use crate::capability::Platform;
use crate::location::LocationStore;
use crate::simulator::SurfacePoint;

/// How long shutdown waits for in-flight tasks before giving up.
const SHUTDOWN_TIMEOUT_SECS: u64 = 2;

/// Failure to start the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The Tokio runtime could not be created.
    #[error("failed to create async runtime: {0}")]
    RuntimeCreation(String),
}

/// Channel handles a frontend drives the compass through.
///
/// Handed out by [`CompassService::start`] before the controller runs, so
/// the event receiver observes the full startup sequence.
pub struct CompassHandles {
    /// Display events, oldest first. Lagging past the channel capacity
    /// drops oldest events rather than blocking acquisition.
    pub events: broadcast::Receiver<CompassEvent>,

    /// Lifecycle state, updated on every transition.
    pub state: watch::Receiver<AcquisitionState>,

    /// Pointer positions for the simulated fallback.
    pub pointer: mpsc::Sender<SurfacePoint>,

    /// Read handle to the most recent fix.
    pub store: LocationStore,
}

/// A running compass acquisition service with its own runtime.
pub struct CompassService {
    cancel: CancellationToken,
    runtime: Runtime,
}

impl CompassService {
    /// Start the service: create a runtime, spawn the controller on it,
    /// and return the frontend handles.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::RuntimeCreation`] if the Tokio runtime
    /// cannot be built.
    pub fn start(
        platform: Platform,
        config: AcquisitionConfig,
    ) -> Result<(Self, CompassHandles), ServiceError> {
        let runtime =
            Runtime::new().map_err(|e| ServiceError::RuntimeCreation(e.to_string()))?;

        let (controller, pointer) = AcquisitionController::new(platform, config);
        let handles = CompassHandles {
            events: controller.events(),
            state: controller.state(),
            pointer,
            store: controller.location_store(),
        };

        let cancel = CancellationToken::new();
        runtime.spawn(controller.run(cancel.clone()));
        info!("Compass service started");

        Ok((Self { cancel, runtime }, handles))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The service's cancellation token, for wiring external shutdown
    /// signals (Ctrl-C handlers and the like).
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // ========================================================================
    // Shutdown
    // ========================================================================

    /// Stop acquisition and tear down the runtime.
    ///
    /// Cancels the controller first, then gives in-flight tasks a bounded
    /// window to finish.
    pub fn shutdown(self) {
        info!("Shutting down compass service");
        self.cancel.cancel();
        self.runtime
            .shutdown_timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS));
        info!("Compass service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    fn fast_config() -> AcquisitionConfig {
        AcquisitionConfig::default()
            .with_grace_period(Duration::from_millis(30))
            .with_simulator_center(SurfacePoint::new(50.0, 50.0))
    }

    // Service tests are synchronous on purpose: the service owns its own
    // runtime, exactly as a CLI frontend uses it.

    #[test]
    fn test_start_and_shutdown() {
        let (service, handles) =
            CompassService::start(Platform::headless(), fast_config()).unwrap();

        // Headless platform seeds the placeholder after the grace period
        let deadline = Instant::now() + Duration::from_secs(2);
        while !handles.store.has_fix() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(handles.store.has_fix());

        service.shutdown();
    }

    #[test]
    fn test_events_observe_startup_sequence() {
        let (service, mut handles) =
            CompassService::start(Platform::headless(), fast_config()).unwrap();

        let first = handles.events.blocking_recv().unwrap();
        assert_eq!(first, CompassEvent::LocationUnavailable);

        service.shutdown();
    }

    #[test]
    fn test_pointer_flows_through_service() {
        let (service, mut handles) =
            CompassService::start(Platform::headless(), fast_config()).unwrap();

        // Wait for the simulated fallback, then steer due south
        let deadline = Instant::now() + Duration::from_secs(2);
        while !handles.store.has_fix() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        handles
            .pointer
            .blocking_send(SurfacePoint::new(50.0, 100.0))
            .unwrap();

        let update = loop {
            match handles.events.blocking_recv().unwrap() {
                CompassEvent::Heading(update) => break update,
                _ => continue,
            }
        };
        assert_eq!(update.display_degrees, 180);

        service.shutdown();
    }

    #[test]
    fn test_cancellation_token_stops_controller() {
        let (service, mut handles) =
            CompassService::start(Platform::headless(), fast_config()).unwrap();

        service.cancellation().cancel();

        // The event channel closes once the controller drops its sender
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match handles.events.blocking_recv() {
                Err(broadcast::error::RecvError::Closed) => break,
                _ if Instant::now() > deadline => panic!("controller did not stop"),
                _ => continue,
            }
        }

        service.shutdown();
    }
}
