//! Integration tests for the acquisition lifecycle.
//!
//! These tests drive the complete flow with scripted capability sources:
//! - Permission probe → subscription → heading events
//! - Grace timer racing the first sample
//! - Simulated pointer fallback
//! - Location watch independence from heading acquisition
//!
//! Run with: `cargo test --test acquisition_integration`

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use wayfinder::acquisition::{
    AcquisitionConfig, AcquisitionController, AcquisitionState, CompassEvent, StatusMessage,
};
use wayfinder::capability::{
    CapabilityError, LocationSource, LocationUpdate, OrientationSource, PermissionDecision,
    Platform, SensorAccess, WatchError, WatchOptions,
};
use wayfinder::heading::{Cardinal, HeadingSample};
use wayfinder::location::Coordinate;
use wayfinder::simulator::SurfacePoint;

// ============================================================================
// Scripted Capability Sources
// ============================================================================

/// How a scripted sensor resolves its permission prompt.
#[derive(Clone, Copy)]
enum PromptScript {
    Grant,
    Deny,
    /// The prompt mechanism itself fails (distinct from a denial).
    Fail,
}

/// Orientation source that resolves a scripted prompt and then plays back
/// a fixed sequence of samples.
struct ScriptedSensor {
    access: SensorAccess,
    prompt: PromptScript,
    prompt_delay: Duration,
    samples: Vec<HeadingSample>,
    sample_delay: Duration,
}

impl ScriptedSensor {
    fn ambient(samples: Vec<HeadingSample>) -> Self {
        Self {
            access: SensorAccess::Ambient,
            prompt: PromptScript::Grant,
            prompt_delay: Duration::ZERO,
            samples,
            sample_delay: Duration::from_millis(5),
        }
    }

    fn gated(prompt: PromptScript, samples: Vec<HeadingSample>) -> Self {
        Self {
            access: SensorAccess::Gated,
            prompt,
            prompt_delay: Duration::from_millis(10),
            samples,
            sample_delay: Duration::from_millis(5),
        }
    }

    fn with_sample_delay(mut self, delay: Duration) -> Self {
        self.sample_delay = delay;
        self
    }
}

impl OrientationSource for ScriptedSensor {
    fn access(&self) -> SensorAccess {
        self.access
    }

    fn request_permission(&self) -> BoxFuture<'_, Result<PermissionDecision, CapabilityError>> {
        let prompt = self.prompt;
        let delay = self.prompt_delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            match prompt {
                PromptScript::Grant => Ok(PermissionDecision::Granted),
                PromptScript::Deny => Ok(PermissionDecision::Denied),
                PromptScript::Fail => Err(CapabilityError::PermissionRequest(
                    "prompt crashed".to_string(),
                )),
            }
        })
    }

    fn subscribe(
        &self,
        sink: mpsc::Sender<HeadingSample>,
        cancel: CancellationToken,
    ) -> Result<(), CapabilityError> {
        let samples = self.samples.clone();
        let delay = self.sample_delay;
        tokio::spawn(async move {
            for sample in samples {
                tokio::time::sleep(delay).await;
                if cancel.is_cancelled() || sink.send(sample).await.is_err() {
                    return;
                }
            }
            // A real sensor stays subscribed after its last reading
            cancel.cancelled().await;
        });
        Ok(())
    }
}

/// Location source that plays back a fixed sequence of updates.
struct ScriptedLocation {
    updates: Vec<LocationUpdate>,
    update_delay: Duration,
    fail_watch: bool,
}

impl ScriptedLocation {
    fn with_updates(updates: Vec<LocationUpdate>) -> Self {
        Self {
            updates,
            update_delay: Duration::from_millis(10),
            fail_watch: false,
        }
    }

    fn failing() -> Self {
        Self {
            updates: Vec::new(),
            update_delay: Duration::ZERO,
            fail_watch: true,
        }
    }
}

impl LocationSource for ScriptedLocation {
    fn watch(
        &self,
        _options: WatchOptions,
        sink: mpsc::Sender<LocationUpdate>,
        cancel: CancellationToken,
    ) -> Result<(), CapabilityError> {
        if self.fail_watch {
            return Err(CapabilityError::Watch("no provider".to_string()));
        }
        let updates = self.updates.clone();
        let delay = self.update_delay;
        tokio::spawn(async move {
            for update in updates {
                tokio::time::sleep(delay).await;
                if cancel.is_cancelled() || sink.send(update).await.is_err() {
                    return;
                }
            }
            cancel.cancelled().await;
        });
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

const NEW_YORK: Coordinate = Coordinate {
    latitude: 40.7128,
    longitude: -74.0060,
};

const LONDON: Coordinate = Coordinate {
    latitude: 51.5074,
    longitude: -0.1278,
};

fn fast_config() -> AcquisitionConfig {
    AcquisitionConfig::default()
        .with_grace_period(Duration::from_millis(60))
        .with_simulator_center(SurfacePoint::new(100.0, 100.0))
}

async fn next_event(rx: &mut broadcast::Receiver<CompassEvent>) -> CompassEvent {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Event channel closed")
}

/// Skip forward to the next heading event.
async fn next_heading(rx: &mut broadcast::Receiver<CompassEvent>) -> wayfinder::acquisition::HeadingUpdate {
    loop {
        if let CompassEvent::Heading(update) = next_event(rx).await {
            return update;
        }
    }
}

/// Skip forward to the next fix event.
async fn next_fix(rx: &mut broadcast::Receiver<CompassEvent>) -> Coordinate {
    loop {
        if let CompassEvent::Fix(fix) = next_event(rx).await {
            return fix;
        }
    }
}

async fn wait_for_state(rx: &mut watch::Receiver<AcquisitionState>, state: AcquisitionState) {
    timeout(Duration::from_secs(1), rx.wait_for(|s| *s == state))
        .await
        .expect("Timeout waiting for state")
        .expect("State channel closed");
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Ambient sensor with a location watch: the full happy path.
///
/// 1. Permission step shows (the platform has capabilities to resolve)
/// 2. Ambient subscription activates sensors immediately
/// 3. An alpha-only sample becomes heading 360 - alpha
/// 4. The location fix lands in the store and the event stream
#[tokio::test]
async fn test_ambient_sensor_full_flow() {
    let platform = Platform::headless()
        .with_orientation(Arc::new(ScriptedSensor::ambient(vec![
            HeadingSample::from_alpha(350.0),
        ])))
        .with_location(Arc::new(ScriptedLocation::with_updates(vec![
            LocationUpdate::Fix(NEW_YORK),
        ])));

    let (controller, _pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut events = controller.events();
    let mut state = controller.state();
    let store = controller.location_store();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    // Startup order: permission step first, then activation
    assert_eq!(
        next_event(&mut events).await,
        CompassEvent::Status(StatusMessage::PermissionsRequired)
    );
    assert_eq!(
        next_event(&mut events).await,
        CompassEvent::PermissionControl { visible: true }
    );
    assert_eq!(
        next_event(&mut events).await,
        CompassEvent::Status(StatusMessage::Active)
    );
    assert_eq!(
        next_event(&mut events).await,
        CompassEvent::PermissionControl { visible: false }
    );
    wait_for_state(&mut state, AcquisitionState::ActiveSensors).await;

    // Heading and fix arrive on independent schedules; collect both
    let mut heading = None;
    let mut fix = None;
    while heading.is_none() || fix.is_none() {
        match next_event(&mut events).await {
            CompassEvent::Heading(update) => heading = Some(update),
            CompassEvent::Fix(coordinate) => fix = Some(coordinate),
            _ => continue,
        }
    }

    // 360 - 350 = 10, due north sector, dial counter-rotates
    let update = heading.expect("heading collected");
    assert!((update.degrees - 10.0).abs() < 1e-9);
    assert_eq!(update.display_degrees, 10);
    assert_eq!(update.cardinal, Cardinal::N);
    assert!((update.rotation_deg + 10.0).abs() < 1e-9);

    let fix = fix.expect("fix collected");
    assert!((fix.latitude - NEW_YORK.latitude).abs() < 1e-9);
    assert_eq!(
        store.latest().map(|c| c.longitude),
        Some(NEW_YORK.longitude),
        "Fix should land in the shared store"
    );

    cancel.cancel();
    let _ = handle.await;
}

/// Gated sensor, permission granted: the grace timer restarts on grant and
/// the first sample races it.
#[tokio::test]
async fn test_gated_sensor_granted() {
    let platform = Platform::headless().with_orientation(Arc::new(ScriptedSensor::gated(
        PromptScript::Grant,
        vec![HeadingSample::from_absolute(225.0)],
    )));

    let (controller, _pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut events = controller.events();
    let mut state = controller.state();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    wait_for_state(&mut state, AcquisitionState::AwaitingPermission).await;
    wait_for_state(&mut state, AcquisitionState::ActiveSensors).await;

    // Absolute heading passes through untouched
    let update = next_heading(&mut events).await;
    assert!((update.degrees - 225.0).abs() < 1e-9);
    assert_eq!(update.cardinal, Cardinal::SW);
    assert!((update.rotation_deg + 225.0).abs() < 1e-9);

    // The sample beat the post-grant grace window, so no fallback
    assert_eq!(*state.borrow(), AcquisitionState::ActiveSensors);

    cancel.cancel();
    let _ = handle.await;
}

/// Gated sensor, permission denied: heading acquisition halts for good,
/// but the location watch keeps delivering fixes.
#[tokio::test]
async fn test_gated_sensor_denied_location_continues() {
    let platform = Platform::headless()
        .with_orientation(Arc::new(ScriptedSensor::gated(
            PromptScript::Deny,
            vec![HeadingSample::from_absolute(90.0)],
        )))
        .with_location(Arc::new(ScriptedLocation::with_updates(vec![
            LocationUpdate::Fix(NEW_YORK),
            LocationUpdate::Fix(LONDON),
        ])));

    let (controller, _pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut events = controller.events();
    let mut state = controller.state();
    let store = controller.location_store();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    wait_for_state(&mut state, AcquisitionState::PermissionDenied).await;

    // Both fixes still arrive after the denial
    let first = next_fix(&mut events).await;
    assert!((first.latitude - NEW_YORK.latitude).abs() < 1e-9);
    let second = next_fix(&mut events).await;
    assert!((second.latitude - LONDON.latitude).abs() < 1e-9);
    assert_eq!(
        store.latest().map(|c| c.latitude),
        Some(LONDON.latitude),
        "Store should hold the most recent fix"
    );

    // Denial is terminal for heading acquisition: no simulated fallback
    assert_eq!(*state.borrow(), AcquisitionState::PermissionDenied);

    cancel.cancel();
    let _ = handle.await;
}

/// The denial status message matches the display text verbatim.
#[tokio::test]
async fn test_denied_status_text() {
    let platform = Platform::headless().with_orientation(Arc::new(ScriptedSensor::gated(
        PromptScript::Deny,
        Vec::new(),
    )));

    let (controller, _pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut events = controller.events();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    let status = loop {
        match next_event(&mut events).await {
            CompassEvent::Status(status) if status != StatusMessage::PermissionsRequired => {
                break status;
            }
            _ => continue,
        }
    };
    assert_eq!(status, StatusMessage::PermissionDenied);
    assert_eq!(status.as_str(), "Compass permission denied");

    cancel.cancel();
    let _ = handle.await;
}

/// A subscribed sensor that never produces a sample loses the race to the
/// grace timer, and the pointer simulator takes over.
#[tokio::test]
async fn test_silent_sensor_falls_back_to_simulated() {
    let platform = Platform::headless()
        .with_orientation(Arc::new(ScriptedSensor::ambient(Vec::new())))
        .with_location(Arc::new(ScriptedLocation::with_updates(vec![
            LocationUpdate::Fix(LONDON),
        ])));

    let (controller, pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut events = controller.events();
    let mut state = controller.state();
    let store = controller.location_store();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    wait_for_state(&mut state, AcquisitionState::ActiveSensors).await;
    wait_for_state(&mut state, AcquisitionState::ActiveSimulated).await;

    // Due west of the 100,100 center
    pointer_tx
        .send(SurfacePoint::new(0.0, 100.0))
        .await
        .unwrap();
    let update = next_heading(&mut events).await;
    assert_eq!(update.display_degrees, 270);
    assert_eq!(update.cardinal, Cardinal::W);

    // Real location capability exists, so no placeholder is seeded
    timeout(Duration::from_millis(200), async {
        while store.latest().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("Timeout waiting for real fix");
    assert_eq!(
        store.latest().map(|c| c.latitude),
        Some(LONDON.latitude),
        "Store should hold the real fix, not the placeholder"
    );

    cancel.cancel();
    let _ = handle.await;
}

/// A sample arriving within the grace period cancels the fallback.
#[tokio::test]
async fn test_sample_within_grace_cancels_fallback() {
    let platform = Platform::headless().with_orientation(Arc::new(
        ScriptedSensor::ambient(vec![HeadingSample::from_absolute(45.0)])
            .with_sample_delay(Duration::from_millis(10)),
    ));

    let (controller, _pointer_tx) = AcquisitionController::new(
        platform,
        fast_config().with_grace_period(Duration::from_millis(100)),
    );
    let mut events = controller.events();
    let mut state = controller.state();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    let update = next_heading(&mut events).await;
    assert_eq!(update.cardinal, Cardinal::NE);

    // Wait past where the grace timer would have fired
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        *state.borrow(),
        AcquisitionState::ActiveSensors,
        "Fallback should never engage once a heading arrived"
    );

    cancel.cancel();
    let _ = handle.await;
}

/// Samples with no orientation data do not count as headings: the grace
/// timer still fires.
#[tokio::test]
async fn test_empty_samples_do_not_cancel_fallback() {
    let platform = Platform::headless().with_orientation(Arc::new(
        ScriptedSensor::ambient(vec![HeadingSample::default(), HeadingSample::default()])
            .with_sample_delay(Duration::from_millis(5)),
    ));

    let (controller, _pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut state = controller.state();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    wait_for_state(&mut state, AcquisitionState::ActiveSimulated).await;

    cancel.cancel();
    let _ = handle.await;
}

/// A failed permission mechanism leaves the controller awaiting forever,
/// while the location watch keeps working.
#[tokio::test]
async fn test_prompt_failure_halts_heading_only() {
    let platform = Platform::headless()
        .with_orientation(Arc::new(ScriptedSensor::gated(
            PromptScript::Fail,
            Vec::new(),
        )))
        .with_location(Arc::new(ScriptedLocation::with_updates(vec![
            LocationUpdate::Fix(NEW_YORK),
        ])));

    let (controller, _pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut events = controller.events();
    let mut state = controller.state();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    wait_for_state(&mut state, AcquisitionState::AwaitingPermission).await;
    let fix = next_fix(&mut events).await;
    assert!((fix.latitude - NEW_YORK.latitude).abs() < 1e-9);

    // No grant, no denial, no fallback: the state never moves
    assert_eq!(*state.borrow(), AcquisitionState::AwaitingPermission);

    cancel.cancel();
    let _ = handle.await;
}

/// Per-fix watch errors are logged and skipped; later fixes still arrive.
#[tokio::test]
async fn test_watch_errors_interleave_with_fixes() {
    let platform = Platform::headless().with_location(Arc::new(
        ScriptedLocation::with_updates(vec![
            LocationUpdate::Error(WatchError::Timeout),
            LocationUpdate::Fix(NEW_YORK),
            LocationUpdate::Error(WatchError::PositionUnavailable),
            LocationUpdate::Fix(LONDON),
        ]),
    ));

    let (controller, _pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut events = controller.events();
    let store = controller.location_store();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    let first = next_fix(&mut events).await;
    assert!((first.latitude - NEW_YORK.latitude).abs() < 1e-9);
    let second = next_fix(&mut events).await;
    assert!((second.latitude - LONDON.latitude).abs() < 1e-9);

    assert_eq!(
        store.latest().map(|c| c.latitude),
        Some(LONDON.latitude),
        "Last write wins in the store"
    );

    cancel.cancel();
    let _ = handle.await;
}

/// A watch that cannot start is reported as location unavailability. The
/// capability still exists, so the fallback does not seed the placeholder
/// and the store simply stays empty.
#[tokio::test]
async fn test_failed_watch_reports_unavailable() {
    let platform = Platform::headless().with_location(Arc::new(ScriptedLocation::failing()));

    let (controller, _pointer_tx) = AcquisitionController::new(platform, fast_config());
    let mut events = controller.events();
    let mut state = controller.state();
    let store = controller.location_store();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(controller.run(cancel.clone()));

    wait_for_state(&mut state, AcquisitionState::ActiveSimulated).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut saw_unavailable = false;
    let mut saw_fix = false;
    loop {
        match events.try_recv() {
            Ok(CompassEvent::LocationUnavailable) => saw_unavailable = true,
            Ok(CompassEvent::Fix(_)) => saw_fix = true,
            Ok(_) => continue,
            Err(_) => break,
        }
    }
    assert!(saw_unavailable, "Failed watch should report unavailability");
    assert!(!saw_fix, "No placeholder when a location capability exists");
    assert!(
        store.latest().is_none(),
        "Store stays empty when the watch cannot start"
    );

    cancel.cancel();
    let _ = handle.await;
}
