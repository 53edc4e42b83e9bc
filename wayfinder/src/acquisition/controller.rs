//! The acquisition controller daemon.
//!
//! Owns the heading state machine and every piece of mutable acquisition
//! state. Inputs arrive on channels (sensor samples, location updates,
//! pointer positions, the permission resolution); outputs leave as
//! broadcast display events and a watchable lifecycle state. Nothing here
//! is shared mutable memory except the [`LocationStore`] handle.
//!
//! # Event flow
//!
//! ```text
//!  OrientationSource ──samples──►┐
//!  LocationSource ──fixes/errs──►│                    ┌──► CompassEvent (broadcast)
//!  pointer input ──positions────►│ AcquisitionController├──► AcquisitionState (watch)
//!  permission prompt ──oneshot──►┘                    └──► LocationStore (shared)
//! ```
//!
//! The grace timer races the first orientation sample: it arms whenever
//! samples could be flowing with no permission gate pending, and if it
//! fires before any heading arrives, the pointer simulator takes over.

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{AcquisitionConfig, AcquisitionState, CompassEvent, HeadingUpdate, StatusMessage};
use crate::capability::{
    CapabilityError, LocationUpdate, PermissionDecision, Platform, SensorAccess,
};
use crate::heading::{Heading, HeadingSample};
use crate::location::LocationStore;
use crate::simulator::{PointerSimulator, SurfacePoint};

/// The acquisition controller.
///
/// Create it with [`AcquisitionController::new`], grab the handles you need
/// ([`events`](Self::events), [`state`](Self::state),
/// [`location_store`](Self::location_store)), then hand it to the runtime:
///
/// ```ignore
/// let (controller, pointer_tx) = AcquisitionController::new(platform, config);
/// let events = controller.events();
/// let cancel = CancellationToken::new();
/// tokio::spawn(controller.run(cancel.clone()));
/// ```
pub struct AcquisitionController {
    config: AcquisitionConfig,
    platform: Platform,
    store: LocationStore,
    simulator: PointerSimulator,
    events: broadcast::Sender<CompassEvent>,
    state_tx: watch::Sender<AcquisitionState>,
    pointer_rx: mpsc::Receiver<SurfacePoint>,
}

impl AcquisitionController {
    /// Create a controller with its pointer-input channel.
    ///
    /// Returns the controller and the sender frontends use to deliver
    /// pointer positions. Positions are ignored until the simulated
    /// fallback engages.
    pub fn new(
        platform: Platform,
        config: AcquisitionConfig,
    ) -> (Self, mpsc::Sender<SurfacePoint>) {
        let (pointer_tx, pointer_rx) = mpsc::channel(config.channel_capacity);
        let (events, _) = broadcast::channel(config.event_capacity);
        let (state_tx, _) = watch::channel(AcquisitionState::Idle);
        let simulator = PointerSimulator::new(config.simulator_center);

        let controller = Self {
            config,
            platform,
            store: LocationStore::new(),
            simulator,
            events,
            state_tx,
            pointer_rx,
        };

        (controller, pointer_tx)
    }

    /// Subscribe to display events.
    ///
    /// Subscribe before spawning [`run`](Self::run) to observe the startup
    /// sequence; a lagging receiver misses oldest events, never blocks.
    pub fn events(&self) -> broadcast::Receiver<CompassEvent> {
        self.events.subscribe()
    }

    /// Observe lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<AcquisitionState> {
        self.state_tx.subscribe()
    }

    /// Handle to the shared location store.
    pub fn location_store(&self) -> LocationStore {
        self.store.clone()
    }

    /// Runs the controller until the token is cancelled.
    ///
    /// Startup order: permission step (if the platform has one), then the
    /// location watch, then orientation dispatch. The location watch runs
    /// for the controller's whole lifetime regardless of what heading
    /// acquisition does.
    pub async fn run(self, cancel: CancellationToken) {
        let Self {
            config,
            platform,
            store,
            simulator,
            events,
            state_tx,
            mut pointer_rx,
        } = self;

        info!(
            grace_ms = config.grace_period.as_millis() as u64,
            sensor = ?platform.sensor_access(),
            location = platform.has_location(),
            "Acquisition controller starting"
        );

        let (sample_tx, mut sample_rx) = mpsc::channel::<HeadingSample>(config.channel_capacity);
        let (location_tx, mut location_rx) =
            mpsc::channel::<LocationUpdate>(config.channel_capacity);
        let (decision_tx, mut decision_rx) =
            oneshot::channel::<Result<PermissionDecision, CapabilityError>>();

        let mut sample_tx = Some(sample_tx);

        if platform.needs_permission_step() {
            Self::set_state(&state_tx, AcquisitionState::AwaitingPermission);
            Self::emit(
                &events,
                CompassEvent::Status(StatusMessage::PermissionsRequired),
            );
            Self::emit(&events, CompassEvent::PermissionControl { visible: true });
        }

        match platform.location() {
            Some(source) => {
                if let Err(err) =
                    source.watch(config.watch_options, location_tx, cancel.child_token())
                {
                    warn!(error = %err, "Location watch could not start");
                    Self::emit(&events, CompassEvent::LocationUnavailable);
                }
            }
            None => Self::emit(&events, CompassEvent::LocationUnavailable),
        }

        let orientation = platform.orientation().cloned();

        let grace = tokio::time::sleep(config.grace_period);
        tokio::pin!(grace);
        let mut grace_armed = false;
        let mut awaiting_decision = false;
        let mut sensors_live = false;
        let mut simulated = false;
        let mut current_heading: Option<Heading> = None;

        if let Some(source) = orientation.clone() {
            match source.access() {
                SensorAccess::Gated => {
                    // Single-shot: the prompt resolves exactly once, and the
                    // grace timer stays unarmed until it does.
                    debug!("Requesting orientation permission");
                    awaiting_decision = true;
                    tokio::spawn(async move {
                        let result = source.request_permission().await;
                        let _ = decision_tx.send(result);
                    });
                }
                SensorAccess::Ambient => {
                    if let Some(tx) = sample_tx.take() {
                        match source.subscribe(tx, cancel.child_token()) {
                            Ok(()) => sensors_live = true,
                            Err(err) => {
                                warn!(error = %err, "Orientation subscription failed");
                            }
                        }
                    }
                    Self::activate(&state_tx, &events);
                    grace_armed = true;
                }
            }
        } else {
            if platform.has_location() {
                // Location-only platform: the watch is the only feed and it
                // needs no explicit permission resolution.
                Self::activate(&state_tx, &events);
            }
            sample_tx = None;
            grace_armed = true;
        }

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("Acquisition controller shutting down");
                    break;
                }

                result = &mut decision_rx, if awaiting_decision => {
                    awaiting_decision = false;
                    match result {
                        Ok(Ok(PermissionDecision::Granted)) => {
                            info!("Orientation permission granted");
                            if let Some(source) = orientation.as_ref() {
                                if let Some(tx) = sample_tx.take() {
                                    match source.subscribe(tx, cancel.child_token()) {
                                        Ok(()) => sensors_live = true,
                                        Err(err) => {
                                            warn!(error = %err, "Orientation subscription failed");
                                        }
                                    }
                                }
                            }
                            Self::activate(&state_tx, &events);
                            grace.as_mut().reset(tokio::time::Instant::now() + config.grace_period);
                            grace_armed = true;
                        }
                        Ok(Ok(PermissionDecision::Denied)) => {
                            sample_tx = None;
                            Self::set_state(&state_tx, AcquisitionState::PermissionDenied);
                            Self::emit(
                                &events,
                                CompassEvent::Status(StatusMessage::PermissionDenied),
                            );
                            Self::emit(&events, CompassEvent::PermissionControl { visible: false });
                            info!("Orientation permission denied; heading acquisition halted");
                        }
                        Ok(Err(err)) => {
                            sample_tx = None;
                            error!(
                                error = %err,
                                "Permission request mechanism failed; heading acquisition halted"
                            );
                        }
                        Err(_) => {
                            sample_tx = None;
                            error!("Permission request dropped without resolving; heading acquisition halted");
                        }
                    }
                }

                _ = &mut grace, if grace_armed => {
                    grace_armed = false;
                    sensors_live = false;
                    sample_tx = None;
                    simulated = true;
                    Self::set_state(&state_tx, AcquisitionState::ActiveSimulated);
                    Self::emit(&events, CompassEvent::Status(StatusMessage::SimulatedMode));
                    Self::emit(&events, CompassEvent::PermissionControl { visible: false });
                    info!(
                        grace_ms = config.grace_period.as_millis() as u64,
                        "No orientation data within grace period; pointer simulation engaged"
                    );

                    if !platform.has_location() {
                        store.record(config.placeholder_fix);
                        Self::emit(&events, CompassEvent::Fix(config.placeholder_fix));
                        debug!(
                            latitude = config.placeholder_fix.latitude,
                            longitude = config.placeholder_fix.longitude,
                            "Seeded placeholder fix"
                        );
                    }
                }

                Some(sample) = sample_rx.recv(), if sensors_live => {
                    if Self::apply_sample(&events, &mut current_heading, sample) && grace_armed {
                        grace_armed = false;
                        debug!("First orientation sample arrived; simulated fallback cancelled");
                    }
                }

                Some(pointer) = pointer_rx.recv() => {
                    // Dropped until the simulated fallback engages; real and
                    // simulated headings never interleave.
                    if simulated {
                        let sample = simulator.sample(pointer);
                        Self::apply_sample(&events, &mut current_heading, sample);
                    }
                }

                Some(update) = location_rx.recv() => match update {
                    LocationUpdate::Fix(fix) => {
                        store.record(fix);
                        Self::emit(&events, CompassEvent::Fix(fix));
                        debug!(
                            latitude = fix.latitude,
                            longitude = fix.longitude,
                            "Location fix recorded"
                        );
                    }
                    LocationUpdate::Error(err) => {
                        // Per-fix failure; the watch stays active
                        warn!(code = err.code(), error = %err, "Location watch error");
                    }
                },
            }
        }

        info!(
            last_heading = ?current_heading.map(|h| h.degrees()),
            "Acquisition controller stopped"
        );
    }

    /// Enter `ActiveSensors` with its display side effects.
    fn activate(
        state_tx: &watch::Sender<AcquisitionState>,
        events: &broadcast::Sender<CompassEvent>,
    ) {
        Self::set_state(state_tx, AcquisitionState::ActiveSensors);
        Self::emit(events, CompassEvent::Status(StatusMessage::Active));
        Self::emit(events, CompassEvent::PermissionControl { visible: false });
    }

    /// Normalize a sample into display events. Returns whether the sample
    /// actually carried a heading.
    fn apply_sample(
        events: &broadcast::Sender<CompassEvent>,
        current: &mut Option<Heading>,
        sample: HeadingSample,
    ) -> bool {
        match Heading::from_sample(sample) {
            Some(heading) => {
                *current = Some(heading);
                Self::emit(
                    events,
                    CompassEvent::Heading(HeadingUpdate::from_heading(heading)),
                );
                true
            }
            None => {
                // Empty samples are valid input and drop silently
                debug!("Orientation sample carried no heading");
                false
            }
        }
    }

    fn set_state(state_tx: &watch::Sender<AcquisitionState>, next: AcquisitionState) {
        let prev = state_tx.send_replace(next);
        if prev != next {
            info!(from = %prev, to = %next, "Acquisition state changed");
        }
    }

    fn emit(events: &broadcast::Sender<CompassEvent>, event: CompassEvent) {
        // No receivers is fine; acquisition never blocks on observers
        let _ = events.send(event);
    }
}
