//! Scan session: one capture surface from open to close
//!
//! The session owns the capture state, the acquired device and the
//! sampling loop. The catalog arrives as a `watch` channel of immutable
//! snapshots; each decoded payload is resolved against the snapshot
//! current at that moment.

use crate::config::ScannerConfig;
use crate::decoder::FrameDecoder;
use crate::device::{
    CaptureBackend, CaptureEnvironment, DeviceGuard, FrameSource, select_camera,
};
use crate::error::{CaptureError, ScanError, ScanResult};
use crate::notify::{Notification, Notifier};
use crate::resolver::resolve_with_stage;
use crate::state::{CaptureEvent, CaptureState, InvalidTransition, UnmatchedReason};
use shared::models::{CatalogItem, CatalogSnapshot};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// How a call to [`ScanSession::run`] ended
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// An item was found; the device is already released
    Matched(Box<CatalogItem>),
    /// The surface was closed
    Closed,
    /// The device could not be acquired or was lost
    Failed(CaptureError),
}

pub struct ScanSession<B, D, N>
where
    B: CaptureBackend,
{
    backend: B,
    decoder: D,
    notifier: N,
    config: ScannerConfig,
    catalog: watch::Receiver<CatalogSnapshot>,
    state: CaptureState,
    state_tx: watch::Sender<CaptureState>,
    device: Option<DeviceGuard<B::Source>>,
    mobile: bool,
}

impl<B, D, N> ScanSession<B, D, N>
where
    B: CaptureBackend,
    D: FrameDecoder<<B::Source as FrameSource>::Frame>,
    N: Notifier,
{
    pub fn new(
        backend: B,
        decoder: D,
        notifier: N,
        catalog: watch::Receiver<CatalogSnapshot>,
        config: ScannerConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(CaptureState::Idle);
        let mobile = backend.environment().mobile;
        Self {
            backend,
            decoder,
            notifier,
            config,
            catalog,
            state: CaptureState::Idle,
            state_tx,
            device: None,
            mobile,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<CaptureState> {
        self.state_tx.subscribe()
    }

    pub fn has_active_device(&self) -> bool {
        self.device.as_ref().is_some_and(|d| d.is_active())
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    fn apply(&mut self, event: CaptureEvent) -> Result<(), InvalidTransition> {
        let event_name = event.name();
        let next = self.state.on(event)?;
        if !next.holds_device() {
            self.release_device();
        }
        debug!(from = self.state.name(), to = next.name(), event = event_name, "Capture transition");
        self.state = next;
        self.state_tx.send_replace(self.state.clone());
        Ok(())
    }

    fn release_device(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.release();
        }
    }

    /// Open the surface: check the environment, pick and acquire a camera,
    /// start scanning
    ///
    /// A failure notifies the operator and leaves the session `Idle`;
    /// retrying is another call to `open`. Cancelling `shutdown` while the
    /// device is being negotiated closes the surface.
    #[instrument(skip_all)]
    pub async fn open(&mut self, shutdown: &CancellationToken) -> ScanResult<()> {
        self.apply(CaptureEvent::Open)?;
        let env = self.backend.environment();
        self.mobile = env.mobile;

        let acquired = {
            let backend = &self.backend;
            tokio::select! {
                _ = shutdown.cancelled() => None,
                result = acquire(backend, env) => Some(result),
            }
        };

        match acquired {
            None => {
                info!("Surface closed during camera negotiation");
                self.close();
                Ok(())
            }
            Some(Err(err)) => {
                warn!(error = %err, code = %err.code(), "Camera acquisition failed");
                self.apply(CaptureEvent::AcquireFailed)?;
                self.notifier
                    .notify(Notification::capture_failed(&err, self.mobile));
                Err(ScanError::Capture(err))
            }
            Some(Ok(device)) => {
                let camera = device.label().to_string();
                self.device = Some(device);
                self.apply(CaptureEvent::PermissionGranted {
                    camera: camera.clone(),
                })?;
                self.apply(CaptureEvent::ScannerStarted)?;
                info!(camera = %camera, "Scanner started");
                self.notifier.notify(Notification::camera_active(self.mobile));
                Ok(())
            }
        }
    }

    /// Scan until an item matches, the device fails or `shutdown` fires
    ///
    /// Opens the surface first when idle. A matched item must be dismissed
    /// before scanning again.
    #[instrument(skip_all)]
    pub async fn run(&mut self, shutdown: CancellationToken) -> ScanResult<ScanOutcome> {
        if let CaptureState::Matched { .. } = self.state {
            return Err(ScanError::Transition(InvalidTransition {
                from: self.state.name(),
                event: "run",
            }));
        }

        if self.state.is_idle() {
            match self.open(&shutdown).await {
                Ok(()) => {}
                Err(ScanError::Capture(err)) => return Ok(ScanOutcome::Failed(err)),
                Err(e) => return Err(e),
            }
            if self.state.is_idle() {
                return Ok(ScanOutcome::Closed);
            }
        }

        let mut ticker = tokio::time::interval(self.config.scan_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if let CaptureState::Unmatched { reason, .. } = &self.state {
                let delay = match reason {
                    UnmatchedReason::NoMatch => self.config.no_match_resume,
                    UnmatchedReason::ProcessingFailed => self.config.error_resume,
                };
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        self.close();
                        return Ok(ScanOutcome::Closed);
                    }
                    _ = tokio::time::sleep(delay) => {
                        self.apply(CaptureEvent::Resume)?;
                        debug!("Scanning resumed");
                        ticker.reset();
                        continue;
                    }
                }
            }

            if !self.state.is_decoding() {
                return Ok(ScanOutcome::Closed);
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    self.close();
                    return Ok(ScanOutcome::Closed);
                }
                _ = ticker.tick() => {}
            }

            let frame = match self.device.as_mut() {
                Some(device) => {
                    tokio::select! {
                        _ = shutdown.cancelled() => None,
                        frame = device.next_frame() => Some(frame),
                    }
                }
                None => Some(None),
            };

            let frame = match frame {
                None => {
                    self.close();
                    return Ok(ScanOutcome::Closed);
                }
                Some(None) => {
                    warn!("Capture stream ended");
                    self.apply(CaptureEvent::DeviceLost)?;
                    let err = CaptureError::Unknown("camera stream ended".to_string());
                    self.notifier
                        .notify(Notification::capture_failed(&err, self.mobile));
                    return Ok(ScanOutcome::Failed(err));
                }
                Some(Some(frame)) => frame,
            };

            if let Some(item) = self.handle_frame(&frame)? {
                return Ok(ScanOutcome::Matched(item));
            }
        }
    }

    /// Decode and resolve one frame. Returns the item on a match.
    fn handle_frame(
        &mut self,
        frame: &<B::Source as FrameSource>::Frame,
    ) -> Result<Option<Box<CatalogItem>>, InvalidTransition> {
        let payload = match self.decoder.decode(frame) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "Failed to process frame");
                self.apply(CaptureEvent::ProcessingFailed(String::new()))?;
                self.notifier.notify(Notification::processing_failed());
                return Ok(None);
            }
        };

        let snapshot = self.catalog.borrow().clone();
        let clean = payload.trim().to_string();

        match resolve_with_stage(&clean, &snapshot) {
            Some((item, stage)) => {
                info!(
                    item_id = %item.id,
                    short_code = %item.short_code,
                    stage = %stage,
                    "Item matched"
                );
                let item = Box::new(item.clone());
                self.apply(CaptureEvent::ItemMatched(item.clone()))?;
                self.notifier.notify(Notification::item_found(&item));
                Ok(Some(item))
            }
            None => {
                info!(payload_len = clean.len(), items = snapshot.len(), "No item matched");
                self.notifier.notify(Notification::item_not_found(&clean));
                self.apply(CaptureEvent::NoMatch(clean))?;
                Ok(None)
            }
        }
    }

    /// Leave the item detail view
    pub fn dismiss(&mut self) -> Result<(), InvalidTransition> {
        self.apply(CaptureEvent::Dismiss)
    }

    /// Close the surface, releasing any device. Valid in every state.
    pub fn close(&mut self) {
        self.release_device();
        if !self.state.is_idle() {
            info!(from = self.state.name(), "Capture surface closed");
        }
        self.state = CaptureState::Idle;
        self.state_tx.send_replace(CaptureState::Idle);
    }
}

/// Environment checks, camera selection and acquisition
///
/// The source is wrapped in a guard as soon as it exists, so dropping
/// this future at any point leaves no device held.
async fn acquire<B: CaptureBackend>(
    backend: &B,
    env: CaptureEnvironment,
) -> Result<DeviceGuard<B::Source>, CaptureError> {
    env.preflight()?;
    let cameras = backend.list_cameras().await?;
    let request = select_camera(&cameras, env.mobile);
    debug!(cameras = cameras.len(), request = %request.describe(), "Camera selected");
    let source = backend.acquire(&request).await?;
    Ok(DeviceGuard::new(source, request.describe()))
}
