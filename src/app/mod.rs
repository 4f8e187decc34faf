// SPDX-License-Identifier: GPL-3.0-only

//! Photo booth controller
//!
//! The controller owns the capture session and sequences the booth flow
//! `Camera → CountingDown → Capturing → Editing → (retake | export)`. It is
//! driven with [`Message`]s and reports to the presentation layer through a
//! channel of [`BoothEvent`]s.
//!
//! # Architecture
//!
//! - `state`: session state, messages and outbound events
//! - `update`: message dispatcher
//! - `handlers::capture`: countdown, cancel, retake and camera lifecycle
//! - `handlers::editing`: stickers, filter and export
//!
//! All methods take `&mut self`; background work (the countdown stream, the
//! export render) reports back through an internal channel drained by
//! [`BoothController::pump`] or [`BoothController::run`]. Each background
//! message is tagged with the session epoch, which is bumped whenever a
//! session is abandoned, so late results from an old session are dropped.

mod handlers;
mod state;
mod update;

pub use state::{BoothEvent, BoothState, Message, Phase};

use crate::backends::camera::{Frame, MediaSource, StreamHandle};
use crate::config::Config;
use crate::errors::{MediaError, RenderError};
use crate::pipelines::photo::{
    CaptureConfig, CaptureEngine, Decoration, FlattenedImage, Overlay, Renderer, StillImage,
};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Drives one booth visit
pub struct BoothController {
    source: Arc<dyn MediaSource>,
    stream: Option<Arc<StreamHandle>>,
    media_error: Option<MediaError>,
    state: BoothState,
    overlay: Overlay,
    engine: CaptureEngine,
    renderer: Arc<Renderer>,
    countdown_seconds: u32,
    /// Bumped whenever the current session is abandoned
    epoch: u64,
    countdown_task: Option<JoinHandle<()>>,
    /// Latest export request; older renders are discarded
    export_ticket: u64,
    internal_tx: UnboundedSender<Message>,
    internal_rx: UnboundedReceiver<Message>,
    events: UnboundedSender<BoothEvent>,
}

impl BoothController {
    /// Create a controller for `source`.
    ///
    /// The camera is not opened until [`BoothController::enter`] (or the
    /// first capture request).
    pub fn new(
        source: Arc<dyn MediaSource>,
        config: &Config,
    ) -> (Self, UnboundedReceiver<BoothEvent>) {
        Self::with_parts(
            source,
            CaptureEngine::new(CaptureConfig::from(config)),
            Renderer::new(Decoration::from(&config.decoration)),
            config.countdown_seconds,
        )
    }

    /// Create a controller from explicit components
    pub fn with_parts(
        source: Arc<dyn MediaSource>,
        engine: CaptureEngine,
        renderer: Renderer,
        countdown_seconds: u32,
    ) -> (Self, UnboundedReceiver<BoothEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        let controller = Self {
            source,
            stream: None,
            media_error: None,
            state: BoothState::Camera,
            overlay: Overlay::new(),
            engine,
            renderer: Arc::new(renderer),
            countdown_seconds,
            epoch: 0,
            countdown_task: None,
            export_ticket: 0,
            internal_tx,
            internal_rx,
            events,
        };

        (controller, events_rx)
    }

    /// Enter the booth: open the camera.
    ///
    /// On failure a [`BoothEvent::MediaError`] is emitted and the booth stays
    /// in `Camera` without a preview.
    pub fn enter(&mut self) -> bool {
        info!(source = %self.source.describe(), "Entering booth");
        self.open_stream().is_some()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &BoothState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn still(&self) -> Option<Arc<StillImage>> {
        self.state.still().cloned()
    }

    pub fn media_error(&self) -> Option<&MediaError> {
        self.media_error.as_ref()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Latest live frame for the preview
    pub fn preview_frame(&self) -> Option<Frame> {
        self.stream.as_ref().and_then(|s| s.current_frame())
    }

    /// Render the current session synchronously
    pub fn render_current(&self) -> Result<FlattenedImage, RenderError> {
        self.renderer.render(
            self.state.still().map(|s| s.as_ref()),
            self.overlay.stickers(),
            self.overlay.filter(),
        )
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Wait for one background message and apply it.
    ///
    /// Returns `false` once no more messages can arrive.
    pub async fn pump(&mut self) -> bool {
        match self.internal_rx.recv().await {
            Some(message) => {
                self.update(message);
                true
            }
            None => false,
        }
    }

    /// Apply every background message that is already queued
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.internal_rx.try_recv() {
            self.update(message);
            applied += 1;
        }
        applied
    }

    /// Process intents and background results until `Leave` or until the
    /// intent channel closes.
    pub async fn run(mut self, mut intents: UnboundedReceiver<Message>) {
        self.enter();

        loop {
            let message = tokio::select! {
                intent = intents.recv() => match intent {
                    Some(message) => message,
                    None => break,
                },
                Some(internal) = self.internal_rx.recv() => internal,
            };

            if matches!(message, Message::Leave) {
                break;
            }
            self.update(message);
        }

        self.leave();
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn emit(&self, event: BoothEvent) {
        // No receiver just means nobody is watching
        let _ = self.events.send(event);
    }

    fn set_state(&mut self, state: BoothState) {
        let old_phase = self.state.phase();
        debug!(from = self.state.name(), to = state.name(), "Booth state change");
        self.state = state;
        let new_phase = self.state.phase();
        if old_phase != new_phase {
            self.emit(BoothEvent::StateChanged(new_phase));
        }
    }

    /// Open (or reopen) the media source
    fn open_stream(&mut self) -> Option<Arc<StreamHandle>> {
        self.stream = None;
        match self.source.open() {
            Ok(handle) => {
                let handle = Arc::new(handle);
                self.stream = Some(Arc::clone(&handle));
                self.media_error = None;
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, source = %self.source.describe(), "Camera unavailable");
                self.media_error = Some(e.clone());
                self.emit(BoothEvent::MediaError(e));
                None
            }
        }
    }

    /// Current stream, reopening it if it was never opened or has died
    fn ensure_stream(&mut self) -> Option<Arc<StreamHandle>> {
        match &self.stream {
            Some(stream) if stream.is_live() => Some(Arc::clone(stream)),
            _ => self.open_stream(),
        }
    }

    /// Stop the countdown task and invalidate everything it may still send
    fn abandon_session(&mut self) {
        self.engine.cancel();
        if let Some(task) = self.countdown_task.take() {
            task.abort();
        }
        self.epoch += 1;
    }
}

impl Drop for BoothController {
    fn drop(&mut self) {
        if let Some(task) = self.countdown_task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for BoothController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoothController")
            .field("state", &self.state.name())
            .field("stickers", &self.overlay.len())
            .field("filter", &self.overlay.filter())
            .field("epoch", &self.epoch)
            .field("media_error", &self.media_error)
            .finish()
    }
}
