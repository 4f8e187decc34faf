// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles the countdown, cancellation, retakes and the camera lifecycle.

use crate::app::BoothController;
use crate::app::state::{BoothEvent, BoothState, Message};
use crate::pipelines::photo::CaptureEvent;
use futures::StreamExt;
use tracing::{debug, info, warn};

impl BoothController {
    // =========================================================================
    // Capture Operations Handlers
    // =========================================================================

    /// Start the countdown.
    ///
    /// Only valid in `Camera`. If the camera is not open (or failed earlier)
    /// the open is retried first; a failure emits `MediaError` and leaves the
    /// booth in `Camera`. Must be called from within a Tokio runtime.
    pub fn request_capture(&mut self) {
        if !matches!(self.state, BoothState::Camera) {
            debug!(state = self.state.name(), "Capture request ignored");
            return;
        }

        let Some(stream) = self.ensure_stream() else {
            return;
        };

        let mut countdown = match self.engine.begin(stream, self.countdown_seconds) {
            Ok(countdown) => countdown,
            Err(e) => {
                warn!(error = %e, "Could not start capture");
                return;
            }
        };

        let epoch = self.epoch;
        let tx = self.internal_tx.clone();
        self.countdown_task = Some(tokio::spawn(async move {
            while let Some(event) = countdown.next().await {
                if tx.send(Message::Capture { epoch, event }).is_err() {
                    break;
                }
            }
        }));

        info!(seconds = self.countdown_seconds, "Countdown started");
        self.set_state(BoothState::CountingDown {
            remaining: self.countdown_seconds,
        });
    }

    /// Abort a running countdown.
    ///
    /// Ignored once the shutter has fired.
    pub fn cancel_capture(&mut self) {
        match self.state {
            BoothState::CountingDown { remaining } => {
                info!(remaining, "Countdown cancelled");
                self.abandon_session();
                self.set_state(BoothState::Camera);
            }
            BoothState::Capturing => {
                debug!("Cancel ignored: capture already committed");
            }
            _ => {
                debug!(state = self.state.name(), "Cancel ignored");
            }
        }
    }

    /// Return to the camera.
    ///
    /// From `Editing` the still, stickers and filter are discarded. During
    /// the countdown this acts like [`BoothController::cancel_capture`].
    pub fn request_retake(&mut self) {
        match self.state {
            BoothState::Editing { .. } => {
                info!(stickers = self.overlay.len(), "Retake: discarding still");
                self.epoch += 1;
                self.overlay.clear();
                self.set_state(BoothState::Camera);
            }
            BoothState::CountingDown { .. } => self.cancel_capture(),
            BoothState::Capturing => {
                debug!("Retake ignored: capture already committed");
            }
            BoothState::Camera => {
                debug!("Retake ignored: nothing captured");
            }
        }
    }

    /// Reopen the camera after a media error.
    ///
    /// Only does work in `Camera`; returns whether a stream is open afterwards.
    pub fn retry_camera(&mut self) -> bool {
        if !matches!(self.state, BoothState::Camera) {
            debug!(state = self.state.name(), "Camera retry ignored");
            return self.stream.is_some();
        }
        info!("Retrying camera");
        self.open_stream().is_some()
    }

    /// Leave the booth: stop everything and drop the session
    pub fn leave(&mut self) {
        info!("Leaving booth");
        self.abandon_session();
        self.overlay.clear();
        self.stream = None;
        self.set_state(BoothState::Camera);
    }

    /// Apply an event from the countdown stream of `epoch`
    pub(crate) fn handle_capture_event(&mut self, epoch: u64, event: CaptureEvent) {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "Discarding stale capture event");
            return;
        }

        match event {
            CaptureEvent::Tick(remaining) => {
                if let BoothState::CountingDown { .. } = self.state {
                    self.set_state(BoothState::CountingDown { remaining });
                    self.emit(BoothEvent::CountdownTick(remaining));
                }
            }
            CaptureEvent::Flash => {
                if let BoothState::CountingDown { .. } = self.state {
                    self.set_state(BoothState::Capturing);
                    self.emit(BoothEvent::Flash);
                }
            }
            CaptureEvent::Frame(still) => {
                if let BoothState::Capturing = self.state {
                    self.countdown_task = None;
                    self.overlay.clear();
                    info!(
                        width = still.width(),
                        height = still.height(),
                        "Captured still, editing"
                    );
                    self.set_state(BoothState::Editing {
                        still: std::sync::Arc::clone(&still),
                    });
                    self.emit(BoothEvent::Captured(still));
                }
            }
            CaptureEvent::Failed(e) => {
                if matches!(
                    self.state,
                    BoothState::Capturing | BoothState::CountingDown { .. }
                ) {
                    warn!(error = %e, "Capture failed, back to camera");
                    self.countdown_task = None;
                    self.set_state(BoothState::Camera);
                    self.emit(BoothEvent::CaptureFailed(e));
                }
            }
        }
    }
}
