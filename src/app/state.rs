// SPDX-License-Identifier: GPL-3.0-only

//! Booth state, messages and outbound events

use crate::errors::{CaptureError, MediaError};
use crate::pipelines::photo::{
    CaptureEvent, FilterType, FlattenedImage, Glyph, Offset, StickerId, StillImage,
};
use std::sync::Arc;

/// Booth state machine
///
/// ```text
/// Camera ──capture──▶ CountingDown ──zero──▶ Capturing ──frame──▶ Editing
///   ▲                      │                                        │
///   └──────cancel/retake───┘◀───────────────retake──────────────────┘
/// ```
#[derive(Debug, Clone, Default)]
pub enum BoothState {
    /// Live preview, nothing captured
    #[default]
    Camera,
    /// Countdown running
    CountingDown {
        /// Seconds before the shutter fires
        remaining: u32,
    },
    /// Shutter fired; flash and sampling in flight, can no longer be cancelled
    Capturing,
    /// Still captured and being decorated
    Editing {
        still: Arc<StillImage>,
    },
}

impl BoothState {
    /// Coarse phase reported to observers
    pub fn phase(&self) -> Phase {
        match self {
            BoothState::Camera => Phase::Idle,
            BoothState::CountingDown { .. } | BoothState::Capturing => Phase::CountingDown,
            BoothState::Editing { .. } => Phase::Captured,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoothState::Camera => "camera",
            BoothState::CountingDown { .. } => "counting-down",
            BoothState::Capturing => "capturing",
            BoothState::Editing { .. } => "editing",
        }
    }

    pub fn still(&self) -> Option<&Arc<StillImage>> {
        match self {
            BoothState::Editing { still } => Some(still),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, BoothState::Editing { .. })
    }
}

/// Stage of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    CountingDown,
    Captured,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "Ready"),
            Phase::CountingDown => write!(f, "Smile!"),
            Phase::Captured => write!(f, "Decorate"),
        }
    }
}

/// Messages handled by [`crate::app::BoothController::update`]
#[derive(Debug, Clone)]
pub enum Message {
    // ===== User Intents =====
    /// Start the countdown
    RequestCapture,
    /// Abort a running countdown
    CancelCapture,
    /// Place a sticker at the image center
    AddSticker(Glyph),
    /// Remove a sticker by id
    RemoveSticker(StickerId),
    /// Reposition a sticker
    MoveSticker(StickerId, Offset),
    /// Replace the active filter
    SetFilter(FilterType),
    /// Discard the still (or abort the countdown) and return to the camera
    RequestRetake,
    /// Render the decorated still
    RequestExport,
    /// Try to open the camera again after a media error
    RetryCamera,
    /// Leave the booth
    Leave,

    // ===== Background Results =====
    /// Event from the countdown started in `epoch`
    Capture { epoch: u64, event: CaptureEvent },
    /// Render finished for export `ticket` of `epoch`
    ExportFinished {
        epoch: u64,
        ticket: u64,
        result: Result<Arc<FlattenedImage>, String>,
    },
}

/// Events emitted to the presentation layer
#[derive(Debug, Clone)]
pub enum BoothEvent {
    /// Seconds left in the countdown
    CountdownTick(u32),
    /// Shutter fired; show the white flash
    Flash,
    /// A still was captured and editing began
    Captured(Arc<StillImage>),
    /// The camera could not be opened
    MediaError(MediaError),
    /// A committed capture produced no still
    CaptureFailed(CaptureError),
    /// Export render finished
    ExportReady(Arc<FlattenedImage>),
    /// Export render failed
    ExportFailed(String),
    /// The session phase changed
    StateChanged(Phase),
}
