// SPDX-License-Identifier: GPL-3.0-only

//! Media source abstraction
//!
//! A media source wraps access to a live camera feed. Opening it yields a
//! [`StreamHandle`] whose latest frame can be read at any time without
//! blocking; frames keep arriving from the driver outside of our control.
//!
//! ```text
//! ┌──────────────┐   publish    ┌───────────┐  current_frame  ┌─────────────┐
//! │ driver/thread│ ───────────▶ │ FrameSlot │ ──────────────▶ │ photo booth │
//! └──────────────┘              └───────────┘                 └─────────────┘
//! ```
//!
//! Implementations:
//! - [`v4l2::V4l2Source`]: webcam through Video4Linux2
//! - [`file_source::FileSource`]: a still image file acting as a frozen feed
//! - [`pattern::PatternSource`]: synthetic test pattern

pub mod file_source;
pub mod format_converters;
pub mod frame_loop;
pub mod pattern;
pub mod types;
pub mod v4l2;

pub use types::*;

use crate::config::CameraSettings;
use crate::errors::MediaError;
use frame_loop::FrameProducer;
use std::path::PathBuf;
use std::sync::Arc;

/// Access to a live visual feed
pub trait MediaSource: Send + Sync {
    /// Open the feed.
    ///
    /// Fails with [`MediaError::PermissionDenied`] or
    /// [`MediaError::Unavailable`] when the hardware cannot be accessed.
    fn open(&self) -> Result<StreamHandle, MediaError>;

    /// Human readable description for logs and the status bar
    fn describe(&self) -> String;
}

/// An open feed
///
/// Dropping the handle stops the producer thread, if any.
pub struct StreamHandle {
    slot: Arc<FrameSlot>,
    producer: Option<FrameProducer>,
}

impl StreamHandle {
    /// Handle fed by a producer thread writing into `slot`
    pub fn live(slot: Arc<FrameSlot>, producer: FrameProducer) -> Self {
        Self {
            slot,
            producer: Some(producer),
        }
    }

    /// Handle that always returns the same frame
    pub fn still(frame: Frame) -> Self {
        Self {
            slot: Arc::new(FrameSlot::with_frame(frame)),
            producer: None,
        }
    }

    /// Most recent frame; never blocks
    pub fn current_frame(&self) -> Option<Frame> {
        self.slot.latest()
    }

    /// Whether frames can still arrive
    pub fn is_live(&self) -> bool {
        match &self.producer {
            Some(producer) => producer.is_running(),
            None => true,
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("threaded", &self.producer.is_some())
            .finish()
    }
}

/// Which source the booth should use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// V4L2 webcam
    Camera(CameraSettings),
    /// Still image file
    File(PathBuf),
    /// Synthetic pattern at the given size
    Pattern { width: u32, height: u32 },
}

/// Build a media source for `kind`
pub fn create_source(kind: &SourceKind) -> Arc<dyn MediaSource> {
    match kind {
        SourceKind::Camera(settings) => Arc::new(v4l2::V4l2Source::new(settings.clone())),
        SourceKind::File(path) => Arc::new(file_source::FileSource::new(path.clone())),
        SourceKind::Pattern { width, height } => {
            Arc::new(pattern::PatternSource::new(*width, *height))
        }
    }
}
