// SPDX-License-Identifier: GPL-3.0-only

//! Countdown-driven still capture
//!
//! A capture is a short timed sequence produced as a stream of
//! [`CaptureEvent`]s:
//!
//! ```text
//! Tick(3) ─1s─▶ Tick(2) ─1s─▶ Tick(1) ─1s─▶ Flash ─settle─▶ Frame
//! ```
//!
//! The frame is sampled from the live feed only after the flash has had
//! time to clear, so the white overlay never ends up in the picture. Only
//! one capture can be in flight per engine; a second [`CaptureEngine::begin`]
//! is rejected until the first one finishes, is cancelled, or is dropped.

use crate::backends::camera::format_converters::{repack_rgba, rgb_to_rgba, yuyv_to_rgba};
use crate::backends::camera::{Frame, PixelFormat, StreamHandle};
use crate::config::Config;
use crate::constants::timing;
use crate::errors::CaptureError;
use async_stream::stream;
use futures::Stream;
use image::{ImageFormat, RgbaImage};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// A captured still, owned by the editing session
pub type StillImage = RgbaImage;

/// Events emitted while a capture runs
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// Seconds left before the shutter fires
    Tick(u32),
    /// The shutter fired; from here on the capture is committed
    Flash,
    /// The sampled still
    Frame(Arc<StillImage>),
    /// The capture ended without a still
    Failed(CaptureError),
}

/// Stream of capture events
pub type CountdownStream = Pin<Box<dyn Stream<Item = CaptureEvent> + Send>>;

/// Capture timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    pub tick_interval: Duration,
    pub flash_settle: Duration,
    /// Flip the still horizontally so it matches the selfie preview
    pub mirror: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tick_interval: timing::TICK_INTERVAL,
            flash_settle: Duration::from_millis(timing::FLASH_SETTLE_MS),
            mirror: true,
        }
    }
}

impl From<&Config> for CaptureConfig {
    fn from(config: &Config) -> Self {
        Self {
            tick_interval: timing::TICK_INTERVAL,
            flash_settle: Duration::from_millis(config.flash_settle_ms),
            mirror: config.mirror_capture,
        }
    }
}

/// Releases the engine when the countdown stream finishes or is dropped
struct ActiveGuard {
    active: Arc<AtomicU64>,
    id: u64,
}

impl ActiveGuard {
    fn is_current(&self) -> bool {
        self.active.load(Ordering::Acquire) == self.id
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let _ = self
            .active
            .compare_exchange(self.id, 0, Ordering::AcqRel, Ordering::Acquire);
    }
}

/// Runs countdowns and samples the live feed
#[derive(Debug)]
pub struct CaptureEngine {
    config: CaptureConfig,
    /// Id of the capture in flight, 0 when idle
    active: Arc<AtomicU64>,
    next_id: AtomicU64,
}

impl CaptureEngine {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            active: Arc::new(AtomicU64::new(0)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether a capture is currently in flight
    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::Acquire) != 0
    }

    /// Start a countdown of `delay_seconds` ticks against `stream`.
    ///
    /// Ticks are emitted for `delay_seconds, ..., 1`, one tick interval
    /// apart. A zero delay flashes immediately.
    pub fn begin(
        &self,
        stream: Arc<StreamHandle>,
        delay_seconds: u32,
    ) -> Result<CountdownStream, CaptureError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if self
            .active
            .compare_exchange(0, id, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Capture requested while another is in progress");
            return Err(CaptureError::AlreadyInProgress);
        }

        info!(id, delay_seconds, "Starting capture countdown");

        let guard = ActiveGuard {
            active: Arc::clone(&self.active),
            id,
        };
        let config = self.config;

        let events = stream! {
            let guard = guard;

            for remaining in (1..=delay_seconds).rev() {
                if !guard.is_current() {
                    debug!(id, "Countdown cancelled");
                    return;
                }
                yield CaptureEvent::Tick(remaining);
                tokio::time::sleep(config.tick_interval).await;
            }

            if !guard.is_current() {
                debug!(id, "Countdown cancelled before flash");
                return;
            }

            yield CaptureEvent::Flash;
            tokio::time::sleep(config.flash_settle).await;

            let outcome = match stream.current_frame() {
                Some(frame) => {
                    let mirror = config.mirror;
                    match tokio::task::spawn_blocking(move || rasterize(&frame, mirror)).await {
                        Ok(result) => result,
                        Err(e) => Err(CaptureError::Decode(format!("rasterize task failed: {}", e))),
                    }
                }
                None => Err(CaptureError::NoFrameAvailable),
            };

            drop(guard);

            match outcome {
                Ok(still) => {
                    info!(id, width = still.width(), height = still.height(), "Still captured");
                    yield CaptureEvent::Frame(Arc::new(still));
                }
                Err(e) => {
                    warn!(id, error = %e, "Capture failed");
                    yield CaptureEvent::Failed(e);
                }
            }
        };

        Ok(Box::pin(events))
    }

    /// Abort the countdown in flight.
    ///
    /// A stream that already emitted [`CaptureEvent::Flash`] still delivers
    /// its frame; callers that want to discard it drop the stream.
    pub fn cancel(&self) {
        let previous = self.active.swap(0, Ordering::AcqRel);
        if previous != 0 {
            debug!(id = previous, "Capture cancelled");
        }
    }
}

impl Default for CaptureEngine {
    fn default() -> Self {
        Self::new(CaptureConfig::default())
    }
}

/// Convert a raw frame to an owned RGBA still
pub fn rasterize(frame: &Frame, mirror: bool) -> Result<StillImage, CaptureError> {
    let (width, height) = (frame.width, frame.height);

    let image = match frame.format {
        PixelFormat::Mjpeg => image::load_from_memory_with_format(&frame.data, ImageFormat::Jpeg)
            .map_err(|e| CaptureError::Decode(e.to_string()))?
            .to_rgba8(),
        PixelFormat::Rgba => from_packed(
            frame.format,
            width,
            height,
            repack_rgba(&frame.data, width, height, frame.stride),
        )?,
        PixelFormat::Rgb => from_packed(
            frame.format,
            width,
            height,
            rgb_to_rgba(&frame.data, width, height, frame.stride),
        )?,
        PixelFormat::Yuyv => from_packed(
            frame.format,
            width,
            height,
            yuyv_to_rgba(&frame.data, width, height, frame.stride),
        )?,
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(CaptureError::Decode("empty frame".to_string()));
    }

    Ok(if mirror {
        image::imageops::flip_horizontal(&image)
    } else {
        image
    })
}

fn from_packed(
    format: PixelFormat,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
) -> Result<StillImage, CaptureError> {
    RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        CaptureError::Decode(format!(
            "{} frame too short for {}x{}",
            format, width, height
        ))
    })
}
