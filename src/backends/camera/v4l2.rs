// SPDX-License-Identifier: GPL-3.0-only

//! Video4Linux2 webcam source
//!
//! The device is opened and its format negotiated synchronously so that
//! permission and availability errors surface from [`MediaSource::open`].
//! Frames are then read on a capture thread and published to a
//! [`FrameSlot`]; the booth only ever looks at the latest one.

use super::frame_loop::{FrameProducer, Step};
use super::{CameraDevice, Frame, FrameSlot, MediaSource, PixelFormat, StreamHandle};
use crate::config::CameraSettings;
use crate::constants;
use crate::errors::MediaError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// How long a single read may block before the stop signal is rechecked
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Webcam source backed by `/dev/videoN`
#[derive(Debug, Clone)]
pub struct V4l2Source {
    settings: CameraSettings,
}

impl V4l2Source {
    pub fn new(settings: CameraSettings) -> Self {
        Self { settings }
    }

    fn device_path(&self) -> String {
        format!("/dev/video{}", self.settings.device)
    }
}

/// Map a negotiated fourcc to a pixel format we can rasterize
fn pixel_format_for(fourcc: FourCC) -> Option<PixelFormat> {
    if fourcc == FourCC::new(b"YUYV") {
        Some(PixelFormat::Yuyv)
    } else if fourcc == FourCC::new(b"MJPG") {
        Some(PixelFormat::Mjpeg)
    } else if fourcc == FourCC::new(b"RGB3") {
        Some(PixelFormat::Rgb)
    } else {
        None
    }
}

/// Negotiate YUYV, falling back to MJPEG
fn negotiate_format(dev: &Device, width: u32, height: u32) -> Result<Format, MediaError> {
    let yuyv = Format::new(width, height, FourCC::new(b"YUYV"));
    match dev.set_format(&yuyv) {
        Ok(format) if pixel_format_for(format.fourcc).is_some() => Ok(format),
        _ => {
            let mjpg = Format::new(width, height, FourCC::new(b"MJPG"));
            dev.set_format(&mjpg).map_err(MediaError::from)
        }
    }
}

impl MediaSource for V4l2Source {
    fn open(&self) -> Result<StreamHandle, MediaError> {
        let path = self.device_path();
        info!(path = %path, "Opening V4L2 camera");

        let dev = Device::with_path(&path).map_err(MediaError::from)?;
        let format = negotiate_format(&dev, self.settings.width, self.settings.height)?;
        let pixel_format = pixel_format_for(format.fourcc).ok_or_else(|| {
            MediaError::Unavailable(format!("Unsupported pixel format {}", format.fourcc))
        })?;

        let width = format.width;
        let height = format.height;
        let stride = format.stride;

        info!(width, height, format = %pixel_format, "V4L2 format configured");

        let slot = Arc::new(FrameSlot::new());

        let producer = FrameProducer::spawn(
            "v4l2-capture",
            Arc::clone(&slot),
            move || {
                let mut stream = Stream::with_buffers(
                    &dev,
                    Type::VideoCapture,
                    constants::camera::BUFFER_COUNT,
                )
                .map_err(|e| {
                    MediaError::Unavailable(format!("Failed to create capture stream: {}", e))
                })?;
                stream.set_timeout(READ_TIMEOUT);
                Ok(stream)
            },
            move |stream| match stream.next() {
                Ok((buf, meta)) => {
                    let used = (meta.bytesused as usize).min(buf.len());
                    let data = if used > 0 { &buf[..used] } else { buf };
                    Step::Frame(Frame {
                        width,
                        height,
                        data: Arc::from(data),
                        format: pixel_format,
                        stride,
                        captured_at: Instant::now(),
                    })
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Step::Skip,
                Err(e) => {
                    warn!(error = %e, "Camera stream ended");
                    Step::End
                }
            },
        )?;

        Ok(StreamHandle::live(slot, producer))
    }

    fn describe(&self) -> String {
        format!(
            "Camera {} ({}x{})",
            self.device_path(),
            self.settings.width,
            self.settings.height
        )
    }
}

/// Probe `/dev/video*` for capture devices
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    let mut cameras = Vec::new();

    for index in 0..constants::camera::MAX_PROBED_DEVICES {
        let Ok(dev) = Device::new(index) else {
            continue;
        };
        let Ok(caps) = dev.query_caps() else {
            continue;
        };
        if !caps
            .capabilities
            .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        {
            debug!(index, card = %caps.card, "Skipping non-capture node");
            continue;
        }

        cameras.push(CameraDevice {
            index,
            path: format!("/dev/video{}", index),
            name: caps.card,
            driver: caps.driver,
        });
    }

    cameras
}
