// SPDX-License-Identifier: GPL-3.0-only
// Shared types for media sources

//! Shared types for camera backends

use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Pixel layout of a raw frame as delivered by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 8-bit RGB
    Rgb,
    /// Packed 8-bit RGBA
    Rgba,
    /// Packed YUV 4:2:2 (Y0 U Y1 V)
    Yuyv,
    /// Motion-JPEG, one complete JPEG per frame
    Mjpeg,
}

impl PixelFormat {
    /// Bytes per pixel for packed formats (None for compressed)
    pub fn bytes_per_pixel(&self) -> Option<u32> {
        match self {
            PixelFormat::Rgb => Some(3),
            PixelFormat::Rgba => Some(4),
            PixelFormat::Yuyv => Some(2),
            PixelFormat::Mjpeg => None,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Rgb => write!(f, "RGB"),
            PixelFormat::Rgba => write!(f, "RGBA"),
            PixelFormat::Yuyv => write!(f, "YUYV"),
            PixelFormat::Mjpeg => write!(f, "MJPG"),
        }
    }
}

/// One raw sample from the live source
#[derive(Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Pixel data in `format`; shared so frames can be handed out without copying
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Row stride in bytes (0 for compressed formats)
    pub stride: u32,
    /// When the frame arrived from the driver
    pub captured_at: Instant,
}

impl Frame {
    /// Build a frame with a tightly packed stride
    pub fn packed(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        let stride = format.bytes_per_pixel().map(|bpp| width * bpp).unwrap_or(0);
        Self {
            width,
            height,
            data: Arc::from(data),
            format,
            stride,
            captured_at: Instant::now(),
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Latest-frame slot shared between a producer thread and readers
///
/// Writers replace the frame wholesale; readers clone the `Frame` (cheap, the
/// pixel data is reference counted) and never wait for a new one.
#[derive(Debug, Default)]
pub struct FrameSlot {
    latest: RwLock<Option<Frame>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot that already holds a frame
    pub fn with_frame(frame: Frame) -> Self {
        Self {
            latest: RwLock::new(Some(frame)),
        }
    }

    /// Replace the latest frame
    pub fn publish(&self, frame: Frame) {
        if let Ok(mut guard) = self.latest.write() {
            *guard = Some(frame);
        }
    }

    /// Most recent frame, if any has arrived
    pub fn latest(&self) -> Option<Frame> {
        self.latest.read().ok().and_then(|guard| guard.clone())
    }
}

/// Camera device found during enumeration
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Index of the `/dev/videoN` node
    pub index: usize,
    /// Device path (e.g., /dev/video0)
    pub path: String,
    /// Card name reported by the driver
    pub name: String,
    /// Driver name (e.g., uvcvideo)
    pub driver: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_stride() {
        let frame = Frame::packed(4, 2, PixelFormat::Rgba, vec![0; 32]);
        assert_eq!(frame.stride, 16);

        let frame = Frame::packed(4, 2, PixelFormat::Mjpeg, vec![0; 10]);
        assert_eq!(frame.stride, 0);
    }

    #[test]
    fn test_slot_returns_latest() {
        let slot = FrameSlot::new();
        assert!(slot.latest().is_none());

        slot.publish(Frame::packed(1, 1, PixelFormat::Rgb, vec![1, 2, 3]));
        slot.publish(Frame::packed(1, 1, PixelFormat::Rgb, vec![4, 5, 6]));

        let frame = slot.latest().unwrap();
        assert_eq!(&frame.data[..], &[4, 5, 6]);
    }
}
