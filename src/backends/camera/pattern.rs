// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic test pattern source
//!
//! Produces a deterministic frame (pink-to-lilac gradient with color bars
//! along the bottom) so the booth can be driven without a camera.

use super::{Frame, MediaSource, PixelFormat, StreamHandle};
use crate::errors::MediaError;
use tracing::debug;

const BARS: [[u8; 3]; 6] = [
    [255, 255, 255],
    [255, 214, 0],
    [0, 200, 220],
    [0, 190, 70],
    [230, 40, 120],
    [40, 60, 200],
];

/// Test pattern source
#[derive(Debug, Clone)]
pub struct PatternSource {
    width: u32,
    height: u32,
}

impl PatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Render the pattern frame
    pub fn frame(&self) -> Frame {
        let (w, h) = (self.width, self.height);
        let bar_top = h - h / 6;
        let mut data = Vec::with_capacity((w * h * 3) as usize);

        for y in 0..h {
            for x in 0..w {
                let pixel = if y >= bar_top {
                    BARS[(x * BARS.len() as u32 / w) as usize]
                } else {
                    let t = x as f32 / w as f32;
                    let s = y as f32 / h as f32;
                    [
                        (255.0 - 40.0 * s) as u8,
                        (182.0 - 60.0 * t) as u8,
                        (193.0 + 50.0 * t) as u8,
                    ]
                };
                data.extend_from_slice(&pixel);
            }
        }

        Frame::packed(w, h, PixelFormat::Rgb, data)
    }
}

impl MediaSource for PatternSource {
    fn open(&self) -> Result<StreamHandle, MediaError> {
        debug!(width = self.width, height = self.height, "Opening test pattern");
        Ok(StreamHandle::still(self.frame()))
    }

    fn describe(&self) -> String {
        format!("Test pattern {}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_deterministic() {
        let source = PatternSource::new(32, 24);
        assert_eq!(&source.frame().data[..], &source.frame().data[..]);
    }

    #[test]
    fn test_pattern_size() {
        let frame = PatternSource::new(30, 12).frame();
        assert_eq!(frame.data.len(), 30 * 12 * 3);
        assert_eq!(frame.format, PixelFormat::Rgb);
        // Bottom-left pixel is the first (white) bar
        let last_row = (11 * 30 * 3) as usize;
        assert_eq!(&frame.data[last_row..last_row + 3], &[255, 255, 255]);
    }
}
