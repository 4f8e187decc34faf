// SPDX-License-Identifier: GPL-3.0-only

//! Composition of still, filter, stickers and frame into one flat image
//!
//! Rendering is a pure function of its inputs: the still is never modified
//! and the same inputs always produce the same pixels.

use super::capture::StillImage;
use super::decoration::Decoration;
use super::filters::{FilterType, apply_filter};
use super::overlay::StickerAnnotation;
use super::stickers::{Glyph, sprite, sprite_size};
use crate::errors::{ExportError, RenderError};
use image::{ImageFormat, RgbImage, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::debug;

/// Final composited image with no layers and no alpha
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedImage {
    image: RgbImage,
}

impl FlattenedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_rgb(self) -> RgbImage {
        self.image
    }

    /// Encode as PNG bytes
    pub fn encode_png(&self) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Composites the editing session into a [`FlattenedImage`]
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    decoration: Decoration,
}

impl Renderer {
    pub fn new(decoration: Decoration) -> Self {
        Self { decoration }
    }

    /// Render the still with `filter`, then `stickers`, then the frame.
    ///
    /// Stickers are drawn in ascending id order so later stickers cover
    /// earlier ones. Positions are offsets of the sticker center from the
    /// image center; stickers partially or fully outside are clipped.
    pub fn render(
        &self,
        still: Option<&StillImage>,
        stickers: &[StickerAnnotation],
        filter: FilterType,
    ) -> Result<FlattenedImage, RenderError> {
        let still = still.ok_or(RenderError::EmptySource)?;
        let (width, height) = still.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptySource);
        }

        let mut canvas = still.clone();
        apply_filter(&mut canvas, filter);

        let mut ordered: Vec<&StickerAnnotation> = stickers.iter().collect();
        ordered.sort_by_key(|s| s.id);

        let size = sprite_size(width, height);
        let mut sprites: HashMap<Glyph, RgbaImage> = HashMap::new();
        for sticker in ordered {
            let sprite = sprites
                .entry(sticker.glyph)
                .or_insert_with(|| sprite(sticker.glyph, size));
            let x = (width / 2) as i64 + sticker.position.dx as i64 - (size / 2) as i64;
            let y = (height / 2) as i64 + sticker.position.dy as i64 - (size / 2) as i64;
            image::imageops::overlay(&mut canvas, sprite, x, y);
        }

        self.decoration.apply(&mut canvas);

        debug!(
            width,
            height,
            stickers = stickers.len(),
            filter = filter.display_name(),
            "Rendered still"
        );

        Ok(FlattenedImage {
            image: flatten(&canvas),
        })
    }
}

/// Composite over white and drop alpha
fn flatten(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let a = p[3] as u32;
        let over = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        image::Rgb([over(p[0]), over(p[1]), over(p[2])])
    })
}
