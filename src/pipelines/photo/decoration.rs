// SPDX-License-Identifier: GPL-3.0-only

//! Booth frame drawn over every exported photo
//!
//! The frame is a few floating stickers at fixed spots, an inset white
//! border, a date stamp at the top and a caption at the bottom. Text is drawn
//! with a small built-in 5x7 bitmap font scaled to the image size.

use super::stickers::{Glyph, rotated_sprite, sprite};
use crate::config::{DecorationSettings, FixedSticker};
use image::RgbaImage;

const STAMP_COLOR: [u8; 3] = [230, 60, 120];
const CAPTION_COLOR: [u8; 3] = [255, 255, 255];
const SHADOW_COLOR: [u8; 3] = [60, 10, 30];
const WHITE: [u8; 3] = [255, 255, 255];

/// Frame settings resolved for rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoration {
    pub border: bool,
    pub date_stamp: Option<String>,
    pub stamp_sticker: Option<Glyph>,
    pub caption: Option<String>,
    pub stickers: Vec<FixedSticker>,
}

/// Date stamp value that is replaced by the current date
pub const TODAY: &str = "today";

impl From<&DecorationSettings> for Decoration {
    fn from(settings: &DecorationSettings) -> Self {
        let non_empty = |s: &Option<String>| s.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        let date_stamp = non_empty(&settings.date_stamp).map(|stamp| {
            if stamp.trim().eq_ignore_ascii_case(TODAY) {
                format_stamp(chrono::Local::now().date_naive())
            } else {
                stamp
            }
        });
        let stickers = settings
            .stickers
            .iter()
            .filter(|s| s.size.is_finite() && s.size > 0.0 && s.x.is_finite() && s.y.is_finite())
            .cloned()
            .collect();
        Self {
            border: settings.border,
            date_stamp,
            stamp_sticker: settings.stamp_sticker,
            caption: non_empty(&settings.caption),
            stickers,
        }
    }
}

/// `FEB 14, 2026` style stamp
pub fn format_stamp(date: chrono::NaiveDate) -> String {
    date.format("%b %d, %Y").to_string().to_uppercase()
}

impl Decoration {
    /// No frame at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.border
            && self.date_stamp.is_none()
            && self.caption.is_none()
            && self.stickers.is_empty()
    }

    /// Draw the frame onto `image`
    pub fn apply(&self, image: &mut RgbaImage) {
        let (width, height) = image.dimensions();
        let short = width.min(height);
        let margin = (short / 30).max(2) as i32;

        for placement in &self.stickers {
            draw_fixed_sticker(image, placement);
        }

        if self.border {
            let thickness = (short / 80).max(2) as i32;
            draw_frame(image, margin, thickness);
        }

        let base_scale = (short / 120).max(1);

        if let Some(stamp) = &self.date_stamp {
            // Two spare cells leave room for the trailing sprite
            let fitted = match self.stamp_sticker {
                Some(_) => format!("{}  ", stamp),
                None => stamp.clone(),
            };
            let scale = fit_scale(&fitted, base_scale, width, margin as u32 * 3);
            let text_w = text_width(stamp, scale) as i32;
            let text_h = (7 * scale) as i32;
            let gap = scale as i32 * 2;
            let icon_w = if self.stamp_sticker.is_some() { gap + text_h } else { 0 };
            let x = (width as i32 - text_w - icon_w) / 2;
            let y = margin * 2;
            let pad = scale as i32 * 2;
            fill_rect(
                image,
                x - pad,
                y - pad,
                text_w + icon_w + pad * 2,
                text_h + pad * 2,
                WHITE,
                0.85,
            );
            draw_text(image, x, y, stamp, scale, STAMP_COLOR);
            if let Some(glyph) = self.stamp_sticker {
                let icon = sprite(glyph, text_h as u32);
                image::imageops::overlay(image, &icon, (x + text_w + gap) as i64, y as i64);
            }
        }

        if let Some(caption) = &self.caption {
            let scale = fit_scale(caption, base_scale + 1, width, margin as u32 * 3);
            let text_w = text_width(caption, scale) as i32;
            let text_h = (7 * scale) as i32;
            let x = (width as i32 - text_w) / 2;
            let y = height as i32 - margin * 2 - text_h;
            let shadow = scale.div_ceil(2) as i32;
            draw_text(image, x + shadow, y + shadow, caption, scale, SHADOW_COLOR);
            draw_text(image, x, y, caption, scale, CAPTION_COLOR);
        }
    }
}

/// Sprite centered at the placement's fractional position, clipped at the edges
fn draw_fixed_sticker(image: &mut RgbaImage, placement: &FixedSticker) {
    let (width, height) = image.dimensions();
    let size = (width.min(height) as f32 * placement.size).round().max(1.0) as u32;
    let icon = rotated_sprite(placement.glyph, size, placement.rotation);
    let cx = (width as f32 * placement.x).round() as i64;
    let cy = (height as f32 * placement.y).round() as i64;
    let half = (size / 2) as i64;
    image::imageops::overlay(image, &icon, cx - half, cy - half);
}

/// Largest scale not above `preferred` at which `text` fits in `width - margin*2`
fn fit_scale(text: &str, preferred: u32, width: u32, margin: u32) -> u32 {
    let available = width.saturating_sub(margin * 2);
    let mut scale = preferred.max(1);
    while scale > 1 && text_width(text, scale) > available {
        scale -= 1;
    }
    scale
}

/// Rendered width of `text` in pixels (5 px glyph + 1 px spacing per char)
pub fn text_width(text: &str, scale: u32) -> u32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return 0;
    }
    (chars * 6 - 1) * scale
}

#[inline]
fn blend_pixel(image: &mut RgbaImage, x: i32, y: i32, color: [u8; 3], alpha: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= image.width() || y >= image.height() {
        return;
    }
    let pixel = image.get_pixel_mut(x, y);
    for c in 0..3 {
        let v = pixel[c] as f32 * (1.0 - alpha) + color[c] as f32 * alpha;
        pixel[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    pixel[3] = pixel[3].max((alpha * 255.0) as u8);
}

fn fill_rect(image: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: [u8; 3], alpha: f32) {
    for py in y..y + h {
        for px in x..x + w {
            blend_pixel(image, px, py, color, alpha);
        }
    }
}

fn draw_frame(image: &mut RgbaImage, inset: i32, thickness: i32) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    let inner_w = w - inset * 2;
    let inner_h = h - inset * 2;
    if inner_w <= thickness * 2 || inner_h <= thickness * 2 {
        return;
    }
    // top, bottom, left, right
    fill_rect(image, inset, inset, inner_w, thickness, WHITE, 0.9);
    fill_rect(image, inset, h - inset - thickness, inner_w, thickness, WHITE, 0.9);
    fill_rect(image, inset, inset + thickness, thickness, inner_h - thickness * 2, WHITE, 0.9);
    fill_rect(
        image,
        w - inset - thickness,
        inset + thickness,
        thickness,
        inner_h - thickness * 2,
        WHITE,
        0.9,
    );
}

/// Draw `text` with its top-left corner at (x, y)
pub fn draw_text(image: &mut RgbaImage, mut x: i32, y: i32, text: &str, scale: u32, color: [u8; 3]) {
    let s = scale as i32;
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch.to_ascii_uppercase()) {
            for (ry, bits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if bits & (1 << (4 - rx)) != 0 {
                        fill_rect(image, x + rx * s, y + ry as i32 * s, s, s, color, 1.0);
                    }
                }
            }
        }
        x += 6 * s;
    }
}

/// 5x7 glyph rows; low 5 bits are pixels, bit 4 is leftmost
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g {
        ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr, $g:expr) => {
            Some([$a, $b, $c, $d, $e, $f, $g])
        };
    }

    match ch {
        '0' => g!(0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110),
        '1' => g!(0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        '2' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111),
        '3' => g!(0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110),
        '4' => g!(0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010),
        '5' => g!(0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110),
        '6' => g!(0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110),
        '7' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000),
        '8' => g!(0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110),
        '9' => g!(0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100),

        'A' => g!(0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'B' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110),
        'C' => g!(0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110),
        'D' => g!(0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100),
        'E' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111),
        'F' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000),
        'G' => g!(0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111),
        'H' => g!(0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'I' => g!(0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        'J' => g!(0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100),
        'K' => g!(0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001),
        'L' => g!(0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111),
        'M' => g!(0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001),
        'N' => g!(0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001),
        'O' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'P' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000),
        'Q' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101),
        'R' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001),
        'S' => g!(0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110),
        'T' => g!(0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        'U' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'V' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100),
        'W' => g!(0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010),
        'X' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001),
        'Y' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100),
        'Z' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111),

        ' ' => g!(0, 0, 0, 0, 0, 0, 0),
        '.' => g!(0, 0, 0, 0, 0, 0b00100, 0),
        ',' => g!(0, 0, 0, 0, 0b00110, 0b00100, 0b01000),
        '!' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0, 0b00100),
        '?' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100),
        ':' => g!(0, 0b00100, 0, 0, 0b00100, 0, 0),
        '\'' => g!(0b00100, 0b00100, 0b01000, 0, 0, 0, 0),
        '-' => g!(0, 0, 0, 0b11111, 0, 0, 0),
        '/' => g!(0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000),
        '&' => g!(0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101),
        '♥' => g!(0, 0b01010, 0b11111, 0b11111, 0b01110, 0b00100, 0),

        _ => None,
    }
}
