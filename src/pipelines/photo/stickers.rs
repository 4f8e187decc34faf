// SPDX-License-Identifier: GPL-3.0-only

//! Sticker glyphs and their raster sprites
//!
//! Each glyph is drawn procedurally from a handful of implicit shapes on a
//! `[-1, 1]²` canvas (y pointing down) and supersampled for smooth edges, so
//! sprites look the same at any size and need no font or asset files.

use crate::constants::stickers::{MIN_SIZE, SIZE_DIVISOR, SUPERSAMPLE};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed sticker palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Glyph {
    Heart,
    SparklingHeart,
    Bear,
    Smitten,
    Sparkles,
    Rose,
    Ring,
}

impl Glyph {
    /// All glyphs in palette order
    pub const ALL: [Glyph; 7] = [
        Glyph::Heart,
        Glyph::SparklingHeart,
        Glyph::Bear,
        Glyph::Smitten,
        Glyph::Sparkles,
        Glyph::Rose,
        Glyph::Ring,
    ];

    pub fn emoji(&self) -> &'static str {
        match self {
            Glyph::Heart => "❤️",
            Glyph::SparklingHeart => "💖",
            Glyph::Bear => "🐻",
            Glyph::Smitten => "🥰",
            Glyph::Sparkles => "✨",
            Glyph::Rose => "🌹",
            Glyph::Ring => "💍",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Glyph::Heart => "heart",
            Glyph::SparklingHeart => "sparkling-heart",
            Glyph::Bear => "bear",
            Glyph::Smitten => "smitten",
            Glyph::Sparkles => "sparkles",
            Glyph::Rose => "rose",
            Glyph::Ring => "ring",
        }
    }
}

impl std::fmt::Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.emoji())
    }
}

impl FromStr for Glyph {
    type Err = String;

    /// Accepts the emoji (with or without variation selector) or the name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare: String = trimmed.chars().filter(|c| *c != '\u{FE0F}').collect();
        let lower = trimmed.to_lowercase();

        Glyph::ALL
            .into_iter()
            .find(|g| {
                let emoji: String = g.emoji().chars().filter(|c| *c != '\u{FE0F}').collect();
                emoji == bare || g.name() == lower
            })
            .ok_or_else(|| format!("unknown sticker '{}'", trimmed))
    }
}

/// Sprite edge length for a still of the given size
pub fn sprite_size(width: u32, height: u32) -> u32 {
    (width.min(height) / SIZE_DIVISOR).max(MIN_SIZE)
}

/// Rasterize `glyph` into a square RGBA sprite
pub fn sprite(glyph: Glyph, size: u32) -> RgbaImage {
    rotated_sprite(glyph, size, 0.0)
}

/// Like [`sprite`], turned clockwise by `degrees` around its center.
///
/// Parts rotated past the square are cut off.
pub fn rotated_sprite(glyph: Glyph, size: u32, degrees: f32) -> RgbaImage {
    let size = size.max(1);
    let (sin, cos) = (-degrees.to_radians()).sin_cos();
    let samples = SUPERSAMPLE * SUPERSAMPLE;
    let mut image = RgbaImage::new(size, size);

    for (px, py, pixel) in image.enumerate_pixels_mut() {
        let mut covered = 0u32;
        let mut acc = [0u32; 3];

        for sy in 0..SUPERSAMPLE {
            for sx in 0..SUPERSAMPLE {
                let x = ((px * SUPERSAMPLE + sx) as f32 + 0.5) / (size * SUPERSAMPLE) as f32;
                let y = ((py * SUPERSAMPLE + sy) as f32 + 0.5) / (size * SUPERSAMPLE) as f32;
                let (x, y) = (x * 2.0 - 1.0, y * 2.0 - 1.0);
                let (x, y) = (x * cos - y * sin, x * sin + y * cos);
                if let Some(color) = shade(glyph, x, y) {
                    covered += 1;
                    for (a, c) in acc.iter_mut().zip(color) {
                        *a += c as u32;
                    }
                }
            }
        }

        if covered > 0 {
            *pixel = Rgba([
                (acc[0] / covered) as u8,
                (acc[1] / covered) as u8,
                (acc[2] / covered) as u8,
                (covered * 255 / samples) as u8,
            ]);
        }
    }

    image
}

const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [30, 20, 20];

fn shade(glyph: Glyph, x: f32, y: f32) -> Option<[u8; 3]> {
    match glyph {
        Glyph::Heart => {
            if circle(x, y, -0.38, -0.35, 0.14) {
                Some([255, 140, 160])
            } else if heart(x, y, 0.0, 0.0, 0.95) {
                Some([225, 25, 60])
            } else {
                None
            }
        }

        Glyph::SparklingHeart => {
            if star(x, y, 0.68, -0.68, 0.3) || star(x, y, -0.72, 0.62, 0.22) {
                Some([255, 240, 160])
            } else if star(x, y, 0.2, -0.05, 0.18) {
                Some(WHITE)
            } else if heart(x, y, 0.0, 0.05, 0.85) {
                Some([255, 95, 175])
            } else {
                None
            }
        }

        Glyph::Bear => {
            let fur = [150, 95, 55];
            let light = [215, 175, 130];
            if circle(x, y, -0.28, -0.05, 0.09)
                || circle(x, y, 0.28, -0.05, 0.09)
                || circle(x, y, 0.0, 0.3, 0.1)
            {
                Some(BLACK)
            } else if circle(x, y, 0.0, 0.35, 0.28) {
                Some(light)
            } else if circle(x, y, 0.0, 0.12, 0.72) {
                Some(fur)
            } else if circle(x, y, -0.58, -0.58, 0.14) || circle(x, y, 0.58, -0.58, 0.14) {
                Some(light)
            } else if circle(x, y, -0.58, -0.58, 0.3) || circle(x, y, 0.58, -0.58, 0.3) {
                Some(fur)
            } else {
                None
            }
        }

        Glyph::Smitten => {
            if heart(x, y, -0.34, -0.15, 0.2) || heart(x, y, 0.34, -0.15, 0.2) {
                Some([230, 30, 70])
            } else if heart(x, y, 0.72, -0.72, 0.22) || heart(x, y, -0.78, 0.2, 0.16) {
                Some([240, 60, 110])
            } else if ring(x, y, 0.0, 0.05, 0.42, 0.52) && y > 0.2 {
                Some([120, 60, 30])
            } else if circle(x, y, -0.55, 0.25, 0.13) || circle(x, y, 0.55, 0.25, 0.13) {
                Some([255, 150, 130])
            } else if circle(x, y, 0.0, 0.05, 0.85) {
                Some([255, 205, 60])
            } else {
                None
            }
        }

        Glyph::Sparkles => {
            if star(x, y, -0.2, 0.12, 0.78)
                || star(x, y, 0.56, -0.56, 0.36)
                || star(x, y, 0.62, 0.58, 0.24)
            {
                Some([255, 215, 70])
            } else {
                None
            }
        }

        Glyph::Rose => {
            let dx = x;
            let dy = y + 0.35;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= 0.55 {
                let swirl = (dist * 22.0 + dy.atan2(dx) * 1.5).sin();
                Some(if swirl > 0.55 {
                    [150, 10, 35]
                } else {
                    [215, 30, 55]
                })
            } else if ellipse(x, y, 0.28, 0.5, 0.26, 0.11) || ellipse(x, y, -0.26, 0.68, 0.22, 0.09)
            {
                Some([60, 150, 60])
            } else if x.abs() <= 0.06 && (0.15..=0.98).contains(&y) {
                Some([40, 120, 45])
            } else {
                None
            }
        }

        Glyph::Ring => {
            let gem = (x.abs() / 0.32) + ((y + 0.52).abs() / 0.3);
            if gem <= 1.0 {
                Some(if x < 0.0 {
                    [200, 240, 255]
                } else {
                    [130, 200, 245]
                })
            } else if ring(x, y, 0.0, 0.28, 0.46, 0.64) {
                Some(if ring(x, y, 0.0, 0.28, 0.5, 0.56) && x < -0.1 {
                    [255, 235, 150]
                } else {
                    [225, 175, 45]
                })
            } else {
                None
            }
        }
    }
}

fn circle(x: f32, y: f32, cx: f32, cy: f32, r: f32) -> bool {
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

fn ring(x: f32, y: f32, cx: f32, cy: f32, inner: f32, outer: f32) -> bool {
    circle(x, y, cx, cy, outer) && !circle(x, y, cx, cy, inner)
}

fn ellipse(x: f32, y: f32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    let dx = (x - cx) / rx;
    let dy = (y - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

/// Classic heart curve `(u² + v² - 1)³ - u²v³ <= 0`, scaled to `half`
fn heart(x: f32, y: f32, cx: f32, cy: f32, half: f32) -> bool {
    let u = (x - cx) / half * 1.2;
    let v = -(y - cy) / half * 1.2 + 0.15;
    let a = u * u + v * v - 1.0;
    a * a * a - u * u * v * v * v <= 0.0
}

/// Four-pointed astroid star
fn star(x: f32, y: f32, cx: f32, cy: f32, r: f32) -> bool {
    let dx = ((x - cx) / r).abs();
    let dy = ((y - cy) / r).abs();
    dx.sqrt() + dy.sqrt() <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_emoji_and_name() {
        assert_eq!("❤️".parse::<Glyph>(), Ok(Glyph::Heart));
        assert_eq!("❤".parse::<Glyph>(), Ok(Glyph::Heart));
        assert_eq!("💍".parse::<Glyph>(), Ok(Glyph::Ring));
        assert_eq!("Bear".parse::<Glyph>(), Ok(Glyph::Bear));
        assert!("🍕".parse::<Glyph>().is_err());
    }

    #[test]
    fn test_every_glyph_draws_something() {
        for glyph in Glyph::ALL {
            let sprite = sprite(glyph, 32);
            let opaque = sprite.pixels().filter(|p| p[3] > 0).count();
            assert!(opaque > 32, "{} is nearly empty", glyph.name());
        }
    }

    #[test]
    fn test_sprite_corners_transparent() {
        let sprite = sprite(Glyph::Heart, 40);
        assert_eq!(sprite.get_pixel(0, 39)[3], 0);
        assert_eq!(sprite.get_pixel(39, 39)[3], 0);
    }

    #[test]
    fn test_heart_center_is_red() {
        let sprite = sprite(Glyph::Heart, 48);
        let center = sprite.get_pixel(24, 26);
        assert_eq!(center[3], 255);
        assert!(center[0] > 200 && center[1] < 80);
    }

    #[test]
    fn test_sprite_size_has_floor() {
        assert_eq!(sprite_size(640, 480), 96);
        assert_eq!(sprite_size(10, 10), MIN_SIZE);
    }

    #[test]
    fn test_rotation() {
        assert_eq!(rotated_sprite(Glyph::Sparkles, 40, 0.0), sprite(Glyph::Sparkles, 40));

        let upright = sprite(Glyph::Heart, 40);
        let flipped = rotated_sprite(Glyph::Heart, 40, 180.0);
        assert_ne!(upright, flipped);

        // Same shape, so about the same coverage
        let coverage = |image: &RgbaImage| image.pixels().map(|p| p[3] as i64).sum::<i64>();
        let (a, b) = (coverage(&upright), coverage(&flipped));
        assert!((a - b).abs() * 20 < a, "{} vs {}", a, b);
    }

    #[test]
    fn test_glyph_serde_names() {
        let toml = toml::to_string(&std::collections::BTreeMap::from([("g", Glyph::SparklingHeart)]))
            .unwrap();
        assert_eq!(toml.trim(), "g = \"sparkling-heart\"");
    }
}
