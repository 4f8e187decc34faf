// SPDX-License-Identifier: GPL-3.0-only

//! Whole-image filters applied before stickers are composited

use image::RgbaImage;
use std::str::FromStr;

/// Filter applied to the captured still
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterType {
    /// No filter applied
    #[default]
    None,
    /// Warm sepia tone with lifted blacks and soft vignette
    Vintage,
    /// Black & white / monochrome
    BlackAndWhite,
}

impl FilterType {
    /// All filters in picker order
    pub const ALL: [FilterType; 3] = [
        FilterType::None,
        FilterType::Vintage,
        FilterType::BlackAndWhite,
    ];

    /// Get display name for the filter
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterType::None => "Original",
            FilterType::Vintage => "Vintage",
            FilterType::BlackAndWhite => "B&W",
        }
    }

    /// Next filter in picker order (wraps around)
    pub fn next(self) -> Self {
        match self {
            FilterType::None => FilterType::Vintage,
            FilterType::Vintage => FilterType::BlackAndWhite,
            FilterType::BlackAndWhite => FilterType::None,
        }
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "original" => Ok(FilterType::None),
            "vintage" | "sepia" => Ok(FilterType::Vintage),
            "bw" | "b&w" | "mono" | "black-and-white" | "blackandwhite" => {
                Ok(FilterType::BlackAndWhite)
            }
            other => Err(format!("unknown filter '{}'", other)),
        }
    }
}

/// Apply a filter to the whole image in place
pub fn apply_filter(image: &mut RgbaImage, filter: FilterType) {
    if filter == FilterType::None {
        return;
    }

    let (width, height) = image.dimensions();
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let mut r = pixel[0] as f32 / 255.0;
        let mut g = pixel[1] as f32 / 255.0;
        let mut b = pixel[2] as f32 / 255.0;

        apply_filter_rgb(&mut r, &mut g, &mut b, filter, x, y, width, height);

        pixel[0] = to_u8(r);
        pixel[1] = to_u8(g);
        pixel[2] = to_u8(b);
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Apply filter effect to normalized RGB values in place
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn apply_filter_rgb(
    r: &mut f32,
    g: &mut f32,
    b: &mut f32,
    filter: FilterType,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) {
    match filter {
        FilterType::None => {}

        FilterType::BlackAndWhite => {
            let gray = 0.299 * *r + 0.587 * *g + 0.114 * *b;
            *r = gray;
            *g = gray;
            *b = gray;
        }

        FilterType::Vintage => {
            // Sepia
            let luminance = 0.299 * *r + 0.587 * *g + 0.114 * *b;
            *r = (luminance * 1.2 + 0.1).clamp(0.0, 1.0);
            *g = (luminance * 0.9 + 0.05).clamp(0.0, 1.0);
            *b = (luminance * 0.7).clamp(0.0, 1.0);

            // Lifted blacks
            *r = *r * 0.88 + 0.08;
            *g = *g * 0.88 + 0.08;
            *b = *b * 0.88 + 0.08;

            // Soft vignette
            let tex_x = (x as f32 + 0.5) / width as f32;
            let tex_y = (y as f32 + 0.5) / height as f32;
            let dx = tex_x - 0.5;
            let dy = tex_y - 0.5;
            let dist = (dx * dx + dy * dy).sqrt();
            let vignette = 1.0 - 0.35 * smoothstep(0.35, 0.75, dist);
            *r *= vignette;
            *g *= vignette;
            *b *= vignette;
        }
    }
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_none_is_identity() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([12, 200, 90, 255]));
        let original = image.clone();
        apply_filter(&mut image, FilterType::None);
        assert_eq!(image, original);
    }

    #[test]
    fn test_black_and_white_is_gray() {
        let mut image = RgbaImage::from_pixel(2, 2, Rgba([200, 40, 90, 255]));
        apply_filter(&mut image, FilterType::BlackAndWhite);
        for pixel in image.pixels() {
            assert_eq!(pixel[0], pixel[1]);
            assert_eq!(pixel[1], pixel[2]);
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_vintage_is_warm() {
        let mut image = RgbaImage::from_pixel(9, 9, Rgba([128, 128, 128, 255]));
        apply_filter(&mut image, FilterType::Vintage);
        let center = image.get_pixel(4, 4);
        assert!(center[0] > center[1] && center[1] > center[2]);
    }

    #[test]
    fn test_vintage_darkens_corners() {
        let mut image = RgbaImage::from_pixel(64, 64, Rgba([180, 180, 180, 255]));
        apply_filter(&mut image, FilterType::Vintage);
        assert!(image.get_pixel(0, 0)[0] < image.get_pixel(32, 32)[0]);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("vintage".parse::<FilterType>(), Ok(FilterType::Vintage));
        assert_eq!("B&W".parse::<FilterType>(), Ok(FilterType::BlackAndWhite));
        assert_eq!("none".parse::<FilterType>(), Ok(FilterType::None));
        assert!("pencil".parse::<FilterType>().is_err());
    }

    #[test]
    fn test_next_cycles_all() {
        let mut filter = FilterType::None;
        for _ in 0..FilterType::ALL.len() {
            filter = filter.next();
        }
        assert_eq!(filter, FilterType::None);
    }
}
