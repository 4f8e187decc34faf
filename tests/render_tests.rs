// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for rendering and export encoding

use booth::config::DecorationSettings;
use booth::errors::RenderError;
use booth::pipelines::photo::{
    Decoration, FilterType, Glyph, Offset, Overlay, PhotoEncoder, Renderer, StillImage,
};
use image::Rgba;

fn still() -> StillImage {
    StillImage::from_fn(120, 90, |x, y| {
        Rgba([(x * 2) as u8, (y * 2) as u8, 180, 255])
    })
}

fn decorated_renderer() -> Renderer {
    Renderer::new(Decoration::from(&DecorationSettings {
        border: true,
        date_stamp: Some("FEB 14, 2026".to_string()),
        caption: Some("SHE SAID YES!".to_string()),
        ..DecorationSettings::default()
    }))
}

#[test]
fn test_render_is_pure() {
    let still = still();
    let original = still.clone();
    let mut overlay = Overlay::new();
    overlay.add_sticker(Glyph::Heart);
    let ring = overlay.add_sticker(Glyph::Ring);
    overlay.move_sticker(ring.id, Offset::new(30, -20));

    let renderer = decorated_renderer();
    for filter in FilterType::ALL {
        let a = renderer.render(Some(&still), overlay.stickers(), filter).unwrap();
        let b = renderer.render(Some(&still), overlay.stickers(), filter).unwrap();
        assert_eq!(a, b, "{:?} render differs between calls", filter);

        let png_a = PhotoEncoder::new().encode(&a).unwrap();
        let png_b = PhotoEncoder::new().encode(&b).unwrap();
        assert_eq!(png_a.data, png_b.data);
    }

    assert_eq!(still, original, "render must not touch the still");
    assert_eq!(overlay.len(), 2);
}

#[test]
fn test_render_without_still() {
    let renderer = Renderer::default();
    assert_eq!(
        renderer.render(None, &[], FilterType::None),
        Err(RenderError::EmptySource)
    );
}

#[test]
fn test_last_sticker_on_top() {
    let still = still();
    let mut overlay = Overlay::new();
    overlay.add_sticker(Glyph::Heart);
    overlay.add_sticker(Glyph::Bear);

    let renderer = Renderer::new(Decoration::none());
    let both = renderer
        .render(Some(&still), overlay.stickers(), FilterType::None)
        .unwrap();
    let bear_only = renderer
        .render(Some(&still), &overlay.stickers()[1..], FilterType::None)
        .unwrap();

    // Center pixel belongs to the bear, which covers the heart
    let (cx, cy) = (both.width() / 2, both.height() / 2);
    assert_eq!(both.as_rgb().get_pixel(cx, cy), bear_only.as_rgb().get_pixel(cx, cy));
}

#[test]
fn test_offscreen_sticker_is_clipped() {
    let still = still();
    let mut overlay = Overlay::new();
    let sticker = overlay.add_sticker(Glyph::Sparkles);
    overlay.move_sticker(sticker.id, Offset::new(10_000, -10_000));

    let renderer = Renderer::new(Decoration::none());
    let with_sticker = renderer
        .render(Some(&still), overlay.stickers(), FilterType::None)
        .unwrap();
    let plain = renderer.render(Some(&still), &[], FilterType::None).unwrap();
    assert_eq!(with_sticker, plain);
}

#[test]
fn test_png_roundtrip_dimensions() {
    let flat = decorated_renderer()
        .render(Some(&still()), &[], FilterType::BlackAndWhite)
        .unwrap();
    let encoded = PhotoEncoder::new().encode(&flat).unwrap();
    assert_eq!(image::guess_format(&encoded.data).unwrap(), image::ImageFormat::Png);

    let decoded = image::load_from_memory(&encoded.data).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (120, 90));
    assert_eq!(&decoded, flat.as_rgb());
}
