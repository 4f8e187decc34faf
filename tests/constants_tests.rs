// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use booth::constants::{export, stickers, timing};
use std::time::Duration;

#[test]
fn test_export_names() {
    assert_eq!(export::default_filename(), "our-valentine-date.png");
    assert_eq!(export::numbered_filename(3), "our-valentine-date (3).png");
}

#[test]
fn test_countdown_timing() {
    assert_eq!(timing::TICK_INTERVAL, Duration::from_secs(1));
    // The flash must be visible for less than one tick
    assert!(timing::FLASH_DURATION < timing::TICK_INTERVAL);
}

#[test]
fn test_sticker_sizing() {
    assert!(stickers::MIN_SIZE > 0);
    assert!(stickers::SUPERSAMPLE >= 1);
    assert_eq!(
        booth::pipelines::photo::stickers::sprite_size(500, 400),
        400 / stickers::SIZE_DIVISOR
    );
    assert_eq!(
        booth::pipelines::photo::stickers::sprite_size(10, 10),
        stickers::MIN_SIZE
    );
}
