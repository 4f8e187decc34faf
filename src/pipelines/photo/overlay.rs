// SPDX-License-Identifier: GPL-3.0-only

//! Editable layer over the captured still
//!
//! The overlay is pure data: a list of stickers in insertion order plus the
//! active filter. Nothing here touches pixels, so edits are cheap and the
//! renderer can be fed a snapshot at any time.

use super::filters::FilterType;
use super::stickers::Glyph;
use tracing::debug;

/// Stable identifier of a sticker within one overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StickerId(pub u64);

impl std::fmt::Display for StickerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Offset of a sticker's center from the image center, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// One placed sticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerAnnotation {
    pub id: StickerId,
    pub glyph: Glyph,
    pub position: Offset,
}

/// Stickers and filter for the current still
#[derive(Debug, Clone)]
pub struct Overlay {
    stickers: Vec<StickerAnnotation>,
    filter: FilterType,
    next_id: u64,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Overlay {
    pub fn new() -> Self {
        Self {
            stickers: Vec::new(),
            filter: FilterType::None,
            next_id: 1,
        }
    }

    /// Place a new sticker at the image center.
    ///
    /// Ids increase monotonically and are never reused, even after
    /// [`Overlay::clear`].
    pub fn add_sticker(&mut self, glyph: Glyph) -> StickerAnnotation {
        let annotation = StickerAnnotation {
            id: StickerId(self.next_id),
            glyph,
            position: Offset::default(),
        };
        self.next_id += 1;
        debug!(id = %annotation.id, glyph = glyph.name(), "Sticker added");
        self.stickers.push(annotation.clone());
        annotation
    }

    /// Remove a sticker; unknown ids are a no-op
    pub fn remove_sticker(&mut self, id: StickerId) -> bool {
        let before = self.stickers.len();
        self.stickers.retain(|s| s.id != id);
        let removed = self.stickers.len() != before;
        if removed {
            debug!(id = %id, "Sticker removed");
        }
        removed
    }

    /// Reposition a sticker; unknown ids are a no-op
    pub fn move_sticker(&mut self, id: StickerId, position: Offset) -> bool {
        match self.stickers.iter_mut().find(|s| s.id == id) {
            Some(sticker) => {
                sticker.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        self.filter = filter;
    }

    /// Drop all stickers and reset the filter
    pub fn clear(&mut self) {
        self.stickers.clear();
        self.filter = FilterType::None;
    }

    /// Stickers in insertion order
    pub fn stickers(&self) -> &[StickerAnnotation] {
        &self.stickers
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    pub fn get(&self, id: StickerId) -> Option<&StickerAnnotation> {
        self.stickers.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}
