// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the sticker overlay model

use booth::pipelines::photo::{FilterType, Glyph, Offset, Overlay, StickerId};
use std::collections::BTreeSet;

/// Small deterministic generator for operation sequences
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn test_add_remove_is_set_difference() {
    for seed in 1..=20u64 {
        let mut rng = Lcg(seed);
        let mut overlay = Overlay::new();
        let mut added = BTreeSet::new();
        let mut removed = BTreeSet::new();

        for _ in 0..60 {
            if rng.next() % 3 == 0 && !added.is_empty() {
                // Remove a known id, sometimes one already removed
                let ids: Vec<StickerId> = added.iter().copied().collect();
                let id = ids[(rng.next() as usize) % ids.len()];
                overlay.remove_sticker(id);
                removed.insert(id);
            } else {
                let glyph = Glyph::ALL[(rng.next() as usize) % Glyph::ALL.len()];
                added.insert(overlay.add_sticker(glyph).id);
            }
        }

        let expected: BTreeSet<StickerId> = added.difference(&removed).copied().collect();
        let actual: BTreeSet<StickerId> = overlay.stickers().iter().map(|s| s.id).collect();
        assert_eq!(actual, expected, "seed {}", seed);
    }
}

#[test]
fn test_duplicate_glyphs_get_distinct_ids() {
    let mut overlay = Overlay::new();
    let first = overlay.add_sticker(Glyph::Heart);
    let second = overlay.add_sticker(Glyph::Heart);
    assert_ne!(first.id, second.id);
    assert_eq!(overlay.len(), 2);

    assert!(overlay.remove_sticker(first.id));
    assert_eq!(overlay.len(), 1);
    assert_eq!(overlay.stickers()[0].id, second.id);
}

#[test]
fn test_insertion_order_is_id_order() {
    let mut overlay = Overlay::new();
    for glyph in Glyph::ALL {
        overlay.add_sticker(glyph);
    }
    let ids: Vec<u64> = overlay.stickers().iter().map(|s| s.id.0).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[test]
fn test_ids_not_reused_after_clear() {
    let mut overlay = Overlay::new();
    let before = overlay.add_sticker(Glyph::Rose).id;
    overlay.set_filter(FilterType::Vintage);
    overlay.clear();

    assert!(overlay.is_empty());
    assert_eq!(overlay.filter(), FilterType::None);
    assert!(overlay.add_sticker(Glyph::Rose).id > before);
}

#[test]
fn test_unknown_ids_are_noops() {
    let mut overlay = Overlay::new();
    let sticker = overlay.add_sticker(Glyph::Bear);

    assert!(!overlay.remove_sticker(StickerId(999)));
    assert!(!overlay.move_sticker(StickerId(999), Offset::new(3, 3)));
    assert_eq!(overlay.get(sticker.id).unwrap().position, Offset::default());

    assert!(overlay.move_sticker(sticker.id, Offset::new(-4, 7)));
    assert_eq!(overlay.get(sticker.id).unwrap().position, Offset::new(-4, 7));
}
