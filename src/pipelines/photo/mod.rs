// SPDX-License-Identifier: GPL-3.0-only

//! Photo booth pipeline
//!
//! ```text
//! Live feed → Countdown → Flash → Sample → Still
//!                                            ↓
//!                  Overlay (stickers, filter) + Decoration
//!                                            ↓
//!                        Flattened image → PNG → Disk
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Capture**: countdown stream that samples the live feed after the flash
//! 2. **Overlay**: pure data describing stickers and the active filter
//! 3. **Render**: composites still, filter, stickers and booth frame
//! 4. **Encoding/Disk I/O**: PNG encode and browser-style file naming
//!
//! Heavy stages run on the blocking pool so the countdown and the preview
//! keep ticking.

pub mod capture;
pub mod decoration;
pub mod encoding;
pub mod filters;
pub mod overlay;
pub mod render;
pub mod stickers;

pub use capture::{CaptureConfig, CaptureEngine, CaptureEvent, CountdownStream, StillImage};
pub use decoration::Decoration;
pub use encoding::{EncodedImage, PhotoEncoder};
pub use filters::FilterType;
pub use overlay::{Offset, Overlay, StickerAnnotation, StickerId};
pub use render::{FlattenedImage, Renderer};
pub use stickers::Glyph;

use crate::errors::ExportError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Encode and save a rendered photo
#[derive(Debug, Clone, Default)]
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `image` and write it to the next free export name in `dir`
    pub async fn save(
        &self,
        image: Arc<FlattenedImage>,
        dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        // Stage 1: Encode (async, CPU-bound)
        let encoded = self.encoder.encode_async(image).await?;

        // Stage 2: Save to disk (async, I/O-bound)
        crate::storage::save_export(dir, &encoded).await
    }
}
