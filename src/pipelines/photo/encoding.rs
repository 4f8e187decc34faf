// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding
//!
//! Exports are always PNG so the composited frame stays lossless. Encoding
//! is CPU-bound and runs on the blocking pool when called from async code.

use super::render::FlattenedImage;
use crate::errors::ExportError;
use std::sync::Arc;
use tracing::{debug, info};

/// Encoded image data ready for saving
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Photo encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoEncoder;

impl PhotoEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode on the current thread
    pub fn encode(&self, image: &FlattenedImage) -> Result<EncodedImage, ExportError> {
        let data = image.encode_png()?;
        debug!(size = data.len(), "Encoding complete");
        Ok(EncodedImage {
            data,
            width: image.width(),
            height: image.height(),
        })
    }

    /// Encode in a background task
    pub async fn encode_async(
        &self,
        image: Arc<FlattenedImage>,
    ) -> Result<EncodedImage, ExportError> {
        info!(
            width = image.width(),
            height = image.height(),
            "Starting encoding"
        );

        let encoder = *self;
        tokio::task::spawn_blocking(move || encoder.encode(&image))
            .await
            .map_err(|e| ExportError::Encode(format!("Encoding task error: {}", e)))?
    }
}
