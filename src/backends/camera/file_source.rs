// SPDX-License-Identifier: GPL-3.0-only

//! Still image file acting as a frozen camera feed

use super::{Frame, MediaSource, PixelFormat, StreamHandle};
use crate::constants::file_formats;
use crate::errors::MediaError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Media source backed by an image file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Load an image file as an RGBA frame
pub fn load_image_as_frame(path: &Path) -> Result<Frame, MediaError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !file_formats::is_image_extension(&extension) {
        return Err(MediaError::Unavailable(format!(
            "Unsupported file format: {}",
            extension
        )));
    }

    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| MediaError::Unavailable(format!("Failed to decode {}: {}", path.display(), e)))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    debug!(path = %path.display(), width, height, "Loaded image as frame");

    Ok(Frame::packed(width, height, PixelFormat::Rgba, rgba.into_raw()))
}

impl MediaSource for FileSource {
    fn open(&self) -> Result<StreamHandle, MediaError> {
        let frame = load_image_as_frame(&self.path)?;
        info!(path = %self.path.display(), "Using image file as camera feed");
        Ok(StreamHandle::still(frame))
    }

    fn describe(&self) -> String {
        format!("File {}", self.path.display())
    }
}
