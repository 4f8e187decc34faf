// SPDX-License-Identifier: GPL-3.0-only

//! Saving exported photos
//!
//! Exports behave like a browser download: the first one is
//! `our-valentine-date.png`, later ones get a ` (n)` suffix instead of
//! overwriting.

use crate::constants::export;
use crate::errors::ExportError;
use crate::pipelines::photo::EncodedImage;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// First unused export path in `dir`
pub fn next_free_path(dir: &Path) -> Result<PathBuf, ExportError> {
    free_path_from(dir, 0).map(|(_, path)| path)
}

fn candidate(dir: &Path, n: u32) -> PathBuf {
    if n == 0 {
        dir.join(export::default_filename())
    } else {
        dir.join(export::numbered_filename(n))
    }
}

/// First unused name at suffix `start` or later, with its suffix
fn free_path_from(dir: &Path, start: u32) -> Result<(u32, PathBuf), ExportError> {
    (start..export::MAX_NAME_ATTEMPTS)
        .map(|n| (n, candidate(dir, n)))
        .find(|(_, path)| !path.exists())
        .ok_or_else(|| ExportError::Save(format!("no free file name left in {}", dir.display())))
}

/// Create the next free export file in `dir` and fill it with `data`.
///
/// A name taken between the lookup and the create (another save, or an entry
/// `exists()` cannot see) moves the search on to the next suffix.
fn write_new(dir: &Path, data: &[u8]) -> Result<PathBuf, ExportError> {
    let mut start = 0;
    loop {
        let (n, path) = free_path_from(dir, start)?;
        debug!(path = %path.display(), bytes = data.len(), "Writing export");

        // never clobber an existing export
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(data)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "Name taken meanwhile, trying the next one");
                start = n + 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Write `encoded` to the next free export path in `dir`
pub async fn save_export(dir: &Path, encoded: &EncodedImage) -> Result<PathBuf, ExportError> {
    let dir = dir.to_path_buf();
    let data = encoded.data.clone();

    let path = tokio::task::spawn_blocking(move || -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&dir)?;
        write_new(&dir, &data)
    })
    .await
    .map_err(|e| ExportError::Save(format!("Save task error: {}", e)))??;

    info!(path = %path.display(), "Photo saved");
    Ok(path)
}
