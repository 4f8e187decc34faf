// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for camera capture
//!
//! The backend layer hides how frames are obtained (webcam, image file,
//! synthetic pattern) behind the [`camera::MediaSource`] trait.
//!
//! # Modules
//!
//! - [`camera`]: media sources, frame types and pixel conversion

pub mod camera;
