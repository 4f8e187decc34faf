// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! Heavy work (rasterizing frames, compositing, encoding) runs in background
//! tasks so the live preview and the countdown never stall.
//!
//! # Modules
//!
//! - [`photo`]: countdown capture, editing overlay, rendering and export

pub mod photo;
