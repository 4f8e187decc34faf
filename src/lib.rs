// SPDX-License-Identifier: GPL-3.0-only

//! Valentine Booth - a countdown photo booth with stickers, filters and PNG export
//!
//! This library provides the core functionality for the booth: live media
//! sources, the countdown capture, the sticker overlay, rendering and export,
//! plus the small date planner that ships with it.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Booth controller (session state machine)
//! - [`backends`]: Media source abstraction (V4L2 camera, image file, test pattern)
//! - [`pipelines`]: Capture, overlay, render and encode stages
//! - [`planner`]: Date planner wizard and chat notification
//! - [`config`]: User configuration handling
//! - [`storage`]: Export file naming and saving
//! - [`terminal`]: Interactive booth in the terminal
//!
//! # Example
//!
//! ```ignore
//! let source = create_source(&SourceKind::Pattern { width: 320, height: 240 });
//! let (mut booth, mut events) = BoothController::new(source, &Config::default());
//! booth.enter();
//! booth.request_capture();
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod planner;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{BoothController, BoothEvent, BoothState, Message, Phase};
pub use backends::camera::{MediaSource, SourceKind, create_source};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use pipelines::photo::{FilterType, FlattenedImage, Glyph, PhotoPipeline};
