// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the photo booth

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Top-level error type used at the binary edge
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera / media source errors
    Media(MediaError),
    /// Countdown and frame grab errors
    Capture(CaptureError),
    /// Composition errors
    Render(RenderError),
    /// Encoding and file save errors
    Export(ExportError),
    /// Date planner notification errors
    Notify(NotifyError),
    /// Configuration errors
    Config(ConfigError),
    /// Generic error with message
    Other(String),
}

/// Media source errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The user or the OS refused access to the camera
    PermissionDenied,
    /// No usable camera (missing device, busy, unsupported format, ...)
    Unavailable(String),
}

/// Capture engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// A countdown is already running
    AlreadyInProgress,
    /// The source has not produced a frame yet
    NoFrameAvailable,
    /// The sampled frame could not be rasterized
    Decode(String),
}

/// Render/export service errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Render was invoked without a still image
    EmptySource,
}

/// Errors producing the downloadable artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Encoding the flattened image failed
    Encode(String),
    /// Writing the file failed
    Save(String),
}

/// Notification endpoint errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// No bot token configured
    Disabled,
    /// Transport level failure
    Request(String),
    /// Endpoint answered with a non-success status
    Status(u16),
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Config file could not be read
    Read { path: PathBuf, message: String },
    /// Config file is not valid TOML for [`crate::Config`]
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Media(e) => write!(f, "Camera error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Render(e) => write!(f, "Render error: {}", e),
            AppError::Export(e) => write!(f, "Export error: {}", e),
            AppError::Notify(e) => write!(f, "Notification error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::PermissionDenied => write!(f, "Camera permission denied"),
            MediaError::Unavailable(msg) => write!(f, "Camera unavailable: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::AlreadyInProgress => write!(f, "Capture already in progress"),
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::Decode(msg) => write!(f, "Failed to decode frame: {}", msg),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptySource => write!(f, "Nothing to render: no still image"),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Encode(msg) => write!(f, "Encoding failed: {}", msg),
            ExportError::Save(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Disabled => write!(f, "Notifications are not configured"),
            NotifyError::Request(msg) => write!(f, "Request failed: {}", msg),
            NotifyError::Status(code) => write!(f, "Endpoint returned HTTP {}", code),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Failed to parse {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for MediaError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for RenderError {}
impl std::error::Error for ExportError {}
impl std::error::Error for NotifyError {}
impl std::error::Error for ConfigError {}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::Media(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        AppError::Notify(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Save(err.to_string())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::Encode(err.to_string())
    }
}

impl From<std::io::Error> for MediaError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => MediaError::PermissionDenied,
            _ => MediaError::Unavailable(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_permission_maps_to_permission_denied() {
        let err = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert_eq!(MediaError::from(err), MediaError::PermissionDenied);
    }

    #[test]
    fn test_io_not_found_maps_to_unavailable() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no /dev/video0");
        assert!(matches!(MediaError::from(err), MediaError::Unavailable(msg) if msg.contains("video0")));
    }

    #[test]
    fn test_app_error_display_prefixes() {
        let err: AppError = RenderError::EmptySource.into();
        assert!(err.to_string().starts_with("Render error"));
    }
}
