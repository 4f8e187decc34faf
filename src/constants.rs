// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Directory name used under the config and pictures directories
pub const APP_DIR_NAME: &str = "valentine-booth";

/// Countdown and flash timing
pub mod timing {
    use std::time::Duration;

    /// Default countdown before the shutter fires
    pub const COUNTDOWN_SECONDS: u32 = 3;

    /// Interval between countdown ticks
    pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

    /// How long the white flash is shown
    pub const FLASH_DURATION: Duration = Duration::from_millis(200);

    /// Delay between the flash and the frame sample.
    ///
    /// Must stay longer than [`FLASH_DURATION`] so the flash is never captured.
    pub const FLASH_SETTLE_MS: u64 = 300;
}

/// Export artifact naming
pub mod export {
    /// File stem of the downloadable photo
    pub const FILENAME_STEM: &str = "our-valentine-date";

    /// Extension of the downloadable photo
    pub const EXTENSION: &str = "png";

    /// Full default file name (`our-valentine-date.png`)
    pub fn default_filename() -> String {
        format!("{}.{}", FILENAME_STEM, EXTENSION)
    }

    /// Browser-style numbered variant: `our-valentine-date (n).png`
    pub fn numbered_filename(n: u32) -> String {
        format!("{} ({}).{}", FILENAME_STEM, n, EXTENSION)
    }

    /// Give up looking for a free name after this many attempts
    pub const MAX_NAME_ATTEMPTS: u32 = 1000;
}

/// Sticker sprite rasterization
pub mod stickers {
    /// Sprite edge length is `min(width, height) / SIZE_DIVISOR`
    pub const SIZE_DIVISOR: u32 = 5;

    /// Smallest sprite we bother drawing
    pub const MIN_SIZE: u32 = 8;

    /// Samples per axis for anti-aliased coverage
    pub const SUPERSAMPLE: u32 = 4;
}

/// Camera defaults
pub mod camera {
    /// Preferred capture width
    pub const DEFAULT_WIDTH: u32 = 640;

    /// Preferred capture height
    pub const DEFAULT_HEIGHT: u32 = 480;

    /// Number of mmap buffers for V4L2 streaming
    pub const BUFFER_COUNT: u32 = 4;

    /// Number of /dev/videoN nodes probed by `list`
    pub const MAX_PROBED_DEVICES: usize = 16;
}

/// Supported still image formats for the file source
pub mod file_formats {
    /// Image extensions the file source can load
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp", "gif"];

    /// Check whether an extension (lowercase, without dot) is a loadable image
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext)
    }
}

/// Date planner notification endpoint
pub mod notify {
    use std::time::Duration;

    /// Bot API base URL
    pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

    /// Request timeout for the fire-and-forget POST
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Environment override for the bot token
    pub const TOKEN_ENV: &str = "VALENTINE_BOT_TOKEN";

    /// Environment override for the chat id
    pub const CHAT_ID_ENV: &str = "VALENTINE_CHAT_ID";
}
