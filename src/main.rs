// SPDX-License-Identifier: GPL-3.0-only

use booth::backends::camera::SourceKind;
use booth::config::{CameraSettings, Config};
use booth::constants::camera::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use booth::pipelines::photo::{FilterType, Glyph};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "booth")]
#[command(about = "Valentine's photo booth: countdown, stickers, filters and PNG export")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/valentine-booth/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use a still image instead of the camera
    #[arg(long, global = true, conflicts_with = "pattern")]
    image: Option<PathBuf>,

    /// Use a synthetic test pattern instead of the camera
    #[arg(long, global = true)]
    pattern: bool,

    /// Camera index to use (from 'booth list'); overrides the config
    #[arg(short, long, global = true)]
    device: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the booth in the terminal (default)
    Terminal,

    /// List available cameras
    List,

    /// Count down, take one photo, decorate it and save it
    Snap {
        /// Sticker to add, as emoji or name (repeatable)
        #[arg(short, long = "sticker")]
        stickers: Vec<Glyph>,

        /// Filter: none, vintage or bw
        #[arg(short, long, default_value = "none")]
        filter: FilterType,

        /// Countdown length in seconds; overrides the config
        #[arg(short = 'n', long)]
        countdown: Option<u32>,

        /// Output directory (default: ~/Pictures/valentine-booth)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Plan the date and send it to the configured chat
    Plan {
        /// Food choice (preset id or free text)
        #[arg(long)]
        food: Option<String>,

        /// Activity choice (preset id or free text)
        #[arg(long)]
        activity: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=booth=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(device) = cli.device {
        config.camera.device = device;
    }
    let source = source_kind(&cli, &config.camera);

    match cli.command {
        None | Some(Commands::Terminal) => {
            booth::terminal::run(booth::create_source(&source), &config)
        }
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Snap {
            stickers,
            filter,
            countdown,
            output,
        }) => {
            if let Some(seconds) = countdown {
                config.countdown_seconds = seconds;
            }
            cli::snap(&source, &config, &stickers, filter, output)
        }
        Some(Commands::Plan { food, activity }) => cli::plan(&config, food, activity),
    }
}

fn source_kind(cli: &Cli, camera: &CameraSettings) -> SourceKind {
    if let Some(path) = &cli.image {
        SourceKind::File(path.clone())
    } else if cli.pattern {
        SourceKind::Pattern {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    } else {
        SourceKind::Camera(camera.clone())
    }
}
