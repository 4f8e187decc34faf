// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for booth operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking a decorated photo headlessly
//! - Planning the date

use booth::backends::camera::v4l2::enumerate_cameras;
use booth::backends::camera::{SourceKind, create_source};
use booth::config::Config;
use booth::errors::AppError;
use booth::pipelines::photo::{FilterType, Glyph, PhotoPipeline};
use booth::planner::{
    ACTIVITY_OPTIONS, DatePlanner, FOOD_OPTIONS, Notifier, PlanOption, PlannerStep,
};
use booth::{BoothController, BoothEvent, Message, Phase};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::info;

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &cameras {
        println!("  [{}] {}", camera.index, camera.name);
        println!("      Device: {} ({})", camera.path, camera.driver);
        println!();
    }

    Ok(())
}

/// Count down, capture, decorate and save one photo
pub fn snap(
    kind: &SourceKind,
    config: &Config,
    stickers: &[Glyph],
    filter: FilterType,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.unwrap_or_else(|| config.export_dir());

    let rt = tokio::runtime::Runtime::new()?;
    let path = rt.block_on(snap_session(kind, config, stickers, filter, &output_dir))?;

    println!("Photo saved: {}", path.display());
    Ok(())
}

async fn snap_session(
    kind: &SourceKind,
    config: &Config,
    stickers: &[Glyph],
    filter: FilterType,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let source = create_source(kind);
    println!("Using: {}", source.describe());

    let (controller, mut events) = BoothController::new(source, config);
    let (intents, intents_rx) = mpsc::unbounded_channel();
    let booth_task = tokio::spawn(controller.run(intents_rx));

    // Ctrl+C aborts the countdown instead of killing the process
    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        let intents = intents.clone();
        ctrlc::set_handler(move || {
            cancelled.store(true, Ordering::SeqCst);
            let _ = intents.send(Message::CancelCapture);
        })?;
    }

    intents
        .send(Message::RequestCapture)
        .map_err(|_| AppError::from("Booth stopped before capture"))?;

    let result: Result<PathBuf, Box<dyn std::error::Error>> = loop {
        let Some(event) = events.recv().await else {
            break Err(AppError::from("Booth stopped unexpectedly").into());
        };

        match event {
            BoothEvent::CountdownTick(remaining) => println!("{}...", remaining),
            BoothEvent::Flash => println!("Smile!"),
            BoothEvent::Captured(still) => {
                info!(width = still.width(), height = still.height(), "Decorating still");
                let edits = stickers
                    .iter()
                    .map(|glyph| Message::AddSticker(*glyph))
                    .chain([Message::SetFilter(filter), Message::RequestExport]);
                for message in edits {
                    if intents.send(message).is_err() {
                        break;
                    }
                }
            }
            BoothEvent::ExportReady(image) => {
                break PhotoPipeline::new()
                    .save(image, output_dir)
                    .await
                    .map_err(|e| AppError::from(e).into());
            }
            BoothEvent::ExportFailed(message) => {
                break Err(AppError::Other(format!("Export failed: {}", message)).into());
            }
            BoothEvent::MediaError(e) => break Err(AppError::from(e).into()),
            BoothEvent::CaptureFailed(e) => break Err(AppError::from(e).into()),
            BoothEvent::StateChanged(Phase::Idle) if cancelled.load(Ordering::SeqCst) => {
                break Err(AppError::from("Capture cancelled").into());
            }
            BoothEvent::StateChanged(_) => {}
        }
    };

    let _ = intents.send(Message::Leave);
    let _ = booth_task.await;

    result
}

/// Walk through the date planner and submit the result
pub fn plan(
    config: &Config,
    food: Option<String>,
    activity: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut planner = DatePlanner::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    while planner.step() != PlannerStep::Review {
        let (preset, options, question) = match planner.step() {
            PlannerStep::Food => (food.as_deref(), &FOOD_OPTIONS, "What are we eating?"),
            _ => (activity.as_deref(), &ACTIVITY_OPTIONS, "What are we doing?"),
        };

        let choice = match preset {
            Some(choice) => choice.to_string(),
            None => prompt(&mut input, planner.step(), question, options)?,
        };

        let accepted = match planner.step() {
            PlannerStep::Food => planner.select_food(&choice),
            _ => planner.select_activity(&choice),
        };
        if !accepted || !planner.next() {
            return Err(AppError::from("A choice is required for every step").into());
        }
    }

    let order = planner.order();
    println!();
    println!("Step {} of 3: Review", planner.step().number());
    println!("  Food:     {}", order.food);
    println!("  Activity: {}", order.activity);
    println!();

    let notifier = Notifier::new(config.notify.clone());
    if !notifier.is_enabled() {
        println!(
            "Notifications are not configured; set {} and {} to send the plan.",
            booth::constants::notify::TOKEN_ENV,
            booth::constants::notify::CHAT_ID_ENV
        );
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        if let Some(delivery) = planner.submit(&notifier) {
            let _ = delivery.await;
        }
    });

    println!("It's a date! 💌");
    Ok(())
}

fn prompt(
    input: &mut impl BufRead,
    step: PlannerStep,
    question: &str,
    options: &[PlanOption],
) -> Result<String, Box<dyn std::error::Error>> {
    println!();
    println!("Step {} of 3: {}", step.number(), question);
    for option in options {
        println!("  {:<10} {} {}", option.id, option.emoji, option.name);
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(AppError::from("No choice given").into());
        }
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.to_string());
        }
    }
}
