// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the booth controller state machine

use booth::backends::camera::{MediaSource, SourceKind, StreamHandle, create_source};
use booth::errors::{ExportError, MediaError};
use booth::pipelines::photo::{
    CaptureConfig, CaptureEngine, Decoration, FilterType, Glyph, Offset, PhotoPipeline, Renderer,
};
use booth::{BoothController, BoothEvent, BoothState, Message, Phase};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

fn capture_config() -> CaptureConfig {
    CaptureConfig {
        tick_interval: Duration::from_secs(1),
        flash_settle: Duration::from_millis(300),
        mirror: false,
    }
}

fn pattern_booth(seconds: u32) -> (BoothController, UnboundedReceiver<BoothEvent>) {
    let source = create_source(&SourceKind::Pattern {
        width: 64,
        height: 48,
    });
    BoothController::with_parts(
        source,
        CaptureEngine::new(capture_config()),
        Renderer::new(Decoration::none()),
        seconds,
    )
}

/// Source that never opens
struct BrokenCamera;

impl MediaSource for BrokenCamera {
    fn open(&self) -> Result<StreamHandle, MediaError> {
        Err(MediaError::PermissionDenied)
    }

    fn describe(&self) -> String {
        "broken camera".to_string()
    }
}

fn collect(events: &mut UnboundedReceiver<BoothEvent>) -> Vec<BoothEvent> {
    let mut collected = Vec::new();
    while let Ok(event) = events.try_recv() {
        collected.push(event);
    }
    collected
}

async fn pump_until_editing(booth: &mut BoothController) {
    while !booth.state().is_editing() {
        assert!(booth.pump().await, "controller stopped before capture");
    }
}

async fn capture(booth: &mut BoothController) {
    booth.request_capture();
    pump_until_editing(booth).await;
}

fn count(events: &[BoothEvent], pred: impl Fn(&BoothEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[tokio::test(start_paused = true)]
async fn test_countdown_ticks_then_single_capture() {
    let (mut booth, mut events) = pattern_booth(3);
    assert!(booth.enter());

    booth.request_capture();
    assert_eq!(booth.phase(), Phase::CountingDown);
    pump_until_editing(&mut booth).await;

    let events = collect(&mut events);
    let ticks: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            BoothEvent::CountdownTick(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![3, 2, 1]);
    assert_eq!(count(&events, |e| matches!(e, BoothEvent::Captured(_))), 1);

    let flash = events.iter().position(|e| matches!(e, BoothEvent::Flash));
    let captured = events
        .iter()
        .position(|e| matches!(e, BoothEvent::Captured(_)));
    assert!(flash.is_some());
    assert!(flash < captured, "flash must precede the captured frame");

    assert_eq!(booth.phase(), Phase::Captured);
    assert!(booth.overlay().is_empty());
    assert_eq!(booth.overlay().filter(), FilterType::None);
}

#[tokio::test(start_paused = true)]
async fn test_full_session_scenario() {
    let (mut booth, _events) = pattern_booth(3);
    booth.enter();
    capture(&mut booth).await;

    let plain = booth.render_current().unwrap();

    let heart = booth.add_sticker(Glyph::Heart).unwrap();
    assert_eq!(booth.overlay().len(), 1);
    assert_eq!(booth.overlay().get(heart.id).unwrap().glyph, Glyph::Heart);

    booth.set_filter(FilterType::Vintage);
    let decorated = booth.render_current().unwrap();
    assert_ne!(decorated, plain);

    // The heart sits above the vintage-toned still at the center
    let (cx, cy) = (plain.width() / 2, plain.height() / 2);
    let vintage_only = Renderer::new(Decoration::none())
        .render(booth.still().as_deref(), &[], FilterType::Vintage)
        .unwrap();
    assert_ne!(
        decorated.as_rgb().get_pixel(cx, cy),
        vintage_only.as_rgb().get_pixel(cx, cy)
    );
    assert_eq!(
        decorated.as_rgb().get_pixel(1, 1),
        vintage_only.as_rgb().get_pixel(1, 1)
    );

    booth.request_retake();
    assert_eq!(booth.phase(), Phase::Idle);
    assert!(booth.still().is_none());
    assert!(booth.overlay().is_empty());
    assert_eq!(booth.overlay().filter(), FilterType::None);
}

#[tokio::test(start_paused = true)]
async fn test_retake_renders_like_fresh_capture() {
    let (mut booth, _events) = pattern_booth(1);
    booth.enter();
    capture(&mut booth).await;
    let fresh = booth.render_current().unwrap();

    booth.add_sticker(Glyph::Rose);
    booth.add_sticker(Glyph::Ring);
    booth.set_filter(FilterType::BlackAndWhite);
    booth.request_retake();

    capture(&mut booth).await;
    assert_eq!(booth.render_current().unwrap(), fresh);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_zero_never_captures() {
    let (mut booth, mut events) = pattern_booth(3);
    booth.enter();
    booth.request_capture();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    booth.drain();
    assert!(matches!(booth.state(), BoothState::CountingDown { .. }));

    booth.cancel_capture();
    assert_eq!(booth.phase(), Phase::Idle);

    tokio::time::sleep(Duration::from_secs(10)).await;
    booth.drain();

    let events = collect(&mut events);
    assert_eq!(count(&events, |e| matches!(e, BoothEvent::Captured(_))), 0);
    assert_eq!(count(&events, |e| matches!(e, BoothEvent::Flash)), 0);
    assert_eq!(booth.phase(), Phase::Idle);

    // The engine is free again
    capture(&mut booth).await;
    assert_eq!(booth.phase(), Phase::Captured);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_zero_is_noop() {
    let (mut booth, mut events) = pattern_booth(2);
    booth.enter();
    booth.request_capture();

    while !matches!(booth.state(), BoothState::Capturing) {
        assert!(booth.pump().await);
    }

    booth.cancel_capture();
    booth.update(Message::CancelCapture);
    assert!(matches!(booth.state(), BoothState::Capturing));

    pump_until_editing(&mut booth).await;
    let events = collect(&mut events);
    assert_eq!(count(&events, |e| matches!(e, BoothEvent::Captured(_))), 1);
}

#[tokio::test(start_paused = true)]
async fn test_zero_delay_flashes_immediately() {
    let (mut booth, mut events) = pattern_booth(0);
    booth.enter();
    capture(&mut booth).await;

    let events = collect(&mut events);
    assert_eq!(
        count(&events, |e| matches!(e, BoothEvent::CountdownTick(_))),
        0
    );
    assert_eq!(count(&events, |e| matches!(e, BoothEvent::Captured(_))), 1);
}

#[tokio::test(start_paused = true)]
async fn test_editing_intents_ignored_outside_editing() {
    let (mut booth, mut events) = pattern_booth(3);
    booth.enter();

    assert!(booth.add_sticker(Glyph::Heart).is_none());
    booth.set_filter(FilterType::Vintage);
    assert!(!booth.request_export());
    assert!(booth.overlay().is_empty());
    assert_eq!(booth.overlay().filter(), FilterType::None);

    tokio::time::sleep(Duration::from_secs(5)).await;
    booth.drain();
    let events = collect(&mut events);
    assert_eq!(
        count(&events, |e| matches!(e, BoothEvent::ExportReady(_))),
        0
    );
}

#[tokio::test(start_paused = true)]
async fn test_export_delivers_rendered_image() {
    let (mut booth, mut events) = pattern_booth(1);
    booth.enter();
    capture(&mut booth).await;
    collect(&mut events);

    let sticker = booth.add_sticker(Glyph::Sparkles).unwrap();
    assert!(booth.move_sticker(sticker.id, Offset::new(-10, 5)));
    let expected = booth.render_current().unwrap();

    assert!(booth.request_export());
    assert!(booth.pump().await);

    let events = collect(&mut events);
    let ready: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BoothEvent::ExportReady(image) => Some(image.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(ready.len(), 1);
    assert_eq!(*ready[0], expected);
    // Export leaves the session untouched
    assert_eq!(booth.phase(), Phase::Captured);
    assert_eq!(booth.overlay().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_exports_deliver_latest_only() {
    let (mut booth, mut events) = pattern_booth(1);
    booth.enter();
    capture(&mut booth).await;
    collect(&mut events);

    assert!(booth.request_export());
    booth.add_sticker(Glyph::Bear);
    assert!(booth.request_export());
    let latest = booth.render_current().unwrap();

    assert!(booth.pump().await);
    assert!(booth.pump().await);

    let events = collect(&mut events);
    let ready: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BoothEvent::ExportReady(image) => Some(image.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(ready.len(), 1);
    assert_eq!(*ready[0], latest);
}

#[tokio::test(start_paused = true)]
async fn test_stale_export_discarded_after_retake() {
    let (mut booth, mut events) = pattern_booth(1);
    booth.enter();
    capture(&mut booth).await;

    assert!(booth.request_export());
    booth.request_retake();
    assert!(booth.pump().await);

    let events = collect(&mut events);
    assert_eq!(
        count(&events, |e| matches!(e, BoothEvent::ExportReady(_))),
        0
    );
    assert_eq!(booth.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_keeps_the_session() {
    let (mut booth, mut events) = pattern_booth(1);
    booth.enter();
    capture(&mut booth).await;
    booth.add_sticker(Glyph::Heart).unwrap();
    booth.set_filter(FilterType::Vintage);
    collect(&mut events);

    let export = |booth: &mut BoothController| booth.request_export();
    let ready = |events: &mut UnboundedReceiver<BoothEvent>| {
        collect(events).into_iter().find_map(|e| match e {
            BoothEvent::ExportReady(image) => Some(image),
            _ => None,
        })
    };

    assert!(export(&mut booth));
    assert!(booth.pump().await);
    let image = ready(&mut events).unwrap();

    // A regular file where the export directory should be
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("pictures");
    std::fs::write(&blocked, b"not a directory").unwrap();

    let pipeline = PhotoPipeline::new();
    let result = pipeline.save(image, &blocked).await;
    assert!(matches!(result, Err(ExportError::Save(_))), "{:?}", result);

    assert_eq!(booth.phase(), Phase::Captured);
    assert_eq!(booth.overlay().len(), 1);
    assert_eq!(booth.overlay().stickers()[0].glyph, Glyph::Heart);
    assert_eq!(booth.overlay().filter(), FilterType::Vintage);

    // Trying again still works
    assert!(export(&mut booth));
    assert!(booth.pump().await);
    let image = ready(&mut events).unwrap();
    assert_eq!(*image, booth.render_current().unwrap());

    let path = pipeline.save(image, dir.path()).await.unwrap();
    assert_eq!(path.file_name().unwrap(), "our-valentine-date.png");
    assert_eq!(booth.phase(), Phase::Captured);
}

#[tokio::test(start_paused = true)]
async fn test_media_failure_stays_in_camera() {
    let (mut booth, mut events) = BoothController::with_parts(
        std::sync::Arc::new(BrokenCamera),
        CaptureEngine::new(capture_config()),
        Renderer::default(),
        3,
    );

    assert!(!booth.enter());
    assert_eq!(booth.media_error(), Some(&MediaError::PermissionDenied));

    booth.request_capture();
    assert_eq!(booth.phase(), Phase::Idle);
    assert!(!booth.retry_camera());

    let events = collect(&mut events);
    assert_eq!(
        count(&events, |e| matches!(e, BoothEvent::MediaError(_))),
        3
    );
    assert_eq!(
        count(&events, |e| matches!(e, BoothEvent::StateChanged(_))),
        0
    );
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_drives_session() {
    let (booth, mut events) = pattern_booth(2);
    let (intents, intents_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(booth.run(intents_rx));

    intents.send(Message::RequestCapture).unwrap();

    let mut phases = Vec::new();
    loop {
        match events.recv().await.unwrap() {
            BoothEvent::StateChanged(phase) => phases.push(phase),
            BoothEvent::Captured(_) => {
                intents.send(Message::AddSticker(Glyph::Smitten)).unwrap();
                intents.send(Message::SetFilter(FilterType::Vintage)).unwrap();
                intents.send(Message::RequestExport).unwrap();
            }
            BoothEvent::ExportReady(image) => {
                assert_eq!((image.width(), image.height()), (64, 48));
                break;
            }
            BoothEvent::ExportFailed(message) => panic!("export failed: {}", message),
            _ => {}
        }
    }

    intents.send(Message::Leave).unwrap();
    task.await.unwrap();

    assert_eq!(phases, vec![Phase::CountingDown, Phase::Captured]);
}
