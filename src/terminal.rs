// SPDX-License-Identifier: GPL-3.0-only

//! Terminal photo booth
//!
//! Renders the live preview and the decorated still to the terminal using
//! Unicode half-block characters for improved vertical resolution.

use crate::app::{BoothController, BoothEvent, BoothState, Message};
use crate::backends::camera::MediaSource;
use crate::config::Config;
use crate::constants::timing::FLASH_DURATION;
use crate::errors::ExportError;
use crate::pipelines::photo::{Glyph, Offset, PhotoPipeline, StickerId, capture};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbImage;
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

/// Run the booth in the terminal
pub fn run(source: Arc<dyn MediaSource>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Background work (countdown, render, save) runs on this runtime
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, source, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Presentation state that the controller does not own
struct BoothView {
    controller: BoothController,
    events: UnboundedReceiver<BoothEvent>,
    pipeline: PhotoPipeline,
    export_dir: PathBuf,
    mirror: bool,
    saved_tx: UnboundedSender<Result<PathBuf, ExportError>>,
    saved_rx: UnboundedReceiver<Result<PathBuf, ExportError>>,
    selected: Option<StickerId>,
    /// Rendered still while editing; `None` when stale
    edited: Option<RgbImage>,
    flash_until: Option<Instant>,
    notice: Option<String>,
}

impl BoothView {
    fn new(source: Arc<dyn MediaSource>, config: &Config) -> Self {
        let (controller, events) = BoothController::new(source, config);
        let (saved_tx, saved_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            events,
            pipeline: PhotoPipeline::new(),
            export_dir: config.export_dir(),
            mirror: config.mirror_capture,
            saved_tx,
            saved_rx,
            selected: None,
            edited: None,
            flash_until: None,
            notice: None,
        }
    }

    /// Apply background results and controller events
    fn poll(&mut self) {
        self.controller.drain();

        while let Ok(event) = self.events.try_recv() {
            self.on_event(event);
        }

        while let Ok(saved) = self.saved_rx.try_recv() {
            self.notice = Some(match saved {
                Ok(path) => {
                    info!(path = %path.display(), "Photo saved");
                    format!("Saved: {}", path.display())
                }
                Err(e) => {
                    error!(error = %e, "Failed to save photo");
                    format!("Error: {}", e)
                }
            });
        }
    }

    fn on_event(&mut self, event: BoothEvent) {
        match event {
            BoothEvent::CountdownTick(_) | BoothEvent::StateChanged(_) => {
                self.edited = None;
            }
            BoothEvent::Flash => {
                self.flash_until = Some(Instant::now() + FLASH_DURATION);
            }
            BoothEvent::Captured(_) => {
                self.selected = None;
                self.edited = None;
                self.notice = None;
            }
            BoothEvent::MediaError(e) => {
                self.notice = Some(format!("Camera error: {}", e));
            }
            BoothEvent::CaptureFailed(e) => {
                self.notice = Some(format!("Capture failed: {}", e));
            }
            BoothEvent::ExportReady(image) => {
                let pipeline = self.pipeline.clone();
                let dir = self.export_dir.clone();
                let tx = self.saved_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(pipeline.save(image, &dir).await);
                });
                self.notice = Some("Saving...".to_string());
            }
            BoothEvent::ExportFailed(message) => {
                self.notice = Some(format!("Export failed: {}", message));
            }
        }
    }

    /// Picture for the main area
    fn picture(&mut self) -> Option<RgbImage> {
        if self.is_flashing() {
            return None;
        }

        if self.controller.state().is_editing() {
            if self.edited.is_none() {
                match self.controller.render_current() {
                    Ok(image) => self.edited = Some(image.into_rgb()),
                    Err(e) => error!(error = %e, "Failed to render preview"),
                }
            }
            return self.edited.clone();
        }

        let frame = self.controller.preview_frame()?;
        match capture::rasterize(&frame, self.mirror) {
            Ok(still) => Some(image::DynamicImage::ImageRgba8(still).into_rgb8()),
            Err(e) => {
                error!(error = %e, "Failed to decode preview frame");
                None
            }
        }
    }

    fn is_flashing(&self) -> bool {
        self.flash_until.is_some_and(|until| Instant::now() < until)
    }

    fn status_message(&self) -> String {
        let help = match self.controller.state() {
            BoothState::Camera if self.controller.media_error().is_some() => {
                "'r' retry camera | 'q' quit".to_string()
            }
            BoothState::Camera => "Ready | 'space' capture | 'q' quit".to_string(),
            BoothState::CountingDown { remaining } => {
                format!("Smile! {} | 'c' cancel", remaining)
            }
            BoothState::Capturing => "Smile!".to_string(),
            BoothState::Editing { .. } => {
                let selected = self
                    .selected
                    .and_then(|id| self.controller.overlay().get(id))
                    .map(|s| format!("{} {}", s.glyph, s.id))
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "'1-7' sticker | 'arrows' move {} | 'tab' select | 'x' remove | 'f' {} | 'r' retake | 's' save",
                    selected,
                    self.controller.overlay().filter().display_name()
                )
            }
        };

        match &self.notice {
            Some(notice) => format!("{} | {}", notice, help),
            None => help,
        }
    }

    /// Handle one key press; returns `false` to quit
    fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        // Ctrl+C to quit
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        if code == KeyCode::Char('q') {
            return false;
        }

        match self.controller.state() {
            BoothState::Camera => match code {
                KeyCode::Char(' ') | KeyCode::Char('p') => {
                    self.notice = None;
                    self.controller.update(Message::RequestCapture);
                }
                KeyCode::Char('r') => {
                    if self.controller.retry_camera() {
                        self.notice = None;
                    }
                }
                _ => {}
            },
            BoothState::CountingDown { .. } => {
                if matches!(code, KeyCode::Char('c') | KeyCode::Esc) {
                    self.controller.update(Message::CancelCapture);
                }
            }
            BoothState::Capturing => {}
            BoothState::Editing { .. } => self.on_editing_key(code),
        }
        true
    }

    fn on_editing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c @ '1'..='7') => {
                let index = c as usize - '1' as usize;
                if let Some(sticker) = self.controller.add_sticker(Glyph::ALL[index]) {
                    self.selected = Some(sticker.id);
                }
            }
            KeyCode::Tab => {
                let stickers = self.controller.overlay().stickers();
                self.selected = match self.selected {
                    Some(id) => stickers
                        .iter()
                        .position(|s| s.id == id)
                        .map(|i| stickers[(i + 1) % stickers.len()].id),
                    None => None,
                }
                .or_else(|| stickers.first().map(|s| s.id));
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.nudge_selected(code);
            }
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => {
                if let Some(id) = self.selected {
                    self.controller.update(Message::RemoveSticker(id));
                    self.selected = self.controller.overlay().stickers().last().map(|s| s.id);
                }
            }
            KeyCode::Char('f') => {
                let next = self.controller.overlay().filter().next();
                self.controller.update(Message::SetFilter(next));
            }
            KeyCode::Char('r') => {
                self.controller.update(Message::RequestRetake);
                return;
            }
            KeyCode::Char('s') | KeyCode::Enter => {
                self.notice = Some("Rendering...".to_string());
                self.controller.update(Message::RequestExport);
                return;
            }
            _ => return,
        }
        self.edited = None;
    }

    fn nudge_selected(&mut self, code: KeyCode) {
        let Some((id, Offset { dx, dy })) = self
            .selected
            .and_then(|id| self.controller.overlay().get(id))
            .map(|s| (s.id, s.position))
        else {
            return;
        };
        let step = self
            .controller
            .still()
            .map(|s| (s.width().min(s.height()) / 24).max(4) as i32)
            .unwrap_or(4);

        let position = match code {
            KeyCode::Up => Offset::new(dx, dy - step),
            KeyCode::Down => Offset::new(dx, dy + step),
            KeyCode::Left => Offset::new(dx - step, dy),
            _ => Offset::new(dx + step, dy),
        };
        self.controller.update(Message::MoveSticker(id, position));
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    source: Arc<dyn MediaSource>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = BoothView::new(source, config);
    info!(source = %view.controller.source_description(), "Starting terminal booth");
    view.controller.enter();

    let mut frame_widget = FrameWidget::new();

    loop {
        view.poll();

        frame_widget.flash = view.is_flashing();
        frame_widget.update_image(view.picture());
        let status_message = view.status_message();

        // Draw
        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let booth_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };

            f.render_widget(&frame_widget, booth_area);

            // Render status bar
            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            let status = StatusBar {
                message: &status_message,
            };
            f.render_widget(status, status_area);
        })?;

        // Handle input with timeout for frame updates
        if event::poll(Duration::from_millis(16))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !view.on_key(key.code, key.modifiers)
        {
            break;
        }
    }

    view.controller.leave();
    Ok(())
}

/// Widget that renders an image using half-block characters
struct FrameWidget {
    image: Option<RgbImage>,
    flash: bool,
}

impl FrameWidget {
    fn new() -> Self {
        Self {
            image: None,
            flash: false,
        }
    }

    fn update_image(&mut self, image: Option<RgbImage>) {
        if image.is_some() {
            self.image = image;
        }
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.flash {
            for y in area.y..area.y + area.height {
                for x in area.x..area.x + area.width {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(' ');
                        cell.set_bg(Color::White);
                    }
                }
            }
            return;
        }

        let Some(image) = &self.image else {
            // No frame yet - show placeholder
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, ratatui::style::Style::default());
            }
            return;
        };

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Calculate display dimensions maintaining aspect ratio
        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = width as f64 / height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64; // *2 because half-blocks

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        // Scale factors
        let x_scale = width as f64 / display_width as f64;
        let y_scale = height as f64 / (display_height * 2) as f64;

        // Render using half-block characters
        // Each terminal cell represents 2 vertical pixels:
        // - Upper half (▀) colored with fg
        // - Lower half colored with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let top_color = sample_pixel(image, src_x, src_y_top);
                let bottom_color = sample_pixel(image, src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(top_color);
                    cell.set_bg(bottom_color);
                }
            }
        }
    }
}

fn sample_pixel(image: &RgbImage, x: u32, y: u32) -> Color {
    let x = x.min(image.width() - 1);
    let y = y.min(image.height() - 1);
    let [r, g, b] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        // Truncate by characters; the status line carries emoji
        let text: String = self.message.chars().take(area.width as usize).collect();

        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_frame_widget_fills_area() {
        let mut widget = FrameWidget::new();
        widget.update_image(Some(RgbImage::from_pixel(8, 8, Rgb([200, 10, 20]))));

        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        let cell = buf.cell((1, 1)).unwrap();
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(200, 10, 20));
    }

    #[test]
    fn test_flash_paints_white() {
        let mut widget = FrameWidget::new();
        widget.flash = true;

        let area = Rect::new(0, 0, 3, 3);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        assert_eq!(buf.cell((2, 2)).unwrap().bg, Color::White);
    }

    #[test]
    fn test_keeps_last_image_when_none() {
        let mut widget = FrameWidget::new();
        widget.update_image(Some(RgbImage::new(2, 2)));
        widget.update_image(None);
        assert!(widget.image.is_some());
    }

    #[test]
    fn test_status_bar_truncates_by_chars() {
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        StatusBar { message: "💖💖💖💖" }.render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "💖");
    }
}
