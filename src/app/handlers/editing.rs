// SPDX-License-Identifier: GPL-3.0-only

//! Editing handlers: stickers, filter and export

use crate::app::BoothController;
use crate::app::state::{BoothEvent, BoothState, Message};
use crate::pipelines::photo::{
    FilterType, FlattenedImage, Glyph, Offset, StickerAnnotation, StickerId,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl BoothController {
    /// Place `glyph` at the image center. Only valid while editing.
    pub fn add_sticker(&mut self, glyph: Glyph) -> Option<StickerAnnotation> {
        if !self.state.is_editing() {
            debug!(state = self.state.name(), "Sticker ignored: nothing to decorate");
            return None;
        }
        Some(self.overlay.add_sticker(glyph))
    }

    pub fn remove_sticker(&mut self, id: StickerId) -> bool {
        if !self.state.is_editing() {
            debug!(state = self.state.name(), "Sticker removal ignored");
            return false;
        }
        self.overlay.remove_sticker(id)
    }

    pub fn move_sticker(&mut self, id: StickerId, position: Offset) -> bool {
        if !self.state.is_editing() {
            debug!(state = self.state.name(), "Sticker move ignored");
            return false;
        }
        self.overlay.move_sticker(id, position)
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        if !self.state.is_editing() {
            debug!(state = self.state.name(), "Filter change ignored");
            return;
        }
        debug!(filter = filter.display_name(), "Filter selected");
        self.overlay.set_filter(filter);
    }

    /// Render the decorated still in the background.
    ///
    /// The result arrives as [`BoothEvent::ExportReady`] or
    /// [`BoothEvent::ExportFailed`]. If several exports overlap only the
    /// latest is delivered. Returns whether a render was started.
    pub fn request_export(&mut self) -> bool {
        let BoothState::Editing { still } = &self.state else {
            debug!(state = self.state.name(), "Export ignored: nothing captured");
            return false;
        };

        self.export_ticket += 1;
        let ticket = self.export_ticket;
        let epoch = self.epoch;

        let still = Arc::clone(still);
        let stickers = self.overlay.stickers().to_vec();
        let filter = self.overlay.filter();
        let renderer = Arc::clone(&self.renderer);
        let tx = self.internal_tx.clone();

        info!(ticket, stickers = stickers.len(), "Export requested");

        tokio::spawn(async move {
            let rendered = tokio::task::spawn_blocking(move || {
                renderer.render(Some(&still), &stickers, filter)
            })
            .await;

            let result = match rendered {
                Ok(Ok(image)) => Ok(Arc::new(image)),
                Ok(Err(e)) => {
                    error!(error = %e, "Render failed");
                    Err(e.to_string())
                }
                Err(e) => Err(format!("Render task error: {}", e)),
            };

            let _ = tx.send(Message::ExportFinished {
                epoch,
                ticket,
                result,
            });
        });

        true
    }

    pub(crate) fn handle_export_finished(
        &mut self,
        epoch: u64,
        ticket: u64,
        result: Result<Arc<FlattenedImage>, String>,
    ) {
        if epoch != self.epoch || !self.state.is_editing() {
            debug!(ticket, "Discarding export from an abandoned session");
            return;
        }
        if ticket != self.export_ticket {
            debug!(ticket, latest = self.export_ticket, "Discarding superseded export");
            return;
        }

        match result {
            Ok(image) => {
                info!(
                    ticket,
                    width = image.width(),
                    height = image.height(),
                    "Export ready"
                );
                self.emit(BoothEvent::ExportReady(image));
            }
            Err(message) => {
                warn!(ticket, error = %message, "Export failed");
                self.emit(BoothEvent::ExportFailed(message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Phase;
    use crate::backends::camera::{SourceKind, create_source};
    use crate::pipelines::photo::{CaptureConfig, CaptureEngine, Decoration, Renderer};
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn editing_booth() -> (BoothController, UnboundedReceiver<BoothEvent>) {
        let source = create_source(&SourceKind::Pattern {
            width: 32,
            height: 24,
        });
        let engine = CaptureEngine::new(CaptureConfig {
            tick_interval: Duration::from_secs(1),
            flash_settle: Duration::from_millis(300),
            mirror: false,
        });
        BoothController::with_parts(source, engine, Renderer::new(Decoration::none()), 0)
    }

    fn drain_events(events: &mut UnboundedReceiver<BoothEvent>) -> Vec<BoothEvent> {
        std::iter::from_fn(|| events.try_recv().ok()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_render_keeps_editing() {
        let (mut booth, mut events) = editing_booth();
        booth.enter();
        booth.request_capture();
        while !booth.state.is_editing() {
            assert!(booth.pump().await);
        }
        let sticker = booth.add_sticker(Glyph::Rose).unwrap();
        booth.set_filter(FilterType::BlackAndWhite);
        drain_events(&mut events);

        // A render in flight that comes back as an error
        booth.export_ticket += 1;
        booth
            .internal_tx
            .send(Message::ExportFinished {
                epoch: booth.epoch,
                ticket: booth.export_ticket,
                result: Err("out of memory".to_string()),
            })
            .unwrap();
        assert!(booth.pump().await);

        let failed: Vec<String> = drain_events(&mut events)
            .into_iter()
            .filter_map(|e| match e {
                BoothEvent::ExportFailed(message) => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(failed, vec!["out of memory".to_string()]);

        assert_eq!(booth.phase(), Phase::Captured);
        assert_eq!(booth.overlay().stickers(), &[sticker]);
        assert_eq!(booth.overlay().filter(), FilterType::BlackAndWhite);

        assert!(booth.request_export());
        assert!(booth.pump().await);
        assert!(
            drain_events(&mut events)
                .iter()
                .any(|e| matches!(e, BoothEvent::ExportReady(_)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_failure_is_dropped() {
        let (mut booth, mut events) = editing_booth();
        booth.enter();
        booth.request_capture();
        while !booth.state.is_editing() {
            assert!(booth.pump().await);
        }
        drain_events(&mut events);

        let stale = booth.export_ticket + 1;
        booth.export_ticket += 2;
        booth.handle_export_finished(booth.epoch, stale, Err("late".to_string()));

        assert!(drain_events(&mut events).is_empty());
        assert_eq!(booth.phase(), Phase::Captured);
    }
}
