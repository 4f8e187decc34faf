// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! `update()` only routes; the work lives in the `handlers` submodules.

use crate::app::BoothController;
use crate::app::state::Message;

impl BoothController {
    /// Main message handler - routes messages to handler methods
    pub fn update(&mut self, message: Message) {
        match message {
            // ===== User Intents =====
            Message::RequestCapture => self.request_capture(),
            Message::CancelCapture => self.cancel_capture(),
            Message::AddSticker(glyph) => {
                self.add_sticker(glyph);
            }
            Message::RemoveSticker(id) => {
                self.remove_sticker(id);
            }
            Message::MoveSticker(id, position) => {
                self.move_sticker(id, position);
            }
            Message::SetFilter(filter) => self.set_filter(filter),
            Message::RequestRetake => self.request_retake(),
            Message::RequestExport => {
                self.request_export();
            }
            Message::RetryCamera => {
                self.retry_camera();
            }
            Message::Leave => self.leave(),

            // ===== Background Results =====
            Message::Capture { epoch, event } => self.handle_capture_event(epoch, event),
            Message::ExportFinished {
                epoch,
                ticket,
                result,
            } => self.handle_export_finished(epoch, ticket, result),
        }
    }
}
