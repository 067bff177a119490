//! Sending messages and photos to the backend

use super::App;
use crate::api::{AnalyzeRequest, ApiClient};
use crate::reply::{reconcile, Reconciled};
use crate::session::adopt_server_session;
use crate::types::Attachment;
use crate::utils::format_bytes;
use eframe::egui;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Perform one request and reduce it to the bot's answer. Never fails.
pub async fn run_submission(client: &ApiClient, request: AnalyzeRequest) -> Reconciled {
    reconcile(client.analyze(request).await)
}

impl App {
    pub fn submit(&mut self, ctx: &egui::Context) {
        let Some(request) = self.conversation.begin_submit(Some(self.session_id.as_str())) else {
            return;
        };

        if let Some(image) = &request.image {
            let idx = self.conversation.messages().len() - 1;
            self.load_attachment_preview(ctx, idx, &image.bytes);
        }

        info!(
            fields = ?request.field_names(),
            chars = request.message.len(),
            "Submitting message"
        );

        let client = self.client.clone();
        let slot = self.outcome.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let worker = tokio::spawn(async move { run_submission(&client, request).await });
            let outcome = match worker.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, "Submission task failed");
                    Reconciled::failure(format!("Something went wrong: {}", e))
                }
            };
            *slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(outcome);
            ctx.request_repaint();
        });
    }

    /// Apply a finished submission, if one is waiting.
    pub fn poll_outcome(&mut self) {
        let outcome = self.outcome.lock().unwrap_or_else(|p| p.into_inner()).take();
        let Some(outcome) = outcome else {
            return;
        };

        if adopt_server_session(&self.db, &mut self.session_id, outcome.session_id.as_deref()) {
            self.show_toast("Conversation session renewed");
        }
        debug!(need_more_info = outcome.need_more_info, "Reply received");
        self.conversation.finish_submit(outcome);
        self.scroll_to_bottom = true;
    }

    /// Picking a photo sends it right away, along with any typed text.
    pub fn attach_and_submit(&mut self, ctx: &egui::Context, attachment: Attachment) {
        if self.conversation.is_loading() {
            warn!(file = %attachment.file_name, "Ignoring image while a reply is pending");
            return;
        }
        info!(
            file = %attachment.file_name,
            size = %format_bytes(attachment.bytes.len() as u64),
            mime = %attachment.mime,
            "Image attached"
        );
        self.conversation.set_attachment(attachment);
        self.submit(ctx);
    }

    pub fn pick_image(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp", "gif"])
            .pick_file()
        else {
            return;
        };
        self.attach_path(ctx, &path);
    }

    fn attach_path(&mut self, ctx: &egui::Context, path: &Path) {
        match Attachment::from_path(path) {
            Ok(attachment) => self.attach_and_submit(ctx, attachment),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read image");
                self.conversation
                    .push_bot(format!("I couldn't open that file ({}).", e));
            }
        }
    }

    /// Accept the first image dropped onto the window.
    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        let Some(file) = dropped else {
            return;
        };
        if let Some(bytes) = file.bytes {
            let name = if file.name.is_empty() {
                "image".to_string()
            } else {
                file.name.clone()
            };
            self.attach_and_submit(ctx, Attachment::new(name, bytes.to_vec()));
        } else if let Some(path) = file.path {
            self.attach_path(ctx, &path);
        }
    }

    pub fn fetch_greeting(&mut self, ctx: &egui::Context) {
        if self.greeting_started {
            return;
        }
        self.greeting_started = true;

        let client = self.client.clone();
        let slot = self.greeting.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let text = match client.greeting().await {
                Ok(Some(text)) => text,
                Ok(None) => crate::constants::MSG_WELCOME.to_string(),
                Err(e) => {
                    warn!(error = %e, url = %client.base_url(), "Greeting unavailable");
                    crate::constants::MSG_WELCOME.to_string()
                }
            };
            *slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(text);
            ctx.request_repaint();
        });
    }

    pub fn poll_greeting(&mut self) {
        let text = self.greeting.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(text) = text {
            if !self.conversation.push_greeting(text) {
                debug!("Greeting arrived after chat started, dropped");
            }
        }
    }

    fn load_attachment_preview(&mut self, ctx: &egui::Context, message_idx: usize, bytes: &[u8]) {
        let texture = match image::load_from_memory(bytes) {
            Ok(img) => {
                let rgba = img.thumbnail(240, 240).to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.into_raw();
                Some(ctx.load_texture(
                    format!("attachment_{}", message_idx),
                    egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                    egui::TextureOptions::LINEAR,
                ))
            }
            Err(e) => {
                debug!(error = %e, "Attachment is not a decodable image");
                None
            }
        };
        self.attachment_previews.insert(message_idx, texture);
    }
}
