//! Reusable UI components
//!
//! Standalone chat widgets: bubbles, avatars and the typing indicator.

use crate::theme;
use crate::types::{Message, Sender};
use eframe::egui;
use egui::text::{LayoutJob, TextFormat};

/// Split `**bold**` markup into (segment, emphasized) pairs.
///
/// An unmatched trailing `**` is kept as literal text.
pub fn split_emphasis(text: &str) -> Vec<(String, bool)> {
    let parts: Vec<&str> = text.split("**").collect();
    let balanced = parts.len() % 2 == 1;
    let mut out: Vec<(String, bool)> = Vec::new();

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;
        let emphasized = i % 2 == 1 && (balanced || !is_last);
        let segment = if i % 2 == 1 && !emphasized {
            format!("**{}", part)
        } else {
            part.to_string()
        };
        if segment.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some((prev, prev_emph)) if *prev_emph == emphasized => prev.push_str(&segment),
            _ => out.push((segment, emphasized)),
        }
    }
    out
}

/// Lay out message text with emphasized segments in the accent color.
pub fn rich_text_job(text: &str, color: egui::Color32, wrap_width: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;
    for (segment, emphasized) in split_emphasis(text) {
        job.append(
            &segment,
            0.0,
            TextFormat {
                font_id: egui::FontId::proportional(theme::FONT_BODY),
                color: if emphasized { theme::ACCENT_LIGHT } else { color },
                ..Default::default()
            },
        );
    }
    job
}

/// Round avatar: the bot's badge texture, or a person glyph for the user.
pub fn avatar(ui: &mut egui::Ui, sender: Sender, bot_texture: Option<&egui::TextureHandle>) {
    let size = theme::AVATAR_SIZE;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }
    match (sender, bot_texture) {
        (Sender::Bot, Some(tex)) => {
            egui::Image::new(egui::load::SizedTexture::new(tex.id(), rect.size()))
                .corner_radius(size / 2.0)
                .paint_at(ui, rect);
        }
        (Sender::Bot, None) => {
            ui.painter().circle_filled(rect.center(), size / 2.0, theme::BUBBLE_USER);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::SPARKLE,
                egui::FontId::proportional(size * 0.55),
                theme::ACCENT_LIGHT,
            );
        }
        (Sender::User, _) => {
            ui.painter().circle_filled(rect.center(), size / 2.0, theme::AVATAR_USER);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::USER,
                egui::FontId::proportional(size * 0.55),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

/// One chat row: avatar plus bubble, aligned by sender.
pub fn message_row(
    ui: &mut egui::Ui,
    message: &Message,
    preview: Option<&egui::TextureHandle>,
    bot_texture: Option<&egui::TextureHandle>,
) {
    let from_user = message.sender == Sender::User;
    let max_bubble = ui.available_width() * theme::BUBBLE_MAX_WIDTH_RATIO;
    let layout = if from_user {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        avatar(ui, message.sender, bot_texture);
        ui.add_space(theme::SPACING_SM);
        theme::bubble_frame(from_user).show(ui, |ui| {
            ui.set_max_width(max_bubble);
            ui.vertical(|ui| {
                if let Some(tex) = preview {
                    let size = tex.size_vec2();
                    ui.image(egui::load::SizedTexture::new(tex.id(), size));
                    ui.add_space(theme::SPACING_SM);
                } else if let Some(name) = &message.attachment {
                    ui.label(
                        egui::RichText::new(format!("{}  {}", egui_phosphor::regular::IMAGE, name))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                }
                let text_color = if from_user { theme::TEXT_PRIMARY } else { theme::TEXT_SECONDARY };
                ui.add(egui::Label::new(rich_text_job(&message.text, text_color, max_bubble)).selectable(true));
                ui.label(
                    egui::RichText::new(message.sent_at.format("%H:%M").to_string())
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                );
            });
        });
    });
}

/// Three pulsing dots shown while the assistant is composing a reply.
pub fn typing_indicator(ui: &mut egui::Ui, bot_texture: Option<&egui::TextureHandle>) {
    ui.horizontal(|ui| {
        avatar(ui, Sender::Bot, bot_texture);
        ui.add_space(theme::SPACING_SM);
        theme::bubble_frame(false).show(ui, |ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(42.0, 16.0), egui::Sense::hover());
            let t = ui.input(|i| i.time) as f32;
            for i in 0..3 {
                let phase = t * 5.0 - i as f32 * 0.8;
                let lift = phase.sin().max(0.0) * 4.0;
                let center = egui::pos2(rect.left() + 7.0 + i as f32 * 14.0, rect.center().y - lift);
                let alpha = (140.0 + lift * 28.0) as u8;
                ui.painter().circle_filled(
                    center,
                    3.5,
                    egui::Color32::from_rgba_unmultiplied(0x5e, 0xea, 0xd4, alpha),
                );
            }
        });
    });
    ui.ctx().request_repaint();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_segments() {
        assert_eq!(
            split_emphasis("I recommend the **Ultimate Repair** range."),
            vec![
                ("I recommend the ".to_string(), false),
                ("Ultimate Repair".to_string(), true),
                (" range.".to_string(), false),
            ]
        );
    }

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(split_emphasis("hello"), vec![("hello".to_string(), false)]);
        assert!(split_emphasis("").is_empty());
    }

    #[test]
    fn unbalanced_marker_stays_literal() {
        assert_eq!(
            split_emphasis("a **b** c **d"),
            vec![
                ("a ".to_string(), false),
                ("b".to_string(), true),
                (" c **d".to_string(), false),
            ]
        );
    }
}
