//! View rendering (header, message list, input bar, profile panel, toast)

use super::App;
use crate::theme;
use crate::ui::components::{avatar, message_row, typing_indicator};
use crate::types::Sender;
use eframe::egui;

impl App {
    pub(crate) fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    avatar(ui, Sender::Bot, self.bot_avatar.as_ref());
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new("Hair Advisor")
                                .size(theme::FONT_TITLE)
                                .color(theme::TEXT_PRIMARY),
                        );
                        let (status, color) = if self.conversation.is_loading() {
                            ("Typing...", theme::ACCENT)
                        } else {
                            ("Online", theme::STATUS_SUCCESS)
                        };
                        ui.label(egui::RichText::new(status).size(theme::FONT_SMALL).color(color));
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add(theme::button(egui_phosphor::regular::GEAR))
                            .on_hover_text("Settings")
                            .clicked()
                        {
                            self.api_url_draft = self.api_base_url.clone();
                            self.show_settings = true;
                        }
                        let profile_label = if self.show_profile_panel {
                            "Hide profile"
                        } else {
                            "Show profile"
                        };
                        if ui
                            .add(theme::button(egui_phosphor::regular::USER_CIRCLE))
                            .on_hover_text(profile_label)
                            .clicked()
                        {
                            self.show_profile_panel = !self.show_profile_panel;
                            self.save_settings();
                        }
                    });
                });
            });
    }

    pub(crate) fn render_profile_panel(&mut self, ctx: &egui::Context) {
        if !self.show_profile_panel {
            return;
        }
        egui::SidePanel::right("profile_panel")
            .exact_width(theme::PROFILE_PANEL_WIDTH)
            .resizable(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(theme::SPACING_LG as i8)),
            )
            .show(ctx, |ui| {
                let header_color = if self.conversation.need_more_info() {
                    theme::STATUS_WARNING
                } else {
                    theme::TEXT_DIM
                };
                ui.label(
                    egui::RichText::new("YOUR HAIR PROFILE")
                        .size(theme::FONT_SECTION)
                        .color(header_color),
                );
                if self.conversation.need_more_info() {
                    ui.label(
                        egui::RichText::new("Still gathering details")
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                }
                ui.add_space(theme::SPACING_MD);

                let profile = self.conversation.profile().clone();
                if profile.is_empty() {
                    ui.label(
                        egui::RichText::new("Tell me about your hair or send a photo to build your profile.")
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                    ui.add_space(theme::SPACING_SM);
                }
                let hair_type = if profile.hair_type.is_empty() {
                    None
                } else {
                    Some(profile.hair_type.join(", "))
                };
                theme::card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    for (label, value) in [
                        ("Hair type", hair_type),
                        ("Texture", profile.hair_texture),
                        ("Main concern", profile.primary_concern),
                        ("Other concern", profile.secondary_concern),
                        ("Goal", profile.goal),
                    ] {
                        ui.label(egui::RichText::new(label).size(theme::FONT_SMALL).color(theme::TEXT_DIM));
                        match value {
                            Some(v) => ui.label(egui::RichText::new(v).color(theme::TEXT_PRIMARY)),
                            None => ui.label(egui::RichText::new("Not known yet").italics().color(theme::TEXT_MUTED)),
                        };
                        ui.add_space(theme::SPACING_SM);
                    }
                });
            });
    }

    pub(crate) fn render_input_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("input_bar")
            .exact_height(theme::INPUT_BAR_HEIGHT)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(12, 12))
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                let loading = self.conversation.is_loading();
                ui.horizontal_centered(|ui| {
                    let attach = ui
                        .add_enabled(!loading, theme::button(egui_phosphor::regular::PAPERCLIP))
                        .on_hover_text("Send a photo of your hair");
                    if attach.clicked() {
                        self.pick_image(ctx);
                    }

                    let send_width = 80.0;
                    let edit_width = ui.available_width() - send_width - theme::SPACING_MD;
                    let input_id = ui.make_persistent_id("chat_input");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.conversation.input)
                            .id(input_id)
                            .hint_text("Describe your hair, or attach a photo...")
                            .desired_width(edit_width)
                            .margin(egui::Margin::symmetric(8, 6)),
                    );
                    if self.focus_input {
                        self.focus_input = false;
                        response.request_focus();
                    }

                    // Enter submits; begin_submit refuses while a reply is pending
                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    let can_send = self.conversation.can_submit();
                    let label = if loading {
                        format!("{} ...", egui_phosphor::regular::HOURGLASS)
                    } else {
                        format!("{} Send", egui_phosphor::regular::PAPER_PLANE_RIGHT)
                    };
                    let send = ui.add_enabled(
                        can_send,
                        theme::button_send(label, !loading).min_size(egui::vec2(send_width, 0.0)),
                    );

                    if enter || send.clicked() {
                        self.submit(ctx);
                        self.scroll_to_bottom = true;
                        self.focus_input = true;
                    }
                });
            });
    }

    pub(crate) fn render_messages(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 12)),
            )
            .show(ctx, |ui| {
                self.central_panel_rect = Some(ui.max_rect());

                let scroll_to_bottom = std::mem::take(&mut self.scroll_to_bottom);
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for (idx, message) in self.conversation.messages().iter().enumerate() {
                            let preview = self.attachment_previews.get(&idx).and_then(|t| t.as_ref());
                            message_row(ui, message, preview, self.bot_avatar.as_ref());
                            ui.add_space(theme::SPACING_LG);
                        }
                        if self.conversation.is_loading() {
                            typing_indicator(ui, self.bot_avatar.as_ref());
                        }
                        if scroll_to_bottom {
                            ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                        }
                    });
            });
    }

    // Bottom-right of the chat area, 3s visible then fade, pause on hover
    pub(crate) fn render_toast(&mut self, ctx: &egui::Context) {
        let (Some(msg), Some(panel_rect)) = (self.toast_message.clone(), self.central_panel_rect) else {
            return;
        };
        let visible_duration = 3.0;
        let fade_duration = 0.5;
        let total_duration = visible_duration + fade_duration;
        let margin = 12.0;

        let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);

        let response = egui::Area::new(egui::Id::new("toast"))
            .fixed_pos(toast_pos)
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .show(ctx, |ui| {
                let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
                let alpha = if elapsed > visible_duration {
                    (total_duration - elapsed) / fade_duration
                } else {
                    1.0
                };

                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0x1a, 0x1a, 0x1e, (230.0 * alpha) as u8))
                    .stroke(egui::Stroke::new(
                        1.0,
                        egui::Color32::from_rgba_unmultiplied(
                            theme::ACCENT.r(),
                            theme::ACCENT.g(),
                            theme::ACCENT.b(),
                            (100.0 * alpha) as u8,
                        ),
                    ))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(msg).color(egui::Color32::from_rgba_unmultiplied(
                            255,
                            255,
                            255,
                            (255.0 * alpha) as u8,
                        )));
                    });
            });

        if response.response.hovered() {
            self.toast_start = Some(std::time::Instant::now());
        }

        let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
        if elapsed >= total_duration {
            self.toast_message = None;
            self.toast_start = None;
        } else {
            ctx.request_repaint();
        }
    }
}
