//! Modal dialogs (settings)

use super::App;
use crate::constants::{APP_VERSION, DEFAULT_API_BASE_URL};
use crate::theme;
use eframe::egui;

impl App {
    pub(crate) fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut close = false;
        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(380.0);

                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Settings")
                                .size(theme::FONT_TITLE)
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add(egui::Button::new(egui_phosphor::regular::X).frame(false)).clicked() {
                            close = true;
                        }
                    });
                });
                ui.add_space(theme::SPACING_LG);

                ui.label(egui::RichText::new("BACKEND URL").size(theme::FONT_SMALL).color(theme::TEXT_DIM));
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut self.api_url_draft)
                        .hint_text(DEFAULT_API_BASE_URL)
                        .desired_width(f32::INFINITY),
                );
                let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.add_space(theme::SPACING_MD);

                ui.label(egui::RichText::new("SESSION").size(theme::FONT_SMALL).color(theme::TEXT_DIM));
                ui.add(egui::Label::new(
                    egui::RichText::new(&self.session_id).monospace().color(theme::TEXT_MUTED),
                ));
                ui.add_space(theme::SPACING_MD);

                ui.label(egui::RichText::new("DATA FOLDER").size(theme::FONT_SMALL).color(theme::TEXT_DIM));
                ui.label(
                    egui::RichText::new(self.data_dir.display().to_string())
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_MUTED),
                );
                ui.add_space(theme::SPACING_LG);

                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("v{}", APP_VERSION))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add(theme::button_accent("Save")).clicked() || submitted {
                            let draft = self.api_url_draft.clone();
                            self.set_api_base_url(&draft);
                            self.show_toast("Settings saved");
                            close = true;
                        }
                        if ui.add(theme::button("Cancel")).clicked() {
                            close = true;
                        }
                    });
                });
            });

        if close || modal_response.should_close() {
            self.show_settings = false;
            self.api_url_draft = self.api_base_url.clone();
        }
    }
}
