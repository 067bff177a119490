//! App module - contains the main application state and logic

mod conversation;
mod modals;
pub(crate) mod submit;
mod views;

pub use conversation::Conversation;

use crate::api::ApiClient;
use crate::db::Database;
use crate::reply::Reconciled;
use crate::settings::Settings;
use crate::theme;
use crate::utils;
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) db: Database,
    pub(crate) session_id: String,
    pub(crate) conversation: Conversation,
    pub(crate) client: ApiClient,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Background results handed back to the UI thread
    pub(crate) outcome: Arc<Mutex<Option<Reconciled>>>,
    pub(crate) greeting: Arc<Mutex<Option<String>>>,
    pub(crate) greeting_started: bool,
    // Chat view
    pub(crate) attachment_previews: HashMap<usize, Option<egui::TextureHandle>>,
    pub(crate) bot_avatar: Option<egui::TextureHandle>,
    pub(crate) focus_input: bool,
    pub(crate) scroll_to_bottom: bool,
    pub(crate) show_profile_panel: bool,
    // Settings dialog
    pub(crate) show_settings: bool,
    pub(crate) api_base_url: String,
    pub(crate) api_url_draft: String,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        db: Database,
        session_id: String,
        settings: Settings,
        data_dir: PathBuf,
    ) -> std::io::Result<Self> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let bot_avatar = utils::rasterize_svg(utils::BOT_AVATAR_SVG, 96).map(|(pixels, w, h)| {
            cc.egui_ctx.load_texture(
                "bot_avatar",
                egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                egui::TextureOptions::LINEAR,
            )
        });

        let api_base_url = settings.effective_api_base_url();

        Ok(Self {
            db,
            session_id,
            conversation: Conversation::new(),
            client: ApiClient::new(api_base_url.clone()),
            runtime: tokio::runtime::Runtime::new()?,
            outcome: Arc::new(Mutex::new(None)),
            greeting: Arc::new(Mutex::new(None)),
            greeting_started: false,
            attachment_previews: HashMap::new(),
            bot_avatar,
            focus_input: true,
            scroll_to_bottom: false,
            show_profile_panel: settings.show_profile_panel,
            show_settings: false,
            api_url_draft: api_base_url.clone(),
            api_base_url,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        })
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            api_base_url: self.api_base_url.clone(),
            show_profile_panel: self.show_profile_panel,
        };
        settings.save(&self.data_dir);
    }

    /// Point subsequent requests at a different backend.
    pub fn set_api_base_url(&mut self, url: &str) {
        let url = crate::settings::normalize_base_url(url);
        tracing::info!(url = %url, "Backend URL changed");
        self.client = ApiClient::new(url.clone());
        self.api_url_draft = url.clone();
        self.api_base_url = url;
        self.save_settings();
    }

    pub fn show_toast(&mut self, msg: impl Into<String>) {
        self.toast_message = Some(msg.into());
        self.toast_start = Some(std::time::Instant::now());
    }
}
