#![windows_subsystem = "windows"]
//! Hair Advisor Chat - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod api;
mod app;
mod constants;
mod db;
mod reply;
mod session;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use db::Database;
use eframe::egui;
use tracing::{error, info, warn};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "hair-advisor-chat.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hair_advisor_chat=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

/// Open the on-disk store, falling back to a memory-only one for this run.
fn open_database(data_dir: &std::path::Path) -> Database {
    let db_path = data_dir.join("client.db");
    match Database::open(&db_path) {
        Ok(db) => {
            info!(path = %db_path.display(), "Database opened");
            db
        }
        Err(e) => {
            error!(error = %e, path = %db_path.display(), "Failed to open database, session will not persist");
            match Database::open_in_memory() {
                Ok(db) => db,
                Err(e) => {
                    error!(error = %e, "Failed to open in-memory database");
                    panic!("Failed to open database: {}", e);
                }
            }
        }
    }
}

fn main() -> eframe::Result<()> {
    let data_dir = utils::get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Hair Advisor Chat starting");

    let db = open_database(&data_dir);
    let session_id = match session::init_session(&db) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Session store unavailable, using a temporary session");
            uuid::Uuid::new_v4().to_string()
        }
    };

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(960.0, 720.0)))
        .with_min_inner_size([560.0, 480.0])
        .with_title(APP_NAME);

    if let Some((rgba, width, height)) = utils::rasterize_svg(utils::ICON_SVG, 256) {
        let icon = egui::IconData { rgba, width, height };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, db, session_id, settings, data_dir)?;
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Greeting on first frame
        if !self.greeting_started {
            self.fetch_greeting(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Results from background requests
        self.poll_greeting();
        self.poll_outcome();

        if !self.show_settings {
            self.handle_dropped_files(ctx);
        }

        self.render_settings_modal(ctx);

        // Side and edge panels must be added BEFORE CentralPanel
        self.render_header(ctx);
        self.render_input_bar(ctx);
        self.render_profile_panel(ctx);
        self.render_messages(ctx);

        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}
