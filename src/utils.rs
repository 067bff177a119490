//! Utility functions

use crate::constants::APP_NAME;
use std::path::PathBuf;

// Round assistant badge, used as the bot avatar
pub const BOT_AVATAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><circle cx="32" cy="32" r="32" fill="#115e59"/><path d="M20 40c2-12 6-22 12-22s10 10 12 22" fill="none" stroke="#5eead4" stroke-width="4" stroke-linecap="round"/><path d="M26 44c1-8 3-14 6-14s5 6 6 14" fill="none" stroke="#2dd4bf" stroke-width="3" stroke-linecap="round"/><circle cx="46" cy="18" r="4" fill="#fbbf24"/></svg>"##;

// Square, no background ring - for window/taskbar icons
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect width="64" height="64" rx="14" fill="#09090b"/><path d="M12 48c3-18 10-34 20-34s17 16 20 34" fill="none" stroke="#2dd4bf" stroke-width="5" stroke-linecap="round"/><path d="M22 50c2-12 5-20 10-20s8 8 10 20" fill="none" stroke="#5eead4" stroke-width="4" stroke-linecap="round"/></svg>"##;

/// Rasterize an SVG to straight-alpha RGBA at the given width, preserving aspect ratio.
pub fn rasterize_svg(svg: &str, width: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(svg, &resvg::usvg::Options::default()).ok()?;
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), width, height))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the app data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Format bytes into human-readable string (B, KB, MB)
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
