//! Theme Module
//!
//! Colors and frame builders shared by the views.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::egui_app::theme::{self, colors};
//!
//! theme::apply_global_theme(ctx);
//! theme::top_bar_frame().show(ui, |ui| { /* ... */ });
//! ```

use eframe::egui::{self, CornerRadius, Stroke};

pub mod colors;

/// Apply the global theme to the egui context
pub fn apply_global_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();
    style.visuals.panel_fill = colors::PAGE_BG;
    style.visuals.window_fill = colors::CARD_BG;
    style.visuals.window_stroke = Stroke::new(1.0, colors::CARD_BORDER);
    style.visuals.selection.bg_fill = colors::ACCENT;
    style.visuals.selection.stroke = Stroke::new(1.0, colors::TEXT_LIGHT);
    style.visuals.hyperlink_color = colors::ACCENT;

    ctx.set_style(style);
}

pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::CHROME_BG)
        .inner_margin(egui::Margin::symmetric(12, 8))
}

pub fn sidebar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::SIDEBAR_BG)
        .inner_margin(egui::Margin::symmetric(10, 12))
}

pub fn page_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::PAGE_BG)
        .inner_margin(egui::Margin::same(16))
}

/// White rounded card used by the auth forms
pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::CARD_BG)
        .stroke(Stroke::new(1.0, colors::CARD_BORDER))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(egui::Margin::same(24))
}
