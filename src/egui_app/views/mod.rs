use eframe::egui;

use crate::egui_app::state::{AppState, Remote};
use crate::egui_app::theme::{self, colors};
use crate::session::{Chrome, GuardDecision};
use crate::shared::models::{Paging, SortDirection};
use crate::shared::Route;

pub mod auth_view;
pub mod board_view;
pub mod dashboard_view;
pub mod finance_view;

/// Navbar links: label and path
const NAV_LINKS: [(&str, &str); 3] = [
    ("Головна", "/"),
    ("Облікові записи", "/accounts"),
    ("Історія", "/history"),
];

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState, chrome: Chrome) {
    if !chrome.navbar {
        return;
    }
    let session = state.session();
    let current = state.current_path();

    egui::TopBottomPanel::top("top_panel")
        .frame(theme::top_bar_frame())
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(
                    colors::TEXT_LIGHT,
                    egui::RichText::new("Finboard").size(18.0).strong(),
                );
                ui.add_space(24.0);

                for (label, path) in NAV_LINKS {
                    let text = egui::RichText::new(label).color(colors::TEXT_LIGHT);
                    if ui.selectable_label(current == path, text).clicked() {
                        state.navigate(path);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Вийти").clicked() {
                        state.logout();
                    }
                    if let Some(user) = session.user() {
                        ui.colored_label(colors::TEXT_SECONDARY, user.role.as_str());
                        ui.colored_label(
                            colors::TEXT_LIGHT,
                            egui::RichText::new(user.initial()).size(16.0).strong(),
                        )
                        .on_hover_text(&user.username);
                    }
                });
            });
        });
}

/// Admin-only side navigation
pub fn render_admin_sidebar(ctx: &egui::Context, state: &mut AppState, chrome: Chrome) {
    if !chrome.admin_sidebar {
        return;
    }
    egui::SidePanel::left("admin_sidebar")
        .frame(theme::sidebar_frame())
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.colored_label(colors::TEXT_SECONDARY, "Адміністрування");
            ui.add_space(8.0);
            for (label, path) in [("Статистика", "/"), ("Користувачі", "/accounts"), ("Журнал", "/history")] {
                if ui
                    .button(egui::RichText::new(label).color(colors::TEXT_LIGHT))
                    .clicked()
                {
                    state.navigate(path);
                }
            }
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState, decision: &GuardDecision) {
    egui::CentralPanel::default()
        .frame(theme::page_frame())
        .show(ctx, |ui| match decision {
            GuardDecision::Loading => render_loading(ui),
            // The guard has already replaced the location; the next frame renders it
            GuardDecision::Redirect { .. } => render_loading(ui),
            GuardDecision::Render { route, .. } => render_route(ui, state, route),
        });
}

fn render_loading(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.spinner();
    });
}

fn render_route(ui: &mut egui::Ui, state: &mut AppState, route: &Route) {
    match route {
        Route::Login => auth_view::render(ui, state, false),
        Route::Register => auth_view::render(ui, state, true),
        Route::Home => dashboard_view::render_home(ui, state),
        Route::Accounts => dashboard_view::render_accounts(ui, state),
        Route::History => dashboard_view::render_history(ui, state),
        Route::Expenses { board_id } => board_view::render(ui, state, *board_id),
        Route::Employee { employee_id } => finance_view::render(ui, state, *employee_id),
        Route::NotFound(path) => {
            ui.colored_label(colors::ERROR, format!("Сторінку не знайдено: {}", path));
            if ui.link("На головну").clicked() {
                state.navigate("/");
            }
        }
    }
}

/// The loaded value, or a spinner / error line in its place
pub(crate) fn loaded<'a, T>(ui: &mut egui::Ui, remote: &'a Remote<T>) -> Option<&'a T> {
    match remote {
        Remote::NotLoaded | Remote::Loading(_) => {
            ui.spinner();
            None
        }
        Remote::Failed(message) => {
            ui.colored_label(colors::ERROR, message);
            None
        }
        Remote::Loaded(value) => Some(value),
    }
}

/// Page buttons; returns true when the page changed
pub(crate) fn render_pager(ui: &mut egui::Ui, paging: &mut Paging, total_pages: u32) -> bool {
    let mut changed = false;
    if total_pages <= 1 {
        return changed;
    }
    ui.horizontal(|ui| {
        if ui.button("◀").clicked() && paging.page > 0 {
            changed |= paging.go_to(paging.page - 1, total_pages);
        }
        for index in 0..total_pages {
            if ui
                .selectable_label(paging.page == index, (index + 1).to_string())
                .clicked()
                && paging.page != index
            {
                changed |= paging.go_to(index, total_pages);
            }
        }
        if ui.button("▶").clicked() {
            changed |= paging.go_to(paging.page + 1, total_pages);
        }
    });
    changed
}

/// Clickable column header with the sort arrow; returns true when clicked
pub(crate) fn sort_header(ui: &mut egui::Ui, paging: &mut Paging, field: &str, label: &str) -> bool {
    let arrow = match (paging.sort_by == field, paging.direction) {
        (false, _) => "",
        (true, SortDirection::Asc) => " ↑",
        (true, SortDirection::Desc) => " ↓",
    };
    if ui.button(egui::RichText::new(format!("{}{}", label, arrow)).strong()).clicked() {
        paging.sort(field);
        paging.page = 0;
        true
    } else {
        false
    }
}

/// Outcome of an inline edit row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowAction {
    Idle,
    Save,
    Cancel,
}

pub(crate) fn row_buttons(ui: &mut egui::Ui) -> RowAction {
    ui.horizontal(|ui| {
        let save = ui.small_button("✔").on_hover_text("Зберегти").clicked();
        let cancel = ui.small_button("✖").on_hover_text("Скасувати").clicked();
        if save {
            RowAction::Save
        } else if cancel {
            RowAction::Cancel
        } else {
            RowAction::Idle
        }
    })
    .inner
}
