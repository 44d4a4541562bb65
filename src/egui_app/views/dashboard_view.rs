//! Protected pages: statistics, accounts and the audit log.
//!
//! Each page starts its own load the first time it is drawn.

use eframe::egui;

use crate::egui_app::state::{AppState, PasswordDraft};
use crate::egui_app::theme::colors;
use crate::egui_app::views::{loaded, render_pager, row_buttons, RowAction};
use crate::shared::models::OperationType;

const MONTHS: [&str; 12] = [
    "Січ", "Лют", "Бер", "Кві", "Тра", "Чер", "Лип", "Сер", "Вер", "Жов", "Лис", "Гру",
];

/// Admins get monthly statistics; everyone else a greeting
pub fn render_home(ui: &mut egui::Ui, state: &mut AppState) {
    let session = state.session();
    let Some(user) = session.user() else {
        return;
    };

    if !user.is_admin() {
        ui.heading(format!("Вітаємо, {}", user.username));
        ui.colored_label(colors::TEXT_SECONDARY, "Оберіть розділ у меню зверху.");
        return;
    }

    if state.dashboard.statistics.is_not_loaded() {
        state.load_statistics();
    }

    ui.horizontal(|ui| {
        ui.heading(format!("Статистика за {}", state.dashboard.year));
        ui.add_space(16.0);
        let mut reload = false;
        if ui.button("◀").clicked() {
            state.dashboard.year -= 1;
            reload = true;
        }
        if ui.button("▶").clicked() {
            state.dashboard.year += 1;
            reload = true;
        }
        for (label, kind) in [("Витрати", OperationType::Expense), ("Доходи", OperationType::Income)] {
            if ui
                .selectable_label(state.dashboard.operation_type == kind, label)
                .clicked()
            {
                state.dashboard.operation_type = kind;
                reload = true;
            }
        }
        if reload {
            state.load_statistics();
        }
    });
    ui.add_space(12.0);

    let color = match state.dashboard.operation_type {
        OperationType::Expense => colors::EXPENSE,
        OperationType::Income => colors::INCOME,
    };
    if let Some(stats) = loaded(ui, &state.dashboard.statistics) {
        let months = stats.by_month();
        let max = months.iter().cloned().fold(0.0_f64, f64::max);
        egui::Grid::new("stats_grid").striped(true).show(ui, |ui| {
            for (label, amount) in MONTHS.iter().zip(months) {
                ui.label(*label);
                let fraction = if max > 0.0 { (amount / max) as f32 } else { 0.0 };
                ui.add(
                    egui::ProgressBar::new(fraction)
                        .desired_width(360.0)
                        .fill(color)
                        .text(format!("{:.2}", amount)),
                );
                ui.end_row();
            }
        });
    }
}

enum AccountIntent {
    Reload,
    Delete(i64),
    ChangePassword,
}

pub fn render_accounts(ui: &mut egui::Ui, state: &mut AppState) {
    if state.dashboard.users.is_not_loaded() {
        state.load_users();
    }
    let is_admin = state.session().is_admin();
    ui.heading("Облікові записи");
    if let Some(error) = &state.dashboard.accounts_error {
        ui.colored_label(colors::ERROR, error);
    }
    ui.add_space(8.0);

    let dashboard = &mut state.dashboard;
    let mut intent = None;
    if let Some(page) = loaded(ui, &dashboard.users) {
        egui::Grid::new("users_grid").striped(true).show(ui, |ui| {
            ui.strong("ID");
            ui.strong("Ім'я");
            ui.strong("Роль");
            ui.end_row();
            for user in &page.content {
                ui.label(user.id.to_string());
                ui.label(&user.username);
                ui.label(user.role.as_str());
                if is_admin {
                    ui.horizontal(|ui| {
                        if ui.small_button("🔑").on_hover_text("Змінити пароль").clicked() {
                            dashboard.password_change = Some(PasswordDraft::new(user.id));
                        }
                        if ui.small_button("🗑").on_hover_text("Видалити").clicked() {
                            intent = Some(AccountIntent::Delete(user.id));
                        }
                    });
                }
                ui.end_row();
            }
        });
        if let Some(paging) = dashboard.user_query.paging.as_mut() {
            if render_pager(ui, paging, page.total_pages) {
                intent = Some(AccountIntent::Reload);
            }
        }
    }

    if let Some(draft) = dashboard.password_change.as_mut() {
        ui.add_space(12.0);
        let action = ui
            .horizontal(|ui| {
                ui.label(format!("Новий пароль для #{}:", draft.user_id));
                ui.add(
                    egui::TextEdit::singleline(&mut draft.password)
                        .password(true)
                        .desired_width(140.0)
                        .hint_text("Пароль"),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut draft.confirm_password)
                        .password(true)
                        .desired_width(140.0)
                        .hint_text("Повторіть пароль"),
                );
                row_buttons(ui)
            })
            .inner;
        match action {
            RowAction::Save => intent = Some(AccountIntent::ChangePassword),
            RowAction::Cancel => dashboard.password_change = None,
            RowAction::Idle => {}
        }
    }

    match intent {
        Some(AccountIntent::Reload) => state.load_users(),
        Some(AccountIntent::Delete(id)) => state.delete_user(id),
        Some(AccountIntent::ChangePassword) => state.change_password(),
        None => {}
    }
}

pub fn render_history(ui: &mut egui::Ui, state: &mut AppState) {
    if state.dashboard.histories.is_not_loaded() {
        state.load_histories();
    }
    ui.heading("Історія змін");
    ui.add_space(8.0);

    let dashboard = &mut state.dashboard;
    let mut reload = false;
    if let Some(page) = loaded(ui, &dashboard.histories) {
        if let Some(paging) = dashboard.history_query.paging.as_mut() {
            reload = render_pager(ui, paging, page.total_pages);
        }
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("history_grid").striped(true).show(ui, |ui| {
                for entry in &page.content {
                    let date = chrono::DateTime::from_timestamp_millis(entry.date)
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    ui.label(date);
                    ui.label(&entry.user.username);
                    ui.label(&entry.history_type);
                    ui.end_row();
                }
            });
        });
    }
    if reload {
        state.load_histories();
    }
}
