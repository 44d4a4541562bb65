use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::{self, colors};
use crate::shared::routes::{LOGIN_PATH, REGISTER_PATH};

const INPUT_WIDTH: f32 = 260.0;

/// Login form, or the registration form when `register` is set
pub fn render(ui: &mut egui::Ui, state: &mut AppState, register: bool) {
    ui.vertical_centered(|ui| {
        let top_space = (ui.available_height() - 320.0).max(0.0) / 2.0;
        ui.add_space(top_space);

        theme::card_frame().show(ui, |ui| {
            ui.set_width(INPUT_WIDTH + 40.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(if register { "Реєстрація" } else { "Вхід" })
                        .size(24.0)
                        .color(colors::TEXT_DARK),
                );
                ui.add_space(16.0);

                if let Some(error) = &state.auth_form.error {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(8.0);
                } else if let Some(notice) = &state.auth_form.notice {
                    ui.colored_label(colors::SUCCESS, notice);
                    ui.add_space(8.0);
                }

                ui.add_sized(
                    [INPUT_WIDTH, 28.0],
                    egui::TextEdit::singleline(&mut state.auth_form.username)
                        .hint_text("Ім'я користувача"),
                );
                ui.add_space(8.0);
                let password = ui.add_sized(
                    [INPUT_WIDTH, 28.0],
                    egui::TextEdit::singleline(&mut state.auth_form.password)
                        .password(true)
                        .hint_text("Пароль"),
                );
                ui.add_space(16.0);

                let submitted = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let label = if register { "Зареєструватися" } else { "Увійти" };
                let button = egui::Button::new(egui::RichText::new(label).color(colors::TEXT_LIGHT))
                    .fill(colors::ACCENT);
                let clicked = ui
                    .add_enabled(!state.auth_form.loading, button.min_size(egui::vec2(INPUT_WIDTH, 32.0)))
                    .clicked();

                if (clicked || submitted) && !state.auth_form.loading {
                    state.auth_form.notice = None;
                    if register {
                        state.handle_register();
                    } else {
                        state.handle_login();
                    }
                }

                ui.add_space(10.0);
                let (switch_label, switch_path) = if register {
                    ("Вже маєте обліковий запис? Увійти", LOGIN_PATH)
                } else {
                    ("Немає облікового запису? Зареєструватися", REGISTER_PATH)
                };
                if ui.link(switch_label).clicked() {
                    state.navigate(switch_path);
                }

                if state.auth_form.loading {
                    ui.add_space(10.0);
                    ui.spinner();
                }
            });
        });
    });
}
