//! Employee finance page: settlement periods and the advances paid in them.
//!
//! Everyone can read the table; only admins add, edit or delete.

use eframe::egui;

use crate::egui_app::state::{AdvanceDraft, AppState, EmployeeState, FinanceDraft};
use crate::egui_app::theme::colors;
use crate::egui_app::views::{loaded, render_pager, row_buttons, sort_header, RowAction};
use crate::shared::models::EmployeeFinanceResponse;

const AMOUNT_COLUMNS: [(&str, &str); 3] = [
    ("incomeQFD", "Дохід по QFD"),
    ("paidRef", "Виплачено реф%"),
    ("percentQFD", "QFD (10% мінус реф%)"),
];

enum Intent {
    Reload,
    CreateFinance,
    SaveFinance,
    DeleteFinance(i64),
    CreateAdvance,
    DeleteAdvance(i64),
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState, employee_id: i64) {
    let is_admin = state.session().is_admin();
    state.open_employee(employee_id);
    let Some(employee) = state.employee.as_mut() else {
        return;
    };
    let mut intent = None;

    ui.horizontal(|ui| {
        match loaded(ui, &employee.employee) {
            Some(details) => ui.heading(format!("Співробітник {}", details.name)),
            None => ui.heading(format!("Співробітник {}", employee_id)),
        };
        if is_admin && employee.advance.is_none() && ui.button("Видати аванс").clicked() {
            employee.advance = Some(AdvanceDraft::default());
        }
    });
    if let Some(error) = &employee.error {
        ui.colored_label(colors::ERROR, error);
    }
    ui.add_space(8.0);

    if is_admin {
        render_advance_form(ui, employee, &mut intent);
    }
    egui::ScrollArea::vertical().show(ui, |ui| {
        render_finances(ui, employee, is_admin, &mut intent);
    });

    match intent {
        Some(Intent::Reload) => state.load_finances(),
        Some(Intent::CreateFinance) => state.create_finance(),
        Some(Intent::SaveFinance) => state.save_finance(),
        Some(Intent::DeleteFinance(id)) => state.delete_finance(id),
        Some(Intent::CreateAdvance) => state.create_advance(),
        Some(Intent::DeleteAdvance(id)) => state.delete_advance(id),
        None => {}
    }
}

fn render_advance_form(ui: &mut egui::Ui, employee: &mut EmployeeState, intent: &mut Option<Intent>) {
    let Some(draft) = employee.advance.as_mut() else {
        return;
    };
    let action = ui
        .horizontal(|ui| {
            ui.label("Аванс:");
            ui.add(
                egui::TextEdit::singleline(&mut draft.amount)
                    .desired_width(90.0)
                    .hint_text("Сума"),
            );
            ui.add(
                egui::TextEdit::singleline(&mut draft.date)
                    .desired_width(100.0)
                    .hint_text("РРРР-ММ-ДД"),
            );
            row_buttons(ui)
        })
        .inner;
    match action {
        RowAction::Save => *intent = Some(Intent::CreateAdvance),
        RowAction::Cancel => employee.advance = None,
        RowAction::Idle => {}
    }
    ui.add_space(8.0);
}

fn render_finances(
    ui: &mut egui::Ui,
    employee: &mut EmployeeState,
    is_admin: bool,
    intent: &mut Option<Intent>,
) {
    let Some(page) = loaded(ui, &employee.finances) else {
        return;
    };

    egui::Grid::new("finances_grid").striped(true).show(ui, |ui| {
        ui.strong("Період");
        for (field, label) in AMOUNT_COLUMNS {
            if sort_header(ui, &mut employee.paging, field, label) {
                *intent = Some(Intent::Reload);
            }
        }
        ui.strong("Аванси");
        if is_admin
            && ui.button("+").on_hover_text("Додати період").clicked()
            && employee.adding.is_none()
        {
            employee.adding = Some(FinanceDraft::default());
        }
        ui.end_row();

        let adding = employee.adding.as_mut().map(|draft| draft_row(ui, draft));
        match adding {
            Some(RowAction::Save) => *intent = Some(Intent::CreateFinance),
            Some(RowAction::Cancel) => employee.adding = None,
            _ => {}
        }
        if adding.is_some() {
            ui.end_row();
        }

        for finance in &page.content {
            let editing = match employee.editing.as_mut() {
                Some((id, draft)) if *id == finance.id => Some(draft_row(ui, draft)),
                _ => None,
            };
            match editing {
                Some(RowAction::Save) => *intent = Some(Intent::SaveFinance),
                Some(RowAction::Cancel) => employee.editing = None,
                Some(RowAction::Idle) => {}
                None => {
                    ui.label(format!(
                        "{} - {}",
                        finance.start_date.format("%d.%m.%Y"),
                        finance.end_date.format("%d.%m.%Y")
                    ));
                    ui.label(format!("{:.2}", finance.income_qfd));
                    ui.label(format!("{:.2}", finance.paid_ref));
                    ui.label(format!("{:.2}", finance.percent_qfd));
                    render_advances(ui, &mut employee.expanded, finance, is_admin, intent);
                    if is_admin {
                        ui.horizontal(|ui| {
                            if ui.small_button("✎").clicked() {
                                employee.editing =
                                    Some((finance.id, FinanceDraft::from_finance(finance)));
                            }
                            if ui.small_button("🗑").clicked() {
                                *intent = Some(Intent::DeleteFinance(finance.id));
                            }
                        });
                    }
                }
            }
            ui.end_row();
        }
    });

    if render_pager(ui, &mut employee.paging, page.total_pages) {
        *intent = Some(Intent::Reload);
    }
}

fn render_advances(
    ui: &mut egui::Ui,
    expanded: &mut Option<i64>,
    finance: &EmployeeFinanceResponse,
    is_admin: bool,
    intent: &mut Option<Intent>,
) {
    ui.vertical(|ui| {
        if finance.advances.is_empty() {
            ui.label("-");
            return;
        }
        let open = *expanded == Some(finance.id);
        let label = if open {
            "Сховати".to_string()
        } else {
            format!("Показати ({})", finance.advances.len())
        };
        if ui.small_button(label).clicked() {
            *expanded = if open { None } else { Some(finance.id) };
        }
        if !open {
            return;
        }
        for advance in &finance.advances {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{:.2} | {}",
                    advance.amount,
                    advance.date.format("%d.%m.%Y")
                ));
                if is_admin && ui.small_button("🗑").clicked() {
                    *intent = Some(Intent::DeleteAdvance(advance.id));
                }
            });
        }
    });
}

fn draft_row(ui: &mut egui::Ui, draft: &mut FinanceDraft) -> RowAction {
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut draft.start_date)
                .desired_width(90.0)
                .hint_text("Початок"),
        );
        ui.add(
            egui::TextEdit::singleline(&mut draft.end_date)
                .desired_width(90.0)
                .hint_text("Кінець"),
        );
    });
    for value in [
        &mut draft.income_qfd,
        &mut draft.paid_ref,
        &mut draft.percent_qfd,
    ] {
        ui.add(egui::TextEdit::singleline(value).desired_width(80.0).hint_text("0.00"));
    }
    ui.label("");
    row_buttons(ui)
}
