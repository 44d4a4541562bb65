//! Expense board: categories, operation filters and the operation table.

use eframe::egui;

use crate::egui_app::state::{AppState, BoardState, OperationDraft, Remote};
use crate::egui_app::theme::colors;
use crate::egui_app::views::{loaded, render_pager, row_buttons, sort_header, RowAction};
use crate::shared::models::CategoryResponse;

const COLUMNS: [(&str, &str); 4] = [
    ("amount", "Сума"),
    ("category", "Категорія"),
    ("comment", "Коментар"),
    ("date", "Дата"),
];

enum Intent {
    Search,
    CreateCategory,
    RenameCategory,
    DeleteCategory(i64),
    CreateOperation,
    SaveOperation,
    DeleteOperation(i64),
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState, board_id: i64) {
    state.open_board(board_id);
    let Some(board) = state.board.as_mut() else {
        return;
    };
    let mut intent = None;

    match board.loaded_board() {
        Some(details) => ui.heading(details.name.as_str()),
        None => ui.heading(format!("Дошка {}", board_id)),
    };
    if let Some(error) = &board.error {
        ui.colored_label(colors::ERROR, error);
    }
    ui.add_space(8.0);

    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.set_width(220.0);
            render_categories(ui, board, &mut intent);
        });
        ui.separator();
        ui.vertical(|ui| {
            render_filters(ui, board, &mut intent);
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                render_operations(ui, board, &mut intent);
            });
        });
    });

    match intent {
        Some(Intent::Search) => state.load_operations(),
        Some(Intent::CreateCategory) => state.create_category(),
        Some(Intent::RenameCategory) => state.rename_category(),
        Some(Intent::DeleteCategory(id)) => {
            state.delete_category(id);
            state.load_operations();
        }
        Some(Intent::CreateOperation) => state.create_operation(),
        Some(Intent::SaveOperation) => state.save_operation(),
        Some(Intent::DeleteOperation(id)) => state.delete_operation(id),
        None => {}
    }
}

fn render_categories(ui: &mut egui::Ui, board: &mut BoardState, intent: &mut Option<Intent>) {
    ui.strong("Категорії");
    ui.add_space(4.0);

    if let Some(categories) = loaded(ui, &board.categories) {
        let mut stop_renaming = false;
        for category in categories {
            ui.horizontal(|ui| {
                match board.renaming.as_mut() {
                    Some((id, name)) if *id == category.id => {
                        ui.add(egui::TextEdit::singleline(name).desired_width(120.0));
                        match row_buttons(ui) {
                            RowAction::Save => *intent = Some(Intent::RenameCategory),
                            RowAction::Cancel => stop_renaming = true,
                            RowAction::Idle => {}
                        }
                    }
                    _ => {
                        let mut selected = board.filter.category_ids.contains(&category.id);
                        if ui.checkbox(&mut selected, category.name.as_str()).changed() {
                            board.filter.toggle_category(category.id);
                            board.paging.page = 0;
                            *intent = Some(Intent::Search);
                        }
                        if ui.small_button("✎").on_hover_text("Перейменувати").clicked() {
                            board.renaming = Some((category.id, category.name.clone()));
                        }
                        if ui.small_button("🗑").on_hover_text("Видалити").clicked() {
                            *intent = Some(Intent::DeleteCategory(category.id));
                        }
                    }
                }
            });
        }
        if stop_renaming {
            board.renaming = None;
        }
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut board.new_category)
                .desired_width(150.0)
                .hint_text("Нова категорія"),
        );
        if ui.button("+").clicked() {
            *intent = Some(Intent::CreateCategory);
        }
    });
}

fn render_filters(ui: &mut egui::Ui, board: &mut BoardState, intent: &mut Option<Intent>) {
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut board.filter.comment)
                .desired_width(160.0)
                .hint_text("Коментар"),
        );
        ui.add(
            egui::TextEdit::singleline(&mut board.filter.start_date)
                .desired_width(100.0)
                .hint_text("Від РРРР-ММ-ДД"),
        );
        ui.add(
            egui::TextEdit::singleline(&mut board.filter.end_date)
                .desired_width(100.0)
                .hint_text("До РРРР-ММ-ДД"),
        );
        if ui.button("Пошук").clicked() {
            board.paging.page = 0;
            *intent = Some(Intent::Search);
        }
    });
}

fn render_operations(ui: &mut egui::Ui, board: &mut BoardState, intent: &mut Option<Intent>) {
    let categories: &[CategoryResponse] = match &board.categories {
        Remote::Loaded(categories) => categories,
        _ => &[],
    };
    let Some(page) = loaded(ui, &board.operations) else {
        return;
    };

    egui::Grid::new("operations_grid").striped(true).show(ui, |ui| {
        for (field, label) in COLUMNS {
            if sort_header(ui, &mut board.paging, field, label) {
                *intent = Some(Intent::Search);
            }
        }
        if ui.button("+").on_hover_text("Додати операцію").clicked() && board.adding.is_none() {
            board.adding = Some(OperationDraft::default());
        }
        ui.end_row();

        let adding = board
            .adding
            .as_mut()
            .map(|draft| draft_row(ui, draft, categories, None));
        match adding {
            Some(RowAction::Save) => *intent = Some(Intent::CreateOperation),
            Some(RowAction::Cancel) => board.adding = None,
            _ => {}
        }
        if adding.is_some() {
            ui.end_row();
        }

        for operation in &page.content {
            let editing = match board.editing.as_mut() {
                Some((id, draft)) if *id == operation.id => {
                    Some(draft_row(ui, draft, categories, Some(operation.id)))
                }
                _ => None,
            };
            match editing {
                Some(RowAction::Save) => *intent = Some(Intent::SaveOperation),
                Some(RowAction::Cancel) => board.editing = None,
                Some(RowAction::Idle) => {}
                None => {
                    ui.label(format!("{:.2}", operation.amount));
                    ui.label(operation.category.name.as_str());
                    ui.label(operation.comment.as_deref().unwrap_or(""));
                    ui.label(operation.date.format("%Y-%m-%d %H:%M").to_string());
                    ui.horizontal(|ui| {
                        if ui.small_button("✎").clicked() {
                            board.editing =
                                Some((operation.id, OperationDraft::from_operation(operation)));
                        }
                        if ui.small_button("🗑").clicked() {
                            *intent = Some(Intent::DeleteOperation(operation.id));
                        }
                    });
                }
            }
            ui.end_row();
        }
    });

    if render_pager(ui, &mut board.paging, page.total_pages) {
        *intent = Some(Intent::Search);
    }
}

fn draft_row(
    ui: &mut egui::Ui,
    draft: &mut OperationDraft,
    categories: &[CategoryResponse],
    operation_id: Option<i64>,
) -> RowAction {
    ui.add(
        egui::TextEdit::singleline(&mut draft.amount)
            .desired_width(80.0)
            .hint_text("0.00"),
    );
    let selected = draft
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or("Виберіть категорію");
    egui::ComboBox::from_id_salt(("operation_category", operation_id))
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for category in categories {
                ui.selectable_value(&mut draft.category_id, Some(category.id), category.name.as_str());
            }
        });
    ui.add(egui::TextEdit::singleline(&mut draft.comment).desired_width(140.0));
    ui.add(
        egui::TextEdit::singleline(&mut draft.date)
            .desired_width(130.0)
            .hint_text("РРРР-ММ-ДД ГГ:ХХ"),
    );
    row_buttons(ui)
}
