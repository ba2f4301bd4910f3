use eframe::egui::Ui;
use egui_extras::{Column as GridColumn, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data grid (bottom panel)
// ---------------------------------------------------------------------------

/// Render the loaded table as a grid: header row of column names, one
/// virtualized row per data row.
pub fn data_grid(ui: &mut Ui, state: &AppState) {
    let table = match state.view.table() {
        Some(t) => t,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(
            GridColumn::auto().at_least(60.0).clip(true),
            table.column_count(),
        )
        .header(20.0, |mut header| {
            for name in table.column_names() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.row_count(), |mut row| {
                let row_index = row.index();
                for column in table.columns() {
                    row.col(|ui| {
                        ui.label(column.cell_text(row_index));
                    });
                }
            });
        });
}
