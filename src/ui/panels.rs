use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// Left side panel – chart controls
// ---------------------------------------------------------------------------

/// Render the chart-control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Chart");
    ui.separator();

    if state.view.table().is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("Chart type");
    egui::ComboBox::from_id_salt("chart_kind")
        .selected_text(state.chart_kind.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut state.chart_kind, kind, kind.label());
            }
        });
    ui.add_space(8.0);

    if state.chart_kind == ChartKind::Histogram {
        ui.strong("Column");
        ui.text_edit_singleline(&mut state.x_input);
        ui.strong("Bins");
        ui.text_edit_singleline(&mut state.bin_input);
    } else {
        ui.strong("X column");
        ui.text_edit_singleline(&mut state.x_input);
        ui.strong("Y column");
        ui.text_edit_singleline(&mut state.y_input);
    }

    column_hint(ui, state);

    ui.add_space(8.0);
    if ui.button("Plot").clicked() {
        state.render_chart();
    }
}

/// Live feedback on the typed column names, ahead of the Plot request.
fn column_hint(ui: &mut Ui, state: &AppState) {
    let mut selector = state.selector();
    if state.chart_kind == ChartKind::Histogram {
        // Histograms bin a single column.
        selector.y = selector.x.clone();
    }
    if selector.x.is_empty() || selector.y.is_empty() {
        return;
    }
    match state.view.validate_columns(&selector) {
        Ok(()) => {
            ui.label(RichText::new("Valid columns").color(Color32::DARK_GREEN));
        }
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        if let Some(table) = state.view.table() {
            let name = state.file_name.as_deref().unwrap_or("dataset");
            ui.label(format!(
                "{name}: {} rows × {} columns",
                table.row_count(),
                table.column_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}
