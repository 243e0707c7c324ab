use eframe::egui::{self, Color32, RichText, Ui};

use crate::chart::PlotKind;
use crate::state::{Action, AppState, Notice};

const NONE_LABEL: &str = "—";

// ---------------------------------------------------------------------------
// Left side panel – selections and filter
// ---------------------------------------------------------------------------

/// Render the left panel: file, axis and plot-type pickers, the action
/// buttons and the range filter.
pub fn side_panel(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    ui.heading("DataVision Pro");
    ui.separator();

    ui.strong("Select a file");
    option_combo(
        ui,
        "file_select",
        state.selection.file.as_deref(),
        &state.files,
        |name| actions.push(Action::SelectFile(name)),
    );

    let columns = state
        .table
        .as_ref()
        .map(|t| t.column_names())
        .unwrap_or_default();

    ui.add_space(4.0);
    ui.strong("Select X-axis");
    option_combo(
        ui,
        "x_select",
        state.selection.x_column.as_deref(),
        &columns,
        |col| actions.push(Action::SetXColumn(col)),
    );

    ui.add_space(4.0);
    ui.strong("Select Y-axis");
    option_combo(
        ui,
        "y_select",
        state.selection.y_column.as_deref(),
        &columns,
        |col| actions.push(Action::SetYColumn(col)),
    );

    ui.add_space(4.0);
    ui.strong("Select Plot Type");
    plot_kind_combo(ui, state.selection.plot_kind, actions);

    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Generate Plot").clicked() {
            actions.push(Action::GeneratePlot);
        }
        if ui.button("Show Data Summary").clicked() {
            actions.push(Action::ShowSummary);
        }
    });

    ui.separator();
    let mut enabled = state.filter_enabled;
    if ui.checkbox(&mut enabled, "Enable Data Filtering").changed() {
        actions.push(Action::SetFilterEnabled(enabled));
    }

    if let (true, Some(filter)) = (state.filter_enabled, &state.range_filter) {
        let range = filter.lower_limit..=filter.upper_limit;
        let (mut min, mut max) = (filter.min, filter.max);

        ui.label("Minimum Value");
        let min_changed = ui.add(egui::Slider::new(&mut min, range.clone())).changed();
        ui.label("Maximum Value");
        let max_changed = ui.add(egui::Slider::new(&mut max, range)).changed();

        if min_changed || max_changed {
            actions.push(Action::SetFilterRange { min, max });
        }
    }
}

/// Combo box over `options` with a leading "nothing selected" entry.
fn option_combo(
    ui: &mut Ui,
    id: &str,
    current: Option<&str>,
    options: &[String],
    mut on_pick: impl FnMut(Option<String>),
) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or(NONE_LABEL))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), NONE_LABEL).clicked() && current.is_some() {
                on_pick(None);
            }
            for opt in options {
                let selected = current == Some(opt.as_str());
                if ui.selectable_label(selected, opt).clicked() && !selected {
                    on_pick(Some(opt.clone()));
                }
            }
        });
}

fn plot_kind_combo(ui: &mut Ui, current: Option<PlotKind>, actions: &mut Vec<Action>) {
    let text = current.map_or(NONE_LABEL, PlotKind::label);
    egui::ComboBox::from_id_salt("plot_kind_select")
        .selected_text(text)
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), NONE_LABEL).clicked() && current.is_some() {
                actions.push(Action::SetPlotKind(None));
            }
            for kind in PlotKind::ALL {
                let selected = current == Some(kind);
                if ui.selectable_label(selected, kind.label()).clicked() && !selected {
                    actions.push(Action::SetPlotKind(Some(kind)));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu bar with the data directory, table shape and the
/// current notice.
pub fn top_bar(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                if let Some(dir) = pick_data_dir() {
                    actions.push(Action::SetDataDir(dir));
                }
                ui.close_menu();
            }
            if ui.button("Refresh").clicked() {
                actions.push(Action::RefreshCatalog);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new(state.data_dir.display().to_string()).weak());

        if let Some(table) = &state.table {
            ui.separator();
            ui.label(format!("{} rows × {} columns", table.n_rows(), table.n_cols()));
        }

        match &state.notice {
            Some(Notice::Warning(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::YELLOW));
            }
            Some(Notice::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

fn pick_data_dir() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open data folder")
        .pick_folder()
}
