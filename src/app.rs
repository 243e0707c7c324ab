use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataVisionApp {
    pub state: AppState,
}

impl DataVisionApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DataVisionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Widgets only read the state; interactions are applied after the
        // frame is laid out.
        let mut actions = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &mut actions);
        });

        // ---- Left side panel: selections ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut actions);
            });

        // ---- Central panel: preview, chart, summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| central_panel(ui, &self.state));
        });

        for action in actions {
            log::debug!("Applying {action:?}");
            self.state.apply(action);
        }
    }
}

fn central_panel(ui: &mut Ui, state: &AppState) {
    if let Some(table) = &state.table {
        ui.heading("Preview of the Dataframe");
        tables::data_table(ui, "preview_table", &table.head(state.config.preview_rows));
        ui.separator();
    }

    match &state.chart {
        Some(chart) => plot::chart_plot(ui, chart),
        None => plot::empty_plot(ui),
    }

    if let Some(summary) = &state.summary {
        ui.separator();
        ui.heading("Data Summary");
        tables::summary_table(ui, summary);
    }

    if let Some(filtered) = &state.filtered {
        ui.separator();
        ui.heading("Filtered Data");
        ui.label(RichText::new(format!("{} rows", filtered.n_rows())).weak());
        tables::data_table(ui, "filtered_table", filtered);
    }
}
