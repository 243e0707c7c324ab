use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;
use crate::data::summary::{STAT_LABELS, Summary};

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 260.0;

/// Show a table with a row-number column, like a dataframe printout.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table) {
    if table.n_cols() == 0 {
        ui.label(RichText::new("Empty table").weak());
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(30.0))
            .columns(Column::auto().at_least(70.0).clip(true), table.n_cols())
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("");
                });
                for col in table.columns() {
                    header.col(|ui| {
                        ui.strong(&col.name).on_hover_text(col.dtype.to_string());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.n_rows(), |mut row| {
                    let r = row.index();
                    row.col(|ui| {
                        ui.label(RichText::new(r.to_string()).weak());
                    });
                    for c in 0..table.n_cols() {
                        row.col(|ui| {
                            ui.label(table.cell(r, c).to_string());
                        });
                    }
                });
            });
    });
}

/// Show descriptive statistics: one row per statistic, one column per
/// numeric column.
pub fn summary_table(ui: &mut Ui, summary: &Summary) {
    if summary.columns.is_empty() {
        ui.label(RichText::new("No numeric columns to describe").weak());
        return;
    }

    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(50.0))
            .columns(Column::auto().at_least(80.0), summary.columns.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("");
                });
                for col in &summary.columns {
                    header.col(|ui| {
                        ui.strong(&col.name);
                    });
                }
            })
            .body(|mut body| {
                for (s, label) in STAT_LABELS.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.strong(*label);
                        });
                        for col in &summary.columns {
                            row.col(|ui| {
                                ui.label(format_stat(col.stats()[s]));
                            });
                        }
                    });
                }
            });
    });
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}
