//! Chart dispatch: (table, x column, y column, plot kind) → [`Chart`].
//!
//! ```text
//!   Table + Selection
//!        │
//!        ▼
//!   column lookup ──► ColumnNotFound
//!        │
//!        ▼
//!   PlotKind::builder()   one builder per kind, shaping data if needed
//!        │                (Contour / Heatmap pivot on the 3rd column)
//!        ▼
//!   title + axis labels
//!        │
//!        ▼
//!      Chart  ──► ui::plot draws it
//! ```

pub mod builders;
pub mod iso;
pub mod stats;

use std::fmt;

use crate::data::model::{Column, Table};
use crate::data::pivot::Grid;
use crate::error::{DashboardError, Result};

pub use iso::IsoLine;
pub use stats::BoxStats;

// ---------------------------------------------------------------------------
// PlotKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    Line,
    Scatter,
    Bar,
    Histogram,
    Boxplot,
    Pie,
    Area,
    Contour,
    Heatmap,
    Violin,
}

/// Signature shared by every per-kind builder.
pub type Builder = fn(&Table, &Column, &Column, &RenderOptions) -> Result<Plotted>;

impl PlotKind {
    /// All kinds, in menu order.
    pub const ALL: [PlotKind; 10] = [
        PlotKind::Line,
        PlotKind::Scatter,
        PlotKind::Bar,
        PlotKind::Histogram,
        PlotKind::Boxplot,
        PlotKind::Pie,
        PlotKind::Area,
        PlotKind::Contour,
        PlotKind::Heatmap,
        PlotKind::Violin,
    ];

    /// Menu label, also used in chart titles.
    pub fn label(self) -> &'static str {
        match self {
            PlotKind::Line => "Line Plot",
            PlotKind::Scatter => "Scatter Plot",
            PlotKind::Bar => "Bar Chart",
            PlotKind::Histogram => "Histogram",
            PlotKind::Boxplot => "Boxplot",
            PlotKind::Pie => "Pie Chart",
            PlotKind::Area => "Area Plot",
            PlotKind::Contour => "Contour Plot",
            PlotKind::Heatmap => "Heatmap",
            PlotKind::Violin => "Violin Plot",
        }
    }

    pub fn builder(self) -> Builder {
        match self {
            PlotKind::Line => builders::line,
            PlotKind::Scatter => builders::scatter,
            PlotKind::Bar => builders::bar,
            PlotKind::Histogram => builders::histogram,
            PlotKind::Boxplot => builders::boxplot,
            PlotKind::Pie => builders::pie,
            PlotKind::Area => builders::area,
            PlotKind::Contour => builders::contour,
            PlotKind::Heatmap => builders::heatmap,
            PlotKind::Violin => builders::violin,
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub position: f64,
    pub height: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin2d {
    /// `[lower, upper]` edges along x.
    pub x: [f64; 2],
    /// `[lower, upper]` edges along y.
    pub y: [f64; 2],
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxItem {
    pub position: f64,
    pub label: String,
    pub stats: BoxStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    /// Degrees, counter-clockwise from the positive x axis.
    pub start_deg: f64,
    pub end_deg: f64,
    /// Percentage text, one decimal.
    pub pct_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViolinItem {
    pub position: f64,
    pub label: String,
    /// `(value, density)` pairs; a single entry when the group has no spread.
    pub profile: Vec<[f64; 2]>,
    pub stats: BoxStats,
}

/// Geometry for one plot kind, in data coordinates. Category axes use
/// positions `0, 1, 2, …`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Line {
        points: Vec<[f64; 2]>,
    },
    Scatter {
        points: Vec<[f64; 2]>,
    },
    Bars {
        bars: Vec<BarItem>,
    },
    Histogram {
        bins: Vec<Bin2d>,
        max_count: usize,
        density: Vec<IsoLine>,
    },
    Boxes {
        boxes: Vec<BoxItem>,
    },
    Pie {
        slices: Vec<PieSlice>,
    },
    Area {
        points: Vec<[f64; 2]>,
    },
    Contour {
        lines: Vec<IsoLine>,
        value_range: (f64, f64),
    },
    /// `grid` rows run bottom-up: row 0 is drawn at y = 0.
    Heatmap {
        grid: Grid,
        value_range: (f64, f64),
    },
    Violins {
        violins: Vec<ViolinItem>,
    },
}

/// Output of a builder, before titles are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Plotted {
    pub body: ChartBody,
    /// Tick labels for category positions on x; empty for a numeric axis.
    pub x_categories: Vec<String>,
    pub y_categories: Vec<String>,
}

impl Plotted {
    pub fn numeric(body: ChartBody) -> Self {
        Plotted {
            body,
            x_categories: Vec::new(),
            y_categories: Vec::new(),
        }
    }
}

/// A fully labelled chart ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: PlotKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_categories: Vec<String>,
    pub y_categories: Vec<String>,
    pub body: ChartBody,
}

/// Tunables read from the application config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub contour_levels: usize,
    pub histogram_bins: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            contour_levels: 8,
            histogram_bins: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Render `kind` for the given columns with default options.
pub fn render(table: &Table, x_col: &str, y_col: &str, kind: PlotKind) -> Result<Chart> {
    render_with(table, x_col, y_col, kind, &RenderOptions::default())
}

pub fn render_with(
    table: &Table,
    x_col: &str,
    y_col: &str,
    kind: PlotKind,
    options: &RenderOptions,
) -> Result<Chart> {
    let x = table
        .column(x_col)
        .ok_or_else(|| DashboardError::ColumnNotFound(x_col.to_string()))?;
    let y = table
        .column(y_col)
        .ok_or_else(|| DashboardError::ColumnNotFound(y_col.to_string()))?;

    log::debug!("Building {kind} for x={x_col} ({}), y={y_col} ({})", x.dtype, y.dtype);
    let plotted = (kind.builder())(table, x, y, options)?;

    Ok(Chart {
        kind,
        title: format!("{} of {y_col} vs {x_col}", kind.label()),
        x_label: x_col.to_string(),
        y_label: y_col.to_string(),
        x_categories: plotted.x_categories,
        y_categories: plotted.y_categories,
        body: plotted.body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_table() -> Table {
        Table::new(vec![
            Column::from_raw("x", &["1", "2", "3", "1", "2", "3", "1", "2", "3"]),
            Column::from_raw("y", &["1", "1", "1", "2", "2", "2", "3", "3", "3"]),
            Column::from_raw("z", &["1", "2", "3", "2", "9", "2", "3", "2", "1"]),
        ])
        .unwrap()
    }

    #[test]
    fn every_kind_titles_y_vs_x() {
        let table = grid_table();
        for kind in PlotKind::ALL {
            let chart = render(&table, "x", "y", kind)
                .unwrap_or_else(|e| panic!("{kind} failed: {e}"));
            assert_eq!(chart.title, format!("{} of y vs x", kind.label()));
            assert_eq!(chart.x_label, "x");
            assert_eq!(chart.y_label, "y");
            assert_eq!(chart.kind, kind);
        }
    }

    #[test]
    fn labels_match_menu_text() {
        let labels: Vec<&str> = PlotKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Line Plot",
                "Scatter Plot",
                "Bar Chart",
                "Histogram",
                "Boxplot",
                "Pie Chart",
                "Area Plot",
                "Contour Plot",
                "Heatmap",
                "Violin Plot",
            ]
        );
    }

    #[test]
    fn unknown_column_is_reported() {
        let err = render(&grid_table(), "x", "nope", PlotKind::Line).unwrap_err();
        assert!(matches!(err, DashboardError::ColumnNotFound(c) if c == "nope"));
    }

    #[test]
    fn sample_line_plot_follows_file_order() {
        let table = Table::new(vec![
            Column::from_raw("date", &["2024-01-02", "2024-01-01", "2024-01-03"]),
            Column::from_raw("region", &["north", "south", "north"]),
            Column::from_raw("sales", &["20", "10", "30"]),
        ])
        .unwrap();
        let chart = render(&table, "date", "sales", PlotKind::Line).unwrap();
        assert_eq!(chart.title, "Line Plot of sales vs date");
        assert_eq!(chart.x_categories, vec!["2024-01-02", "2024-01-01", "2024-01-03"]);
        assert_eq!(
            chart.body,
            ChartBody::Line {
                points: vec![[0.0, 20.0], [1.0, 10.0], [2.0, 30.0]]
            }
        );
    }
}
