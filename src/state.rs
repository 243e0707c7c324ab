use std::path::PathBuf;

use crate::chart::{self, Chart, PlotKind};
use crate::config::AppConfig;
use crate::data::filter::{self, RangeFilter};
use crate::data::model::Table;
use crate::data::summary::{self, Summary};
use crate::data::{catalog, loader};
use crate::error::{DashboardError, Result};
use crate::selection::{Readiness, Selection};

// ---------------------------------------------------------------------------
// Actions and notices
// ---------------------------------------------------------------------------

/// One user interaction. The UI emits these; [`AppState::apply`] runs them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RefreshCatalog,
    SetDataDir(PathBuf),
    SelectFile(Option<String>),
    SetXColumn(Option<String>),
    SetYColumn(Option<String>),
    SetPlotKind(Option<PlotKind>),
    GeneratePlot,
    ShowSummary,
    SetFilterEnabled(bool),
    SetFilterRange { min: f64, max: f64 },
}

/// Message shown in the top bar until the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Directory the catalog lists.
    pub data_dir: PathBuf,

    /// Tabular file names found in `data_dir`.
    pub files: Vec<String>,

    pub selection: Selection,

    /// Loaded table (None until the user picks a file).
    pub table: Option<Table>,

    /// Last chart generated.
    pub chart: Option<Chart>,

    /// Last summary computed.
    pub summary: Option<Summary>,

    /// Whether "Enable Data Filtering" is ticked.
    pub filter_enabled: bool,

    /// Slider state while filtering is enabled.
    pub range_filter: Option<RangeFilter>,

    /// Rows passing the range filter (cached).
    pub filtered: Option<Table>,

    /// Warning / error message shown in the UI.
    pub notice: Option<Notice>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let mut state = Self {
            data_dir: config.data_dir.clone(),
            config,
            files: Vec::new(),
            selection: Selection::default(),
            table: None,
            chart: None,
            summary: None,
            filter_enabled: false,
            range_filter: None,
            filtered: None,
            notice: None,
        };
        state.refresh_catalog();
        state
    }

    /// Run one action against the session.
    pub fn apply(&mut self, action: Action) {
        self.notice = None;
        match action {
            Action::RefreshCatalog => self.refresh_catalog(),
            Action::SetDataDir(dir) => {
                self.data_dir = dir;
                self.select_file(None);
                self.refresh_catalog();
            }
            Action::SelectFile(name) => self.select_file(name),
            Action::SetXColumn(col) => self.selection.x_column = col,
            Action::SetYColumn(col) => self.selection.y_column = col,
            Action::SetPlotKind(kind) => self.selection.plot_kind = kind,
            Action::GeneratePlot => self.generate_plot(),
            Action::ShowSummary => {
                if let Err(e) = self.show_summary() {
                    self.fail(e);
                }
            }
            Action::SetFilterEnabled(enabled) => self.set_filter_enabled(enabled),
            Action::SetFilterRange { min, max } => self.set_filter_range(min, max),
        }
    }

    fn fail(&mut self, err: DashboardError) {
        log::error!("{err}");
        self.notice = Some(Notice::Error(err.to_string()));
    }

    /// Re-list the data directory.
    pub fn refresh_catalog(&mut self) {
        match catalog::list_files(&self.data_dir) {
            Ok(files) => {
                log::info!("Found {} data files in {}", files.len(), self.data_dir.display());
                self.files = files;
            }
            Err(e) => {
                log::error!("Failed to list {}: {e:#}", self.data_dir.display());
                self.notice = Some(Notice::Error(format!("{e:#}")));
            }
        }
    }

    fn load(&self, name: &str) -> Result<Table> {
        let path = catalog::resolve(&self.data_dir, name);
        if !path.is_file() {
            return Err(DashboardError::FileNotFound(name.to_string()));
        }
        loader::load_file(&path).map_err(|source| DashboardError::Load {
            file: name.to_string(),
            source,
        })
    }

    /// Switch to another file. On failure the previous file stays loaded.
    fn select_file(&mut self, name: Option<String>) {
        let table = match name.as_deref().map(|n| self.load(n)).transpose() {
            Ok(table) => table,
            Err(e) => return self.fail(e),
        };
        if let (Some(name), Some(table)) = (&name, &table) {
            log::info!(
                "Loaded {name}: {} rows, columns {:?}",
                table.n_rows(),
                table.column_names()
            );
        }

        self.selection.file = name;
        self.selection.clear_axes();
        self.table = table;
        self.chart = None;
        self.summary = None;
        if self.filter_enabled {
            self.refresh_filter();
        }
    }

    fn generate_plot(&mut self) {
        let options = self.config.render_options();
        let outcome = match self.selection.readiness() {
            incomplete @ (Readiness::NeedsFile | Readiness::NeedsAxes) => {
                let warning = incomplete.warning().unwrap_or_default();
                log::warn!("{warning}");
                self.notice = Some(Notice::Warning(warning.to_string()));
                return;
            }
            Readiness::NoPlotKind => return,
            Readiness::Ready { x, y, kind, .. } => match &self.table {
                Some(table) => chart::render_with(table, x, y, kind, &options),
                None => Err(DashboardError::NoTableLoaded),
            },
        };

        match outcome {
            Ok(chart) => {
                log::info!("Rendered '{}'", chart.title);
                self.chart = Some(chart);
            }
            Err(e) => self.fail(e),
        }
    }

    fn show_summary(&mut self) -> Result<()> {
        let table = self.table.as_ref().ok_or(DashboardError::NoTableLoaded)?;
        self.summary = Some(summary::describe(table));
        Ok(())
    }

    fn set_filter_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.filter_enabled = false;
            self.range_filter = None;
            self.filtered = None;
            return;
        }
        if self.table.is_none() {
            return self.fail(DashboardError::NoTableLoaded);
        }
        self.filter_enabled = true;
        self.refresh_filter();
    }

    /// Recompute bounds and rows for the current table. Without a table
    /// there is nothing to filter and the sliders go away.
    fn refresh_filter(&mut self) {
        let Some(table) = &self.table else {
            self.range_filter = None;
            self.filtered = None;
            return;
        };
        match RangeFilter::for_table(table) {
            Ok(range) => {
                self.range_filter = Some(range);
                self.recompute_filtered();
            }
            Err(e) => {
                self.range_filter = None;
                self.filtered = None;
                self.fail(e);
            }
        }
    }

    fn set_filter_range(&mut self, min: f64, max: f64) {
        if let Some(range) = &mut self.range_filter {
            range.set_range(min, max);
            self.recompute_filtered();
        }
    }

    fn recompute_filtered(&mut self) {
        if let (Some(table), Some(range)) = (&self.table, &self.range_filter) {
            let filtered = filter::apply(table, range.min, range.max);
            log::debug!(
                "Filter [{}, {}] keeps {} of {} rows",
                range.min,
                range.max,
                filtered.n_rows(),
                table.n_rows()
            );
            self.filtered = Some(filtered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartBody;
    use crate::selection::{SELECT_AXES_WARNING, SELECT_FILE_WARNING};

    const SAMPLE: &str = "date,region,sales\n\
        2024-01-01,north,20\n\
        2024-01-02,south,50\n\
        2024-01-03,north,80\n\
        2024-01-04,east,100\n";

    fn session() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sample.csv"), SAMPLE).unwrap();
        std::fs::write(dir.path().join("pair.csv"), "a,b\n1,2\n3,4\n").unwrap();
        std::fs::write(dir.path().join("readme.md"), "not data").unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        (dir, state)
    }

    fn choose(state: &mut AppState, file: &str, x: &str, y: &str, kind: PlotKind) {
        state.apply(Action::SelectFile(Some(file.into())));
        state.apply(Action::SetXColumn(Some(x.into())));
        state.apply(Action::SetYColumn(Some(y.into())));
        state.apply(Action::SetPlotKind(Some(kind)));
    }

    #[test]
    fn catalog_lists_tabular_files_only() {
        let (_dir, state) = session();
        let mut files = state.files.clone();
        files.sort();
        assert_eq!(files, vec!["pair.csv", "sample.csv"]);
    }

    #[test]
    fn generate_without_file_warns() {
        let (_dir, mut state) = session();
        state.apply(Action::GeneratePlot);
        assert_eq!(state.notice, Some(Notice::Warning(SELECT_FILE_WARNING.into())));
        assert!(state.chart.is_none());
    }

    #[test]
    fn generate_without_axes_warns() {
        let (_dir, mut state) = session();
        state.apply(Action::SelectFile(Some("sample.csv".into())));
        state.apply(Action::SetXColumn(Some("date".into())));
        state.apply(Action::SetPlotKind(Some(PlotKind::Line)));
        state.apply(Action::GeneratePlot);
        assert_eq!(state.notice, Some(Notice::Warning(SELECT_AXES_WARNING.into())));
        assert!(state.chart.is_none());
    }

    #[test]
    fn generate_without_kind_does_nothing() {
        let (_dir, mut state) = session();
        state.apply(Action::SelectFile(Some("sample.csv".into())));
        state.apply(Action::SetXColumn(Some("date".into())));
        state.apply(Action::SetYColumn(Some("sales".into())));
        state.apply(Action::GeneratePlot);
        assert!(state.notice.is_none());
        assert!(state.chart.is_none());
    }

    #[test]
    fn line_plot_of_sample() {
        let (_dir, mut state) = session();
        choose(&mut state, "sample.csv", "date", "sales", PlotKind::Line);
        state.apply(Action::GeneratePlot);
        let chart = state.chart.as_ref().expect("chart");
        assert_eq!(chart.title, "Line Plot of sales vs date");
        let ChartBody::Line { points } = &chart.body else {
            panic!("expected line");
        };
        let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
        assert_eq!(ys, vec![20.0, 50.0, 80.0, 100.0]);
    }

    #[test]
    fn failed_chart_keeps_previous_one() {
        let (_dir, mut state) = session();
        choose(&mut state, "pair.csv", "a", "b", PlotKind::Scatter);
        state.apply(Action::GeneratePlot);
        assert!(state.chart.is_some());

        state.apply(Action::SetPlotKind(Some(PlotKind::Contour)));
        state.apply(Action::GeneratePlot);
        assert!(matches!(state.notice, Some(Notice::Error(_))));
        assert_eq!(state.chart.as_ref().map(|c| c.kind), Some(PlotKind::Scatter));
    }

    #[test]
    fn vanished_file_is_not_found() {
        let (dir, mut state) = session();
        std::fs::remove_file(dir.path().join("pair.csv")).unwrap();
        state.apply(Action::SelectFile(Some("pair.csv".into())));
        assert_eq!(
            state.notice,
            Some(Notice::Error("file not found: pair.csv".into()))
        );
        assert!(state.selection.file.is_none());
        assert!(state.table.is_none());
    }

    #[test]
    fn switching_files_resets_axes() {
        let (_dir, mut state) = session();
        choose(&mut state, "sample.csv", "date", "sales", PlotKind::Bar);
        state.apply(Action::GeneratePlot);
        state.apply(Action::SelectFile(Some("pair.csv".into())));
        assert_eq!(state.selection.x_column, None);
        assert_eq!(state.selection.y_column, None);
        assert_eq!(state.selection.plot_kind, Some(PlotKind::Bar));
        assert!(state.chart.is_none());
    }

    #[test]
    fn summary_and_filter_need_a_table() {
        let (_dir, mut state) = session();
        state.apply(Action::ShowSummary);
        assert!(matches!(state.notice, Some(Notice::Error(ref m)) if m.contains("no table")));
        state.apply(Action::SetFilterEnabled(true));
        assert!(matches!(state.notice, Some(Notice::Error(_))));
        assert!(!state.filter_enabled);
    }

    #[test]
    fn summary_describes_numeric_columns() {
        let (_dir, mut state) = session();
        state.apply(Action::SelectFile(Some("sample.csv".into())));
        state.apply(Action::ShowSummary);
        let summary = state.summary.as_ref().expect("summary");
        assert_eq!(summary.columns.len(), 1);
        assert_eq!(summary.columns[0].name, "sales");
        assert_eq!(summary.columns[0].mean, 62.5);
    }

    #[test]
    fn filter_seeds_sliders_and_applies_range() {
        let (_dir, mut state) = session();
        state.apply(Action::SelectFile(Some("sample.csv".into())));
        state.apply(Action::SetFilterEnabled(true));
        let range = state.range_filter.expect("range");
        assert_eq!((range.min, range.max), (20.0, 100.0));
        assert_eq!(state.filtered.as_ref().map(Table::n_rows), Some(4));

        state.apply(Action::SetFilterRange { min: 30.0, max: 80.0 });
        assert_eq!(state.filtered.as_ref().map(Table::n_rows), Some(2));

        state.apply(Action::SetFilterEnabled(false));
        assert!(state.filtered.is_none());
    }

    #[test]
    fn switching_files_refilters_the_new_table() {
        let (_dir, mut state) = session();
        state.apply(Action::SelectFile(Some("sample.csv".into())));
        state.apply(Action::SetFilterEnabled(true));
        state.apply(Action::SetFilterRange { min: 30.0, max: 80.0 });

        state.apply(Action::SelectFile(Some("pair.csv".into())));
        let range = state.range_filter.expect("range");
        assert_eq!((range.lower_limit, range.upper_limit), (1.0, 4.0));
        assert_eq!((range.min, range.max), (1.0, 4.0));
        let filtered = state.filtered.as_ref().expect("filtered");
        assert_eq!(filtered.column_names(), vec!["a", "b"]);
        assert_eq!(filtered.n_rows(), 2);
    }

    #[test]
    fn clearing_the_file_drops_the_filter_quietly() {
        let (_dir, mut state) = session();
        state.apply(Action::SelectFile(Some("sample.csv".into())));
        state.apply(Action::SetFilterEnabled(true));

        state.apply(Action::SelectFile(None));
        assert!(state.notice.is_none());
        assert!(state.range_filter.is_none());
        assert!(state.filtered.is_none());

        state.apply(Action::SelectFile(Some("sample.csv".into())));
        state.apply(Action::SetDataDir(std::path::PathBuf::from("/nonexistent/data")));
        assert!(state.notice.is_none());
        assert!(state.filtered.is_none());
    }
}
