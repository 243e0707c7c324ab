use crate::chart::PlotKind;

/// Warning shown when "Generate Plot" is pressed without a file.
pub const SELECT_FILE_WARNING: &str = "Please select a file";
/// Warning shown when a file is chosen but an axis is not.
pub const SELECT_AXES_WARNING: &str = "Please select both X-axis and Y-axis";

/// The user's current choices. Every field starts unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub file: Option<String>,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    pub plot_kind: Option<PlotKind>,
}

/// Outcome of checking a [`Selection`] before plotting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness<'a> {
    NeedsFile,
    NeedsAxes,
    /// Nothing to do; not reported to the user.
    NoPlotKind,
    Ready {
        file: &'a str,
        x: &'a str,
        y: &'a str,
        kind: PlotKind,
    },
}

impl Readiness<'_> {
    /// Warning text for the incomplete states that are reported.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Readiness::NeedsFile => Some(SELECT_FILE_WARNING),
            Readiness::NeedsAxes => Some(SELECT_AXES_WARNING),
            Readiness::NoPlotKind | Readiness::Ready { .. } => None,
        }
    }
}

impl Selection {
    /// Classify the selection. Checks run in priority order and stop at the
    /// first unmet condition.
    pub fn readiness(&self) -> Readiness<'_> {
        let Some(file) = self.file.as_deref() else {
            return Readiness::NeedsFile;
        };
        let (Some(x), Some(y)) = (self.x_column.as_deref(), self.y_column.as_deref()) else {
            return Readiness::NeedsAxes;
        };
        let Some(kind) = self.plot_kind else {
            return Readiness::NoPlotKind;
        };
        Readiness::Ready { file, x, y, kind }
    }

    /// Forget the axis choices, which belong to the previous file.
    pub fn clear_axes(&mut self) {
        self.x_column = None;
        self.y_column = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Selection {
        Selection {
            file: Some("sample.csv".into()),
            x_column: Some("date".into()),
            y_column: Some("sales".into()),
            plot_kind: Some(PlotKind::Line),
        }
    }

    #[test]
    fn missing_file_wins_over_everything() {
        let sel = Selection {
            file: None,
            ..full()
        };
        assert_eq!(sel.readiness(), Readiness::NeedsFile);
        assert_eq!(sel.readiness().warning(), Some("Please select a file"));
        assert_eq!(Selection::default().readiness(), Readiness::NeedsFile);
    }

    #[test]
    fn either_axis_missing_needs_axes() {
        for sel in [
            Selection { x_column: None, ..full() },
            Selection { y_column: None, ..full() },
            Selection { x_column: None, y_column: None, plot_kind: None, ..full() },
        ] {
            assert_eq!(sel.readiness(), Readiness::NeedsAxes);
            assert_eq!(
                sel.readiness().warning(),
                Some("Please select both X-axis and Y-axis")
            );
        }
    }

    #[test]
    fn missing_plot_kind_is_silent() {
        let sel = Selection { plot_kind: None, ..full() };
        assert_eq!(sel.readiness(), Readiness::NoPlotKind);
        assert_eq!(sel.readiness().warning(), None);
    }

    #[test]
    fn complete_selection_is_ready() {
        let sel = full();
        assert_eq!(
            sel.readiness(),
            Readiness::Ready {
                file: "sample.csv",
                x: "date",
                y: "sales",
                kind: PlotKind::Line,
            }
        );
    }
}
