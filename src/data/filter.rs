use crate::error::{DashboardError, Result};

use super::model::Table;

// ---------------------------------------------------------------------------
// Global numeric range filter
// ---------------------------------------------------------------------------

/// Slider state for the range filter. One `[min, max]` pair applies to every
/// numeric column at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    /// Smallest numeric value in the table (slider lower limit).
    pub lower_limit: f64,
    /// Largest numeric value in the table (slider upper limit).
    pub upper_limit: f64,
    /// Current "Minimum Value" slider.
    pub min: f64,
    /// Current "Maximum Value" slider.
    pub max: f64,
}

impl RangeFilter {
    /// Compute the bounds of `table` and seed the sliders with them.
    pub fn for_table(table: &Table) -> Result<Self> {
        let (lo, hi) = global_bounds(table)?;
        Ok(RangeFilter {
            lower_limit: lo,
            upper_limit: hi,
            min: lo,
            max: hi,
        })
    }

    /// Set both sliders, each clamped to the table bounds.
    pub fn set_range(&mut self, min: f64, max: f64) {
        self.min = min.clamp(self.lower_limit, self.upper_limit);
        self.max = max.clamp(self.lower_limit, self.upper_limit);
    }
}

/// Minimum and maximum over all numeric cells of all numeric columns.
pub fn global_bounds(table: &Table) -> Result<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for col in table.numeric_columns() {
        for v in col.numeric_values() {
            bounds = Some(match bounds {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
    }
    bounds.ok_or(DashboardError::NoNumericColumns)
}

/// Return indices of rows whose numeric cells all lie in `[min, max]`.
///
/// A missing numeric cell fails the comparison, so its row is dropped.
/// Non-numeric columns never constrain a row.
pub fn filtered_indices(table: &Table, min: f64, max: f64) -> Vec<usize> {
    let numeric: Vec<_> = table.numeric_columns().collect();
    (0..table.n_rows())
        .filter(|&row| {
            numeric.iter().all(|col| match col.values[row].as_f64() {
                Some(v) => v >= min && v <= max,
                None => false,
            })
        })
        .collect()
}

/// The filtered table: every column of the rows that pass.
pub fn apply(table: &Table, min: f64, max: f64) -> Table {
    table.take_rows(&filtered_indices(table, min, max))
}
