use std::collections::{BTreeMap, BTreeSet};

use crate::error::{DashboardError, Result};

use super::model::{CellValue, Table};

/// A row-by-column grid of aggregated values. Cells without any source row
/// hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Sorted distinct values of the index column (grid rows).
    pub row_labels: Vec<String>,
    /// Sorted distinct values of the columns column (grid columns).
    pub col_labels: Vec<String>,
    /// `values[row][col]`.
    pub values: Vec<Vec<f64>>,
}

impl Grid {
    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Finite minimum and maximum of the grid, if any cell is set.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Pivot `values` into an `index` × `columns` grid, averaging duplicates.
///
/// Rows with a missing key or value are skipped. Labels are sorted.
pub fn pivot_mean(table: &Table, index: &str, columns: &str, values: &str) -> Result<Grid> {
    let index_col = table
        .column(index)
        .ok_or_else(|| DashboardError::ColumnNotFound(index.to_string()))?;
    let columns_col = table
        .column(columns)
        .ok_or_else(|| DashboardError::ColumnNotFound(columns.to_string()))?;
    let value_col = table
        .column(values)
        .ok_or_else(|| DashboardError::ColumnNotFound(values.to_string()))?;
    if !value_col.is_numeric() {
        return Err(DashboardError::TypeMismatch {
            column: values.to_string(),
            expected: "numeric",
        });
    }

    let mut sums: BTreeMap<(&CellValue, &CellValue), (f64, usize)> = BTreeMap::new();
    let mut row_keys: BTreeSet<&CellValue> = BTreeSet::new();
    let mut col_keys: BTreeSet<&CellValue> = BTreeSet::new();

    for row in 0..table.n_rows() {
        let r = &index_col.values[row];
        let c = &columns_col.values[row];
        let Some(v) = value_col.values[row].as_f64() else {
            continue;
        };
        if r.is_null() || c.is_null() {
            continue;
        }
        row_keys.insert(r);
        col_keys.insert(c);
        let entry = sums.entry((r, c)).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }

    let values = row_keys
        .iter()
        .map(|r| {
            col_keys
                .iter()
                .map(|c| match sums.get(&(*r, *c)) {
                    Some((sum, n)) => sum / *n as f64,
                    None => f64::NAN,
                })
                .collect()
        })
        .collect();

    Ok(Grid {
        row_labels: row_keys.iter().map(|v| v.to_string()).collect(),
        col_labels: col_keys.iter().map(|v| v.to_string()).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn readings() -> Table {
        Table::new(vec![
            Column::from_raw("x", &["2", "1", "1", "2", "1"]),
            Column::from_raw("y", &["b", "a", "b", "a", "a"]),
            Column::from_raw("z", &["4", "1", "3", "2", "5"]),
        ])
        .unwrap()
    }

    #[test]
    fn pivots_with_sorted_labels_and_mean() {
        let grid = pivot_mean(&readings(), "y", "x", "z").unwrap();
        assert_eq!(grid.row_labels, vec!["a", "b"]);
        assert_eq!(grid.col_labels, vec!["1", "2"]);
        // (a, 1) averages 1 and 5.
        assert_eq!(grid.values, vec![vec![3.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(grid.value_range(), Some((2.0, 4.0)));
    }

    #[test]
    fn missing_combinations_are_nan() {
        let table = Table::new(vec![
            Column::from_raw("x", &["1", "2"]),
            Column::from_raw("y", &["a", "b"]),
            Column::from_raw("z", &["1", "2"]),
        ])
        .unwrap();
        let grid = pivot_mean(&table, "y", "x", "z").unwrap();
        assert!(grid.values[0][1].is_nan());
        assert!(grid.values[1][0].is_nan());
    }

    #[test]
    fn text_values_are_rejected() {
        let err = pivot_mean(&readings(), "x", "z", "y").unwrap_err();
        assert!(matches!(err, DashboardError::TypeMismatch { .. }));
    }
}
