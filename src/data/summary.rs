//! Descriptive statistics for the numeric columns of a table.

use super::model::Table;

/// Row labels of the summary table, in display order.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Statistics for one numeric column. Every field except `count` is NaN
/// when the column has no values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1).
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Values in the order of [`STAT_LABELS`].
    pub fn stats(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }
}

/// Summary of a whole table: one entry per numeric column, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub columns: Vec<ColumnSummary>,
}

/// Quantile `q` in `[0, 1]` of sorted values, linearly interpolated.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = (sorted.len() - 1) as f64 * q;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; NaN below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

pub fn describe_values(name: &str, values: &[f64]) -> ColumnSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    ColumnSummary {
        name: name.to_string(),
        count: sorted.len(),
        mean: mean(&sorted),
        std: sample_std(&sorted),
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

/// Describe every numeric column of the table.
pub fn describe(table: &Table) -> Summary {
    Summary {
        columns: table
            .numeric_columns()
            .map(|c| describe_values(&c.name, &c.numeric_values()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Table};

    #[test]
    fn describes_one_to_five() {
        let table = Table::new(vec![Column::from_raw("v", &["1", "2", "3", "4", "5"])]).unwrap();
        let summary = describe(&table);
        let col = &summary.columns[0];
        assert_eq!(col.count, 5);
        assert_eq!(col.mean, 3.0);
        assert_eq!(col.min, 1.0);
        assert_eq!(col.max, 5.0);
        assert_eq!(col.q1, 2.0);
        assert_eq!(col.median, 3.0);
        assert_eq!(col.q3, 4.0);
        assert!((col.std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn skips_text_columns_and_missing_values() {
        let table = Table::new(vec![
            Column::from_raw("name", &["a", "b", "c"]),
            Column::from_raw("score", &["1.5", "", "2.5"]),
        ])
        .unwrap();
        let summary = describe(&table);
        assert_eq!(summary.columns.len(), 1);
        assert_eq!(summary.columns[0].name, "score");
        assert_eq!(summary.columns[0].count, 2);
        assert_eq!(summary.columns[0].mean, 2.0);
    }

    #[test]
    fn quantiles_interpolate() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert!(sample_std(&[1.0]).is_nan());
    }
}
