use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, one per (row, column).
/// Category grouping uses `BTreeMap` / `HashMap` keys, so `CellValue` must be
/// `Ord` and `Hash`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so cells can be used as category keys --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            // Mixed integer / float compare numerically.
            (a, b) => {
                let fa = a.as_f64().unwrap_or(f64::NAN);
                let fb = b.as_f64().unwrap_or(f64::NAN);
                fa.partial_cmp(&fb).unwrap_or_else(|| fa.total_cmp(&fb))
            }
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            // -0.0 == 0.0, so both must hash alike.
            CellValue::Float(f) => (if *f == 0.0 { 0.0_f64 } else { *f }).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`. Only integers and floats qualify.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnType – inferred per column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    /// Integer and Float are numeric; booleans are not.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Boolean => "bool",
            ColumnType::Text => "object",
        };
        f.write_str(name)
    }
}

/// Tokens read as missing values.
const NA_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

fn is_na_token(s: &str) -> bool {
    NA_TOKENS.contains(&s.trim())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Infer the type of a column of raw text cells.
///
/// An integer column containing missing cells is promoted to float, and a
/// column with no values at all is float.
pub fn infer_column_type<'a>(raw: impl IntoIterator<Item = &'a str> + Clone) -> ColumnType {
    let present = || raw.clone().into_iter().filter(|s| !is_na_token(s));
    let has_missing = raw.clone().into_iter().any(is_na_token);

    if present().next().is_none() {
        return ColumnType::Float;
    }
    if present().all(|s| s.trim().parse::<i64>().is_ok()) {
        return if has_missing {
            ColumnType::Float
        } else {
            ColumnType::Integer
        };
    }
    if present().all(|s| s.trim().parse::<f64>().is_ok()) {
        return ColumnType::Float;
    }
    if present().all(|s| parse_bool(s).is_some()) {
        return ColumnType::Boolean;
    }
    ColumnType::Text
}

/// Convert a raw cell to a value of an already inferred column type.
pub fn parse_cell(s: &str, dtype: ColumnType) -> CellValue {
    if is_na_token(s) {
        return CellValue::Null;
    }
    let t = s.trim();
    match dtype {
        ColumnType::Integer => t
            .parse::<i64>()
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Null),
        ColumnType::Float => t
            .parse::<f64>()
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        ColumnType::Boolean => parse_bool(t).map(CellValue::Bool).unwrap_or(CellValue::Null),
        ColumnType::Text => CellValue::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// One named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Build a column from raw text cells, inferring its type.
    pub fn from_raw(name: impl Into<String>, raw: &[&str]) -> Self {
        let dtype = infer_column_type(raw.iter().copied());
        let values = raw.iter().map(|s| parse_cell(s, dtype)).collect();
        Column::new(name, dtype, values)
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    /// Non-null numeric values, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// An in-memory table loaded from one file: ordered columns, rows in file
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Assemble a table from columns of equal length.
    pub fn new(columns: Vec<Column>) -> anyhow::Result<Self> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            anyhow::bail!(
                "column '{}' has {} rows, expected {n_rows}",
                bad.name,
                bad.len()
            );
        }
        Ok(Table { columns, n_rows })
    }

    /// Build a table from a header row and raw text records, inferring the
    /// type of every column. Short records are padded with missing values.
    pub fn from_records(headers: &[String], records: &[Vec<String>]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let raw: Vec<&str> = records
                    .iter()
                    .map(|r| r.get(idx).map(String::as_str).unwrap_or(""))
                    .collect();
                Column::from_raw(name.clone(), &raw)
            })
            .collect();
        Table {
            columns,
            n_rows: records.len(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// A new table holding the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let values = rows.iter().map(|&r| c.values[r].clone()).collect();
                Column::new(c.name.clone(), c.dtype, values)
            })
            .collect();
        Table {
            columns,
            n_rows: rows.len(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let rows: Vec<usize> = (0..self.n_rows.min(n)).collect();
        self.take_rows(&rows)
    }

    /// Cell at (row, column index).
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        &self.columns[col].values[row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_pandas_like_types() {
        assert_eq!(infer_column_type(["1", "2", "3"]), ColumnType::Integer);
        assert_eq!(infer_column_type(["1", "", "3"]), ColumnType::Float);
        assert_eq!(infer_column_type(["1.5", "2"]), ColumnType::Float);
        assert_eq!(infer_column_type(["True", "false"]), ColumnType::Boolean);
        assert_eq!(infer_column_type(["a", "1"]), ColumnType::Text);
        assert_eq!(infer_column_type(["", "NA"]), ColumnType::Float);
    }

    #[test]
    fn booleans_are_not_numeric() {
        let col = Column::from_raw("flag", &["true", "false"]);
        assert_eq!(col.dtype, ColumnType::Boolean);
        assert!(!col.is_numeric());
        assert!(col.numeric_values().is_empty());
    }

    #[test]
    fn from_records_pads_short_rows() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let records = vec![
            vec!["1".to_string(), "x".to_string()],
            vec!["2".to_string()],
        ];
        let table = Table::from_records(&headers, &records);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.cell(1, 1), &CellValue::Null);
        assert_eq!(table.column("a").map(|c| c.dtype), Some(ColumnType::Integer));
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let a = Column::new("a", ColumnType::Integer, vec![CellValue::Integer(1)]);
        let b = Column::new("b", ColumnType::Integer, vec![]);
        assert!(Table::new(vec![a, b]).is_err());
    }

    #[test]
    fn head_and_take_rows_keep_order() {
        let col = Column::from_raw("v", &["10", "20", "30", "40"]);
        let table = Table::new(vec![col]).unwrap();
        assert_eq!(table.head(2).n_rows(), 2);
        let picked = table.take_rows(&[3, 1]);
        assert_eq!(picked.cell(0, 0), &CellValue::Integer(40));
        assert_eq!(picked.cell(1, 0), &CellValue::Integer(20));
    }

    #[test]
    fn signed_zeros_are_one_key() {
        use std::collections::HashSet;

        let keys: HashSet<CellValue> = [CellValue::Float(0.0), CellValue::Float(-0.0)]
            .into_iter()
            .collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(
            CellValue::Float(0.0).cmp(&CellValue::Float(-0.0)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn mixed_numeric_cells_order_by_value() {
        assert!(CellValue::Integer(2) > CellValue::Float(1.5));
        assert!(CellValue::Null < CellValue::Integer(0));
    }
}
