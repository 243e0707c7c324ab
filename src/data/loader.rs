use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, ColumnType, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, comma separated, types inferred per column
/// * `.json`    – `[{ "col": value, ... }, ...]` (records orientation)
/// * `.parquet` – Parquet file with scalar columns
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, saw {}",
                headers.len(),
                record.len()
            );
        }
        records.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    Ok(Table::from_records(&headers, &records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "date": "2024-01-01", "region": "north", "sales": 120.5 },
///   ...
/// ]
/// ```
///
/// Columns appear in the order their keys are first seen in the file; a key
/// missing from a record is a missing value.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .iter()
        .map(|name| {
            let cells: Vec<&JsonValue> = records
                .iter()
                .map(|rec| rec.get(name).unwrap_or(&JsonValue::Null))
                .collect();
            json_column(name, &cells)
        })
        .collect();

    Table::new(columns)
}

fn json_column(name: &str, cells: &[&JsonValue]) -> Column {
    let present = || cells.iter().filter(|v| !v.is_null());
    let dtype = if present().next().is_none() {
        ColumnType::Float
    } else if present().all(|v| v.is_i64()) {
        if present().count() == cells.len() {
            ColumnType::Integer
        } else {
            ColumnType::Float
        }
    } else if present().all(|v| v.is_number()) {
        ColumnType::Float
    } else if present().all(|v| v.is_boolean()) {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    };

    let values = cells
        .iter()
        .map(|v| match (dtype, v) {
            (_, JsonValue::Null) => CellValue::Null,
            (ColumnType::Integer, v) => v.as_i64().map(CellValue::Integer).unwrap_or(CellValue::Null),
            (ColumnType::Float, v) => v.as_f64().map(CellValue::Float).unwrap_or(CellValue::Null),
            (ColumnType::Boolean, v) => v.as_bool().map(CellValue::Bool).unwrap_or(CellValue::Null),
            (ColumnType::Text, JsonValue::String(s)) => CellValue::Text(s.clone()),
            (ColumnType::Text, other) => CellValue::Text(other.to_string()),
        })
        .collect();

    Column::new(name, dtype, values)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with scalar columns.
///
/// Integer columns of any width become `int64`, float columns `float64`,
/// booleans `bool`, strings `object`. Any other Arrow type is rendered to
/// text. Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let fields: Vec<(String, DataType)> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), f.data_type().clone()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); fields.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, (name, data_type)) in fields.iter().enumerate() {
            let array = batch.column(col_idx);
            let cells = arrow_cells(array, data_type)
                .with_context(|| format!("column '{name}'"))?;
            values[col_idx].extend(cells);
        }
    }

    let columns = fields
        .into_iter()
        .zip(values)
        .map(|((name, data_type), cells)| Column::new(name, arrow_column_type(&data_type), cells))
        .collect();

    Table::new(columns)
}

// -- Arrow helpers --

fn arrow_column_type(data_type: &DataType) -> ColumnType {
    if data_type.is_integer() {
        ColumnType::Integer
    } else if data_type.is_floating() {
        ColumnType::Float
    } else if *data_type == DataType::Boolean {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    }
}

/// Convert every row of an Arrow column to cells of the matching type.
fn arrow_cells(array: &ArrayRef, data_type: &DataType) -> Result<Vec<CellValue>> {
    let n = array.len();
    let cells = match arrow_column_type(data_type) {
        ColumnType::Integer => {
            let ints = cast(array, &DataType::Int64).context("casting to int64")?;
            let ints = ints.as_primitive::<Int64Type>();
            (0..n)
                .map(|i| {
                    if ints.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::Integer(ints.value(i))
                    }
                })
                .collect()
        }
        ColumnType::Float => {
            let floats = cast(array, &DataType::Float64).context("casting to float64")?;
            let floats = floats.as_primitive::<Float64Type>();
            (0..n)
                .map(|i| {
                    if floats.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::Float(floats.value(i))
                    }
                })
                .collect()
        }
        ColumnType::Boolean => {
            let bools = array.as_boolean();
            (0..n)
                .map(|i| {
                    if bools.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::Bool(bools.value(i))
                    }
                })
                .collect()
        }
        ColumnType::Text => (0..n)
            .map(|i| {
                if array.is_null(i) {
                    Ok(CellValue::Null)
                } else {
                    array_value_to_string(array, i)
                        .map(CellValue::Text)
                        .context("formatting value")
                }
            })
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_infers_types_and_keeps_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "sample.csv",
            "date,region,sales\n2024-01-03,north,30\n2024-01-01,south,10.5\n2024-01-02,east,\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names(), vec!["date", "region", "sales"]);
        assert_eq!(table.column("date").unwrap().dtype, ColumnType::Text);
        assert_eq!(table.column("sales").unwrap().dtype, ColumnType::Float);
        assert_eq!(table.cell(0, 0), &CellValue::Text("2024-01-03".into()));
        assert_eq!(table.cell(2, 2), &CellValue::Null);
    }

    #[test]
    fn csv_rejects_rows_with_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "a,b\n1,2,3\n");
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn json_records_become_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "rows.json",
            r#"[{"a": 1, "b": "x"}, {"a": 2, "b": "y", "c": true}]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("a").unwrap().dtype, ColumnType::Integer);
        assert_eq!(table.column("b").unwrap().dtype, ColumnType::Text);
        let c = table.column("c").unwrap();
        assert_eq!(c.dtype, ColumnType::Boolean);
        assert_eq!(c.values[0], CellValue::Null);
    }

    #[test]
    fn json_columns_keep_file_order() {
        use crate::chart::{ChartBody, PlotKind, render};

        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "grid.json",
            r#"[{"x": 1, "y": 1, "val": 5}, {"x": 2, "y": 1, "val": 7},
                {"x": 1, "y": 2, "val": 9}, {"x": 2, "y": 2, "val": 11}]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names(), vec!["x", "y", "val"]);

        // The heatmap takes its values from the third key.
        let chart = render(&table, "x", "y", PlotKind::Heatmap).unwrap();
        let ChartBody::Heatmap { value_range, .. } = chart.body else {
            panic!("expected heatmap");
        };
        assert_eq!(value_range, (5.0, 11.0));
    }

    #[test]
    fn parquet_scalar_columns_keep_their_types() {
        use std::sync::Arc;

        use arrow::array::{Float32Array, Int32Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("temp", DataType::Float32, true),
            Field::new("site", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![1, 2])),
                Arc::new(Float32Array::from(vec![Some(1.5), None])),
                Arc::new(StringArray::from(vec!["a", "b"])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None)
            .unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.column("id").unwrap().dtype, ColumnType::Integer);
        assert_eq!(table.cell(1, 0), &CellValue::Integer(2));
        assert_eq!(table.cell(0, 1), &CellValue::Float(1.5));
        assert_eq!(table.cell(1, 1), &CellValue::Null);
        assert_eq!(table.cell(1, 2), &CellValue::Text("b".into()));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "notes.txt", "hello");
        assert!(load_file(&path).is_err());
    }
}
