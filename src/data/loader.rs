use std::collections::BTreeSet;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Column, ColumnData, Table};

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// A file could not be turned into a [`Table`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    Unsupported(String),
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid delimited data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid parquet file: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("failed to read parquet data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("malformed input: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` / `.txt` – delimited text with a header row; the
///   delimiter is sniffed from the header line
/// * `.json`    – records-oriented array: `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat scalar columns (numeric, string, or bool)
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => load_delimited(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::Unsupported(other.to_string())),
    }
}

fn ensure_unique_headers(headers: &[String]) -> Result<(), LoadError> {
    let mut seen = BTreeSet::new();
    for h in headers {
        if !seen.insert(h.as_str()) {
            return Err(LoadError::Malformed(format!("duplicate column name '{h}'")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Pick the delimiter that splits the header line into the most fields.
/// Comma wins ties.
fn sniff_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = header_line.matches(',').count();
    for d in [b';', b'\t', b'|'] {
        let count = header_line.matches(d as char).count();
        if count > best_count {
            best = d;
            best_count = count;
        }
    }
    best
}

fn load_delimited(path: &Path) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let delimiter = sniff_delimiter(text.lines().next().unwrap_or(""));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Malformed("file has no header row".to_string()));
    }
    ensure_unique_headers(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(Table::from_rows(headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "day": 1, "temperature": 13.2, "station": "north" },
///   ...
/// ]
/// ```
///
/// Column order is the order keys are first seen in.
fn load_json(path: &Path) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".to_string()))?;

    let mut headers: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if seen.insert(key.clone()) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        return Err(LoadError::Malformed("JSON records have no columns".to_string()));
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|rec| {
            // Rows were checked to be objects above.
            let obj = rec.as_object();
            headers
                .iter()
                .map(|h| {
                    obj.and_then(|o| o.get(h))
                        .map(json_cell_text)
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    Ok(Table::from_rows(headers, rows))
}

fn json_cell_text(val: &JsonValue) -> String {
    match val {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a parquet file with flat scalar columns.
///
/// Float and integer columns become numeric, strings and booleans become
/// text.  Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    ensure_unique_headers(&names)?;

    let mut columns: Vec<Column> = Vec::with_capacity(names.len());
    for (name, field) in names.iter().zip(schema.fields()) {
        let data = match field.data_type() {
            DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32 => ColumnData::Numeric(Vec::new()),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Boolean => {
                ColumnData::Text(Vec::new())
            }
            other => {
                return Err(LoadError::Malformed(format!(
                    "unsupported parquet column type {other:?} for '{name}'"
                )));
            }
        };
        columns.push(Column {
            name: name.clone(),
            data,
        });
    }

    for batch_result in reader {
        let batch = batch_result?;
        for (idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(idx);
            match &mut column.data {
                ColumnData::Numeric(cells) => {
                    append_numeric_cells(array, &column.name, cells)?;
                }
                ColumnData::Text(cells) => {
                    append_text_cells(array, &column.name, cells)?;
                }
            }
        }
    }

    Ok(Table::new(columns))
}

// -- Arrow helpers --

fn downcast<'a, T: Array + 'static>(col: &'a ArrayRef, name: &str) -> Result<&'a T, LoadError> {
    col.as_any().downcast_ref::<T>().ok_or_else(|| {
        LoadError::Malformed(format!("column '{name}': unexpected arrow array type"))
    })
}

fn append_numeric_cells(
    col: &ArrayRef,
    name: &str,
    cells: &mut Vec<Option<f64>>,
) -> Result<(), LoadError> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = downcast::<Float64Array>(col, name)?;
            cells.extend(arr.iter());
        }
        DataType::Float32 => {
            let arr = downcast::<Float32Array>(col, name)?;
            cells.extend(arr.iter().map(|v| v.map(|f| f as f64)));
        }
        DataType::Int64 => {
            let arr = downcast::<Int64Array>(col, name)?;
            cells.extend(arr.iter().map(|v| v.map(|i| i as f64)));
        }
        DataType::Int32 => {
            let arr = downcast::<Int32Array>(col, name)?;
            cells.extend(arr.iter().map(|v| v.map(|i| i as f64)));
        }
        other => {
            return Err(LoadError::Malformed(format!(
                "column '{name}': expected numeric data, got {other:?}"
            )));
        }
    }
    Ok(())
}

fn append_text_cells(col: &ArrayRef, name: &str, cells: &mut Vec<String>) -> Result<(), LoadError> {
    match col.data_type() {
        DataType::Utf8 => {
            let arr = downcast::<StringArray>(col, name)?;
            cells.extend(arr.iter().map(|v| v.unwrap_or("").to_string()));
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            cells.extend(arr.iter().map(|v| v.unwrap_or("").to_string()));
        }
        DataType::Boolean => {
            let arr = downcast::<BooleanArray>(col, name)?;
            cells.extend(
                arr.iter()
                    .map(|v| v.map(|b| b.to_string()).unwrap_or_default()),
            );
        }
        other => {
            return Err(LoadError::Malformed(format!(
                "column '{name}': expected text data, got {other:?}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridplot-loader-{}-{name}", std::process::id()))
    }

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = temp_path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_comma_separated_csv() {
        let path = write_temp("basic.csv", "day,temp\n1,13.5\n2,14.0\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["day", "temp"]);
        assert_eq!(table.row_count(), 2);
        assert!(table.column("temp").unwrap().is_numeric());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn sniffs_semicolon_and_tab_delimiters() {
        let path = write_temp("semi.csv", "day;temp\n1;13.5\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["day", "temp"]);
        std::fs::remove_file(path).ok();

        let path = write_temp("tabs.tsv", "day\ttemp\n1\t13.5\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["day", "temp"]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_duplicate_headers() {
        let path = write_temp("dup.csv", "a,a\n1,2\n");
        assert!(matches!(load_file(&path), Err(LoadError::Malformed(_))));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_ragged_rows() {
        let path = write_temp("ragged.csv", "a,b\n1,2\n3,4,5\n");
        assert!(matches!(load_file(&path), Err(LoadError::Csv(_))));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_unknown_extension_and_missing_file() {
        let path = write_temp("notes.docx", "whatever");
        assert!(matches!(load_file(&path), Err(LoadError::Unsupported(_))));
        std::fs::remove_file(path).ok();

        assert!(matches!(
            load_file(&temp_path("does-not-exist.csv")),
            Err(LoadError::Io(_))
        ));
    }

    #[test]
    fn loads_records_oriented_json() {
        let path = write_temp(
            "records.json",
            r#"[{"day": 1, "temp": 13.5, "station": "north"},
                {"day": 2, "temp": 14.0, "station": "south"}]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.row_count(), 2);
        assert!(table.column("day").unwrap().is_numeric());
        assert!(!table.column("station").unwrap().is_numeric());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_non_array_json() {
        let path = write_temp("object.json", r#"{"day": 1}"#);
        assert!(matches!(load_file(&path), Err(LoadError::Malformed(_))));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn loads_flat_parquet_columns() {
        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;
        use std::sync::Arc;

        let schema = Arc::new(Schema::new(vec![
            Field::new("day", DataType::Int64, false),
            Field::new("temp", DataType::Float64, true),
            Field::new("station", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Float64Array::from(vec![Some(13.5), None])),
                Arc::new(StringArray::from(vec!["north", "south"])),
            ],
        )
        .unwrap();

        let path = temp_path("flat.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.row_count(), 2);
        let temp = table.column("temp").unwrap();
        assert!(temp.is_numeric());
        // The null cell is kept, so the full series is unavailable.
        assert_eq!(temp.as_series(), None);
        assert_eq!(temp.numeric_values(), Some(vec![13.5]));
        assert_eq!(table.column("station").unwrap().cell_text(1), "south");
        std::fs::remove_file(path).ok();
    }
}
