use std::collections::HashMap;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RawTable};
use super::normalize::normalize_header;
use crate::error::DataLoadError;

/// Reader options that are not implied by the file itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Field delimiter for delimited text. `None` means sniff it.
    pub delimiter: Option<u8>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a listings source into a [`RawTable`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` / `.txt` – delimited text with one header row
/// * `.json`                  – `[{ "make": "...", "sale_price": 450000, ... }, ...]`
/// * `.parquet` / `.pq`       – flat columns of strings, numbers or booleans
///
/// Header names come back normalized; cell values are not coerced here.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<RawTable, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => load_delimited(path, options.delimiter),
        "tsv" => load_delimited(path, Some(b'\t')),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, DataLoadError> {
    std::fs::read(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one listing per line. Short rows are
/// allowed; their trailing cells read as missing.
fn load_delimited(path: &Path, delimiter: Option<u8>) -> Result<RawTable, DataLoadError> {
    let bytes = read_bytes(path)?;
    parse_delimited(&bytes, delimiter)
}

pub(crate) fn parse_delimited(
    bytes: &[u8],
    delimiter: Option<u8>,
) -> Result<RawTable, DataLoadError> {
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(bytes));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| DataLoadError::Csv { row: 0, source })?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|source| DataLoadError::Csv {
            row: row_no + 1,
            source,
        })?;
        rows.push(
            record
                .iter()
                .map(|value| CellValue::Text(value.to_string()))
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

/// Pick tab or comma from the header line. Exports of the listings dataset
/// are tab-separated even when named `.csv`.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or(&[]);
    let tabs = header.iter().filter(|b| **b == b'\t').count();
    let commas = header.iter().filter(|b| **b == b',').count();
    if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "make": "Honda", "model": "City", "yr_mfr": 2018,
///     "fuel_type": "Petrol", "sale_price": 333333, "kms_run": 32187 },
///   ...
/// ]
/// ```
///
/// The column set is the union of all keys in first-seen order.
fn load_json(path: &Path) -> Result<RawTable, DataLoadError> {
    let bytes = read_bytes(path)?;
    parse_json(&bytes)
}

pub(crate) fn parse_json(bytes: &[u8]) -> Result<RawTable, DataLoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected a top-level JSON array".into()))?;

    let mut headers: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut keyed_rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::Malformed(format!("record {i} is not a JSON object")))?;

        let mut cells = Vec::with_capacity(obj.len());
        for (key, val) in obj {
            let name = normalize_header(key);
            let idx = *positions.entry(name.clone()).or_insert_with(|| {
                headers.push(name);
                headers.len() - 1
            });
            cells.push((idx, json_to_cell(val)));
        }
        keyed_rows.push(cells);
    }

    let rows = keyed_rows
        .into_iter()
        .map(|cells| {
            let mut row = vec![CellValue::Null; headers.len()];
            for (idx, cell) in cells {
                row[idx] = cell;
            }
            row
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of listings. Every column becomes a table column;
/// works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<RawTable, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| normalize_header(f.name()))
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue, DataLoadError> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => CellValue::Text(array_value_to_string(col, row)?),
    };
    Ok(cell)
}
