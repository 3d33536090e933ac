use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Cell, LaunchRecord, LaunchTable, Outcome};

pub const SITE_COLUMN: &str = "Launch Site";
pub const PAYLOAD_COLUMN: &str = "Payload Mass (kg)";
pub const CLASS_COLUMN: &str = "class";
pub const BOOSTER_COLUMN: &str = "Booster Version Category";

/// Columns every input file must carry, in record field order.
pub const REQUIRED_COLUMNS: [&str; 4] = [SITE_COLUMN, PAYLOAD_COLUMN, CLASS_COLUMN, BOOSTER_COLUMN];

#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: outcome class must be 0 or 1, got '{value}'")]
    InvalidClass { row: usize, value: String },
    #[error("row {row}: payload mass '{value}' is not a number")]
    InvalidPayload { row: usize, value: String },
    #[error("row {row}: payload mass {value} is negative")]
    NegativePayload { row: usize, value: f64 },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming the required columns
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<LaunchTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading JSON {}", path.display()))?;
            read_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading launch data from {}", path.display()))?;

    log::debug!(
        "{}: {} records, sites {:?}",
        path.display(),
        table.len(),
        table.sites()
    );
    Ok(table)
}

/// Turn the four required cells of one row into a record.
fn record_from_cells(row: usize, [site, payload, class, booster]: [Cell; 4]) -> Result<LaunchRecord> {
    let outcome = Outcome::from_cell(&class).ok_or_else(|| LoadError::InvalidClass {
        row,
        value: class.to_string(),
    })?;

    let payload_kg = match &payload {
        Cell::Null => None,
        Cell::String(s) if s.trim().is_empty() => None,
        other => {
            let kg = other.as_f64().ok_or_else(|| LoadError::InvalidPayload {
                row,
                value: other.to_string(),
            })?;
            if kg < 0.0 {
                return Err(LoadError::NegativePayload { row, value: kg }.into());
            }
            // NaN from a float column counts as missing, like pandas.
            (!kg.is_nan()).then_some(kg)
        }
    };

    Ok(LaunchRecord {
        site: site.as_text(),
        payload_kg,
        outcome,
        booster_category: booster.as_text(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
/// Columns beyond the required four (flight number, booster version, ...)
/// are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<LaunchTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut indices = [0usize; 4];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = indices.map(|idx| guess_cell_type(record.get(idx).unwrap_or("").trim()));
        records.push(record_from_cells(row_no, cells)?);
    }

    Ok(LaunchTable::from_records(records))
}

fn guess_cell_type(s: &str) -> Cell {
    if s.is_empty() {
        return Cell::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Cell::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Cell::Float(f);
    }
    if s == "true" || s == "false" {
        return Cell::Bool(s == "true");
    }
    Cell::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "class": 0,
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
///
/// A key absent from every row is a missing column; a key absent from
/// some rows reads as null there.
pub fn read_json(text: &str) -> Result<LaunchTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        objects.push(obj);
    }

    for name in REQUIRED_COLUMNS {
        if !objects.iter().any(|obj| obj.contains_key(name)) {
            return Err(LoadError::MissingColumn(name.to_string()).into());
        }
    }

    let mut records = Vec::with_capacity(objects.len());
    for (i, obj) in objects.into_iter().enumerate() {
        let cells = REQUIRED_COLUMNS.map(|name| obj.get(name).map(json_to_cell).unwrap_or(Cell::Null));
        records.push(record_from_cells(i, cells)?);
    }

    Ok(LaunchTable::from_records(records))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing launch records.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), as well as the `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<LaunchTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let mut indices = [0usize; 4];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = schema
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
    }

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_no = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns: Vec<&Arc<dyn Array>> = indices.iter().map(|&i| batch.column(i)).collect();

        for row in 0..batch.num_rows() {
            let cells = [0, 1, 2, 3].map(|c| extract_cell(columns[c], row));
            records.push(record_from_cells(row_no, cells)?);
            row_no += 1;
        }
    }

    Ok(LaunchTable::from_records(records))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => match any.downcast_ref::<StringArray>() {
            Some(s) => Cell::String(s.value(row).to_string()),
            None => Cell::Null,
        },
        DataType::LargeUtf8 => Cell::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(Cell::Null, |a| Cell::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(Cell::Null, |a| Cell::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(Cell::Null, |a| Cell::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(Cell::Null, |a| Cell::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(Cell::Null, |a| Cell::Bool(a.value(row))),
        other => Cell::String(format!("{other:?}")),
    }
}
