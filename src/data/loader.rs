use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::encoding::{decode_with_fallback, TextEncoding};
use super::model::{columns, RawSalesRecord, SalesRecord, SalesTable, SCHEMA};
use crate::error::{LoadError, Result};

/// Date layouts accepted for "Order Date" / "Ship Date", month-first.
/// `%m/%d/%y` comes first: `%Y` would otherwise read "21" as the year 21.
const DATE_FORMATS: [&str; 5] = ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y", "%Y/%m/%d"];

/// Parsed years below this are treated as malformed rather than ancient.
const MIN_YEAR: i32 = 1000;

/// Date-time layouts whose date part is kept.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the sales table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the superstore column names (default)
/// * `.json`    – `[{ "Order ID": "...", "Sales": 12.5, ... }, ...]`
/// * `.parquet` – one column per field; dates as text or `Date32`
///
/// A missing file yields [`LoadError::SourceNotFound`].
pub fn load_file(path: &Path) -> Result<SalesTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "loaded {} rows ({} columns) from {}",
        table.len(),
        table.column_names().len(),
        path.display()
    );
    Ok(table)
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| not_found_or_io(path, e))
}

fn not_found_or_io(path: &Path, e: std::io::Error) -> LoadError {
    if e.kind() == std::io::ErrorKind::NotFound {
        LoadError::SourceNotFound {
            path: path.to_path_buf(),
        }
    } else {
        LoadError::Io(e)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<SalesTable> {
    let bytes = read_source(path)?;
    let (table, encoding) = load_csv_bytes(&bytes)?;
    info!("decoded {} as {encoding}", path.display());
    Ok(table)
}

/// Decode raw CSV bytes through the encoding fallback chain and parse them.
/// Returns the encoding that was used.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<(SalesTable, TextEncoding)> {
    let (text, encoding) = decode_with_fallback(bytes);
    let table = parse_csv(&text)?;
    Ok((table, encoding))
}

/// Parse already-decoded CSV text.
pub fn parse_csv(text: &str) -> Result<SalesTable> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let column_names: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    require_columns(&column_names)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let raw: RawSalesRecord = record.deserialize(Some(&headers))?;
        records.push(attach_dates(raw, row_no + 1)?);
    }

    Ok(SalesTable::with_columns(records, column_names))
}

fn require_columns(column_names: &[String]) -> Result<()> {
    match SCHEMA
        .iter()
        .find(|required| !column_names.iter().any(|c| c == *required))
    {
        Some(missing) => Err(LoadError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Order ID": "CA-2016-152156",
///     "Order Date": "11/8/2016",
///     "Sales": 261.96,
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<SalesTable> {
    let bytes = read_source(path)?;
    parse_json(&bytes)
}

/// Parse a records-oriented JSON array.
pub fn parse_json(bytes: &[u8]) -> Result<SalesTable> {
    let root: Vec<JsonValue> = serde_json::from_slice(bytes)?;

    let column_names: Vec<String> = match root.first().and_then(|r| r.as_object()) {
        Some(obj) => obj.keys().cloned().collect(),
        None => SCHEMA.iter().map(|c| c.to_string()).collect(),
    };
    if !root.is_empty() {
        require_columns(&column_names)?;
    }

    let mut records = Vec::with_capacity(root.len());
    for (i, value) in root.into_iter().enumerate() {
        let raw: RawSalesRecord = serde_json::from_value(value)?;
        records.push(attach_dates(raw, i + 1)?);
    }

    Ok(SalesTable::with_columns(records, column_names))
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

fn attach_dates(raw: RawSalesRecord, row: usize) -> Result<SalesRecord> {
    let order_date = parse_date_cell(&raw.order_date, row, columns::ORDER_DATE)?;
    let ship_date = parse_date_cell(&raw.ship_date, row, columns::SHIP_DATE)?;
    Ok(raw.with_dates(order_date, ship_date))
}

fn parse_date_cell(value: &str, row: usize, column: &'static str) -> Result<NaiveDate> {
    parse_sales_date(value).ok_or_else(|| LoadError::MalformedDate {
        row,
        column,
        value: value.to_string(),
    })
}

/// Parse a date cell in any of the accepted layouts. Four-digit layouts
/// yielding a year below 1000 are rejected.
pub fn parse_sales_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .chain(
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date()),
        )
        .find(|date| date.year() >= MIN_YEAR)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per schema field.
///
/// Text columns may be Utf8 or LargeUtf8 (other types are cast to text),
/// numeric columns any integer/float type, and date columns either a
/// native date/timestamp type or text in one of the accepted layouts.
fn load_parquet(path: &Path) -> Result<SalesTable> {
    let file = std::fs::File::open(path).map_err(|e| not_found_or_io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    require_columns(&column_names)?;

    let reader = builder.build()?;
    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        debug!("parquet batch with {} rows", batch.num_rows());
        append_batch(&batch, &mut records)?;
    }

    Ok(SalesTable::with_columns(records, column_names))
}

/// Convert one record batch into rows, numbering rows after `records`.
pub fn append_batch(batch: &RecordBatch, records: &mut Vec<SalesRecord>) -> Result<()> {
    let text = |name: &str| -> Result<ArrayRef> {
        Ok(cast(&column(batch, name)?, &DataType::Utf8)?)
    };
    let float = |name: &str| -> Result<ArrayRef> {
        Ok(cast(&column(batch, name)?, &DataType::Float64)?)
    };

    let order_id = text(columns::ORDER_ID)?;
    let ship_mode = text(columns::SHIP_MODE)?;
    let customer_id = text(columns::CUSTOMER_ID)?;
    let customer_name = text(columns::CUSTOMER_NAME)?;
    let segment = text(columns::SEGMENT)?;
    let country = text(columns::COUNTRY)?;
    let city = text(columns::CITY)?;
    let state = text(columns::STATE)?;
    let region = text(columns::REGION)?;
    let product_id = text(columns::PRODUCT_ID)?;
    let category = text(columns::CATEGORY)?;
    let sub_category = text(columns::SUB_CATEGORY)?;
    let product_name = text(columns::PRODUCT_NAME)?;
    let sales = float(columns::SALES)?;
    let discount = float(columns::DISCOUNT)?;
    let profit = float(columns::PROFIT)?;
    let quantity = cast(&column(batch, columns::QUANTITY)?, &DataType::Int64)?;
    let order_date = DateColumn::new(column(batch, columns::ORDER_DATE)?)?;
    let ship_date = DateColumn::new(column(batch, columns::SHIP_DATE)?)?;

    let offset = records.len();
    for i in 0..batch.num_rows() {
        let row = offset + i + 1;
        records.push(SalesRecord {
            order_id: string_at(&order_id, i),
            order_date: order_date.date_at(i, row, columns::ORDER_DATE)?,
            ship_date: ship_date.date_at(i, row, columns::SHIP_DATE)?,
            ship_mode: string_at(&ship_mode, i),
            customer_id: string_at(&customer_id, i),
            customer_name: string_at(&customer_name, i),
            segment: string_at(&segment, i),
            country: string_at(&country, i),
            city: string_at(&city, i),
            state: string_at(&state, i),
            region: string_at(&region, i),
            product_id: string_at(&product_id, i),
            category: string_at(&category, i),
            sub_category: string_at(&sub_category, i),
            product_name: string_at(&product_name, i),
            sales: f64_at(&sales, i),
            quantity: i64_at(&quantity, i),
            discount: f64_at(&discount, i),
            profit: f64_at(&profit, i),
        });
    }
    Ok(())
}

// -- Parquet / Arrow helpers --

fn column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    batch
        .column_by_name(name)
        .cloned()
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

/// Null text cells read as empty strings so they show up as missing values.
fn string_at(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    col.as_string::<i32>().value(row).to_string()
}

/// Null numeric cells read as `None`, like an empty CSV cell.
fn f64_at(col: &ArrayRef, i: usize) -> Option<f64> {
    col.is_valid(i).then(|| col.as_primitive::<Float64Type>().value(i))
}

fn i64_at(col: &ArrayRef, i: usize) -> Option<i64> {
    col.is_valid(i).then(|| col.as_primitive::<Int64Type>().value(i))
}

/// A date column, either native (`Date32` after casting) or text.
enum DateColumn {
    Native(ArrayRef),
    Text(ArrayRef),
}

impl DateColumn {
    fn new(col: ArrayRef) -> Result<Self> {
        match col.data_type() {
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                Ok(DateColumn::Native(cast(&col, &DataType::Date32)?))
            }
            _ => Ok(DateColumn::Text(cast(&col, &DataType::Utf8)?)),
        }
    }

    fn date_at(&self, i: usize, row: usize, column: &'static str) -> Result<NaiveDate> {
        let malformed = |value: String| LoadError::MalformedDate { row, column, value };
        match self {
            DateColumn::Native(arr) => {
                if arr.is_null(i) {
                    return Err(malformed(String::new()));
                }
                arr.as_primitive::<Date32Type>()
                    .value_as_date(i)
                    .ok_or_else(|| malformed(arr.as_primitive::<Date32Type>().value(i).to_string()))
            }
            DateColumn::Text(arr) => {
                let value = string_at(arr, i);
                parse_sales_date(&value).ok_or_else(|| malformed(value))
            }
        }
    }
}
