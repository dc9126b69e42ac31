use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

use crate::analysis::SummaryTable;

// ---------------------------------------------------------------------------
// Columnar view of a summary table
// ---------------------------------------------------------------------------

/// Convert a summary into an Arrow batch: the key column (Utf8) followed by
/// every metric present on any row. Counts are Int64, everything else Float64;
/// rows missing a metric are null.
pub fn to_record_batch(table: &SummaryTable) -> Result<RecordBatch> {
    let mut fields = vec![Field::new(table.key_column.as_str(), DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from_iter_values(
        table.rows.iter().map(|r| r.key.as_str()),
    ))];

    for metric in table.metrics() {
        let values = table.rows.iter().map(|r| r.value(metric));
        if metric.is_count() {
            fields.push(Field::new(metric.label(), DataType::Int64, true));
            let column: Int64Array = values.map(|v| v.map(|n| n as i64)).collect();
            arrays.push(Arc::new(column));
        } else {
            fields.push(Field::new(metric.label(), DataType::Float64, true));
            let column: Float64Array = values.collect();
            arrays.push(Arc::new(column));
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .with_context(|| format!("building record batch for '{}'", table.key_column))
}

/// Render as an ASCII table.
pub fn pretty_format(table: &SummaryTable) -> Result<String> {
    let batch = to_record_batch(table)?;
    Ok(pretty_format_batches(&[batch])
        .context("formatting summary table")?
        .to_string())
}

/// Write the summary as a Parquet file.
pub fn write_parquet(table: &SummaryTable, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Write the summary as CSV with a header row; missing metrics are empty cells.
pub fn write_csv<W: Write>(table: &SummaryTable, out: W) -> Result<()> {
    let metrics = table.metrics();
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![table.key_column.clone()];
    header.extend(metrics.iter().map(|m| m.label().to_string()));
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.key.clone()];
        for &metric in &metrics {
            record.push(match row.value(metric) {
                Some(v) if metric.is_count() => format!("{}", v as i64),
                Some(v) => format!("{v}"),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing csv output")?;
    Ok(())
}

/// Serialize as pretty JSON.
pub fn to_json(table: &SummaryTable) -> Result<String> {
    serde_json::to_string_pretty(table).context("serializing summary table")
}
