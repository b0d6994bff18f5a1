//! Export daily rows to CSV.
//!
//! Columns are the weekly table's headers (after renaming) followed by `Fecha`. Every
//! daily row repeats its weekly row's cells, with the two quantity columns replaced by
//! the per-day values.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::domain::{DailyRecord, WeeklyTable};
use crate::error::CoreError;
use crate::io::schema::COL_DATE;

/// Write daily rows to a CSV file. Returns the number of data rows written.
pub fn write_daily_csv(path: &Path, table: &WeeklyTable, daily: &[DailyRecord]) -> Result<usize, CoreError> {
    let file = File::create(path)
        .map_err(|e| CoreError::io(format!("Failed to create output CSV '{}'", path.display()), e))?;
    let written = write_daily(file, table, daily)?;
    debug!(path = %path.display(), rows = written, "wrote daily CSV");
    Ok(written)
}

/// Write daily rows as CSV to any writer.
pub fn write_daily<W: Write>(writer: W, table: &WeeklyTable, daily: &[DailyRecord]) -> Result<usize, CoreError> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    header.push(COL_DATE);
    out.write_record(&header)?;

    let width = table.headers.len();
    let cols = table.columns;
    let mut row: Vec<String> = Vec::with_capacity(width + 1);

    for d in daily {
        let source = table.records.get(d.source).ok_or_else(|| CoreError::Csv {
            message: format!("daily row refers to missing weekly row {}", d.source),
        })?;

        row.clear();
        row.extend((0..width).map(|i| source.cells.get(i).cloned().unwrap_or_default()));
        row[cols.unit_sales] = format_quantity(d.unit_sales);
        row[cols.revenue] = format_quantity(d.revenue);
        row.push(d.date.format("%Y-%m-%d").to_string());

        out.write_record(&row)?;
    }

    out.flush()
        .map_err(|e| CoreError::io("Failed to flush output CSV", e))?;
    Ok(daily.len())
}

/// Shortest round-trip form, always with a decimal point (`10.0`, `23.333333333333332`).
pub fn format_quantity(v: f64) -> String {
    format!("{v:?}")
}
