//! CSV ingest and normalization.
//!
//! This module turns a weekly sales report into a `WeeklyTable`:
//!
//! - **Decoding**: UTF-8 or Latin-1 (the report tool exports Latin-1)
//! - **Schema**: header cleanup, long/short detection, rename, required columns
//! - **Row validation**: per `InvalidRowPolicy` (fail, skip and report, or tolerate)
//!
//! No calendar or expansion logic lives here.

use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::calendar::{resolve_sunday, validate_iso_week, validate_month};
use crate::domain::{ColumnIndex, InputEncoding, InvalidRowPolicy, RowError, WeeklyRecord, WeeklyTable};
use crate::error::{CalendarError, CoreError};
use crate::io::schema::{
    COL_MONTH, COL_PRODUCT, COL_REVENUE, COL_STORE, COL_UNIT_SALES, COL_WEEK, COL_YEAR, apply_schema,
    dedupe_headers, detect_schema, locate_columns, normalize_header_name,
};

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub encoding: InputEncoding,
    pub invalid_rows: InvalidRowPolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            encoding: InputEncoding::Auto,
            invalid_rows: InvalidRowPolicy::Error,
        }
    }
}

/// Ingest output: the parsed table plus what happened to the rows.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: WeeklyTable,
    /// Concrete decoding that was applied (never `Auto`).
    pub encoding: InputEncoding,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Why a row could not be used as-is.
enum RowProblem {
    Malformed(String),
    Calendar(CalendarError),
}

/// Load a weekly sales CSV from disk.
pub fn load_weekly_file(path: &Path, options: IngestOptions) -> Result<IngestedTable, CoreError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CoreError::io(format!("Failed to open CSV '{}'", path.display()), e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "read input file");
    load_weekly_bytes(&bytes, options)
}

/// Load a weekly sales CSV from raw bytes.
pub fn load_weekly_bytes(bytes: &[u8], options: IngestOptions) -> Result<IngestedTable, CoreError> {
    let (text, encoding) = decode_input(bytes, options.encoding)?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers: Vec<String> = reader.headers()?.iter().map(normalize_header_name).collect();
    let headers = dedupe_headers(raw_headers);
    let schema = detect_schema(&headers);
    let headers = apply_schema(schema, headers);
    debug!(?schema, ?encoding, columns = headers.len(), "detected header schema");

    let columns = locate_columns(&headers)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| RowProblem::Malformed(format!("CSV parse error: {e}")))
            .and_then(|record| parse_row(&record, &columns, line).map_err(RowProblem::Malformed))
            .and_then(|row| check_calendar(&row, options.invalid_rows).map(|()| row));

        match parsed {
            Ok(row) => records.push(row),
            Err(problem) => {
                let err = match problem {
                    RowProblem::Malformed(message) => CoreError::MalformedRow { line, message },
                    RowProblem::Calendar(source) => CoreError::InvalidCalendarInput { line, source },
                };
                if options.invalid_rows == InvalidRowPolicy::Error {
                    return Err(err);
                }
                warn!(line, error = %err, "skipping weekly row");
                row_errors.push(RowError {
                    line,
                    message: err.to_string(),
                });
            }
        }
    }

    let rows_used = records.len();
    debug!(rows_read, rows_used, skipped = row_errors.len(), "ingested weekly rows");

    Ok(IngestedTable {
        table: WeeklyTable {
            schema,
            headers,
            columns,
            records,
        },
        encoding,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Decode input bytes, returning the text and the decoding actually applied.
pub fn decode_input(bytes: &[u8], encoding: InputEncoding) -> Result<(String, InputEncoding), CoreError> {
    match encoding {
        InputEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(|s| (s.to_string(), InputEncoding::Utf8))
            .map_err(|e| CoreError::Encoding {
                message: format!("UTF-8: {e}"),
            }),
        InputEncoding::Latin1 => Ok((decode_latin1(bytes), InputEncoding::Latin1)),
        InputEncoding::Auto => match std::str::from_utf8(bytes) {
            Ok(s) => Ok((s.to_string(), InputEncoding::Utf8)),
            Err(_) => Ok((decode_latin1(bytes), InputEncoding::Latin1)),
        },
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    // ISO-8859-1 maps each byte to the code point of the same value.
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn parse_row(record: &StringRecord, columns: &ColumnIndex, line: usize) -> Result<WeeklyRecord, String> {
    let year = parse_int(get_required(record, columns.year, COL_YEAR)?, COL_YEAR)?;
    let month = parse_int(get_required(record, columns.month, COL_MONTH)?, COL_MONTH)?;
    let week = parse_int(get_required(record, columns.week, COL_WEEK)?, COL_WEEK)?;

    let store_id = get_required(record, columns.store, COL_STORE)?.to_string();
    let product_id = get_required(record, columns.product, COL_PRODUCT)?.to_string();

    let unit_sales = parse_quantity(record.get(columns.unit_sales), COL_UNIT_SALES)?;
    let revenue = parse_quantity(record.get(columns.revenue), COL_REVENUE)?;

    Ok(WeeklyRecord {
        line,
        year,
        week,
        month,
        store_id,
        product_id,
        unit_sales,
        revenue,
        cells: record.iter().map(str::to_string).collect(),
    })
}

fn check_calendar(row: &WeeklyRecord, policy: InvalidRowPolicy) -> Result<(), RowProblem> {
    // An unknown month leaves nothing to clip against, under any policy.
    validate_month(row.month).map_err(RowProblem::Calendar)?;

    match validate_iso_week(row.year, row.week) {
        Ok(()) => {}
        Err(err @ CalendarError::WeekOutOfRange { .. }) if policy == InvalidRowPolicy::Tolerate => {
            debug!(line = row.line, error = %err, "keeping row with out-of-range week");
        }
        Err(err) => return Err(RowProblem::Calendar(err)),
    }

    // A tolerated week can still land outside the representable date range.
    resolve_sunday(row.week, row.year, row.month)
        .map(|_| ())
        .map_err(RowProblem::Calendar)
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

/// Integers come as `5` or, from spreadsheet round-trips, `5.0`.
fn parse_int(s: &str, name: &str) -> Result<i32, String> {
    if let Ok(v) = s.parse::<i32>() {
        return Ok(v);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) => {
            Ok(v as i32)
        }
        _ => Err(format!("Invalid `{name}` value '{s}' (expected an integer).")),
    }
}

/// Empty quantity cells count as zero sales.
fn parse_quantity(s: Option<&str>, name: &str) -> Result<f64, String> {
    let s = s.map(str::trim).unwrap_or("");
    if s.is_empty() {
        return Ok(0.0);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` value '{s}' (expected a number).")),
    }
}
