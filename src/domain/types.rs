//! Shared domain types.
//!
//! These types are kept plain so they can be:
//!
//! - built by the CSV ingest layer
//! - consumed by the calendar resolver and the daily expander
//! - summarised to JSON after a run

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the raw bytes of the input file are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputEncoding {
    /// UTF-8 when the bytes are valid UTF-8, Latin-1 otherwise.
    Auto,
    /// Strict UTF-8.
    Utf8,
    /// ISO-8859-1: every byte is one character.
    Latin1,
}

/// What to do with rows whose calendar values or cells cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRowPolicy {
    /// Fail the whole run on the first bad row.
    Error,
    /// Drop bad rows and report them.
    Skip,
    /// Keep rows with an out-of-range week and let the month filter discard their
    /// days. Rows that cannot be resolved at all are dropped as with `Skip`.
    Tolerate,
}

/// Which header set the input file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderSchema {
    /// Original export headers (`Código`, `Alterno`, `Venta Unidades`, ...), renamed on load.
    Long,
    /// Already-renamed headers (`Tdacod`, `Ptmcod`, `Venta Unidad`, ...).
    Short,
}

/// Positions of the columns the pipeline reads, after renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub year: usize,
    pub month: usize,
    pub week: usize,
    pub store: usize,
    pub product: usize,
    pub unit_sales: usize,
    pub revenue: usize,
}

/// One weekly input row.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyRecord {
    /// 1-based line in the source CSV.
    pub line: usize,
    pub year: i32,
    pub week: i32,
    /// Month the row is reported against. May differ from the month of its ISO week.
    pub month: i32,
    pub store_id: String,
    pub product_id: String,
    pub unit_sales: f64,
    pub revenue: f64,
    /// Every cell of the row as read, in header order.
    pub cells: Vec<String>,
}

impl WeeklyRecord {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            store_id: self.store_id.clone(),
            product_id: self.product_id.clone(),
            week: self.week,
        }
    }
}

/// Redistribution group.
///
/// Neither `year` nor `month` is part of the key: rows of the same store, product and
/// week number share one distinct-day count even when they are reported in different
/// months or years.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub store_id: String,
    pub product_id: String,
    pub week: i32,
}

/// The two Sundays derived from a weekly row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDates {
    /// Week-ending Sunday, pulled back to the last day of the reported month if it overflows.
    pub sunday_clipped: NaiveDate,
    /// True Sunday of the ISO week.
    pub sunday_original: NaiveDate,
}

/// One daily output row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRecord {
    /// Index of the `WeeklyRecord` this day was expanded from.
    pub source: usize,
    pub date: NaiveDate,
    pub unit_sales: f64,
    pub revenue: f64,
}

/// A parsed weekly table.
#[derive(Debug, Clone)]
pub struct WeeklyTable {
    pub schema: HeaderSchema,
    /// Headers after de-duplication and renaming.
    pub headers: Vec<String>,
    pub columns: ColumnIndex,
    pub records: Vec<WeeklyRecord>,
}

/// A row-level problem that did not abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Run configuration for `disagg transform`.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub encoding: InputEncoding,
    pub invalid_rows: InvalidRowPolicy,
    /// Write a header-only file instead of failing when nothing survives.
    pub allow_empty: bool,
    pub export_summary: Option<PathBuf>,
    pub quiet: bool,
}
