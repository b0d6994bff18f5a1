//! Run summary JSON.
//!
//! The summary records what a `disagg transform` run read, dropped and wrote, so a
//! batch job can check a run without re-reading the daily CSV.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{HeaderSchema, InputEncoding, InvalidRowPolicy, RowError, TransformConfig};
use crate::error::CoreError;
use crate::expand::ExpansionStats;

/// Quantity sums before and after expansion.
///
/// `*_out` is lower than `*_in` whenever days were filtered out of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantityTotals {
    pub unit_sales_in: f64,
    pub revenue_in: f64,
    pub unit_sales_out: f64,
    pub revenue_out: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub schema: HeaderSchema,
    pub encoding: InputEncoding,
    pub invalid_rows: InvalidRowPolicy,
    pub rows_read: usize,
    pub rows_used: usize,
    pub row_errors: Vec<RowError>,
    pub expansion: ExpansionStats,
    pub daily_rows_written: usize,
    pub totals: QuantityTotals,
}

impl RunSummary {
    pub fn rows_skipped(&self) -> usize {
        self.row_errors.len()
    }
}

/// Assemble the summary of a finished run.
pub fn build_summary(run: &crate::app::pipeline::RunOutput, config: &TransformConfig, written: usize) -> RunSummary {
    let records = &run.ingest.table.records;
    let totals = QuantityTotals {
        unit_sales_in: records.iter().map(|r| r.unit_sales).sum(),
        revenue_in: records.iter().map(|r| r.revenue).sum(),
        unit_sales_out: run.expansion.daily.iter().map(|d| d.unit_sales).sum(),
        revenue_out: run.expansion.daily.iter().map(|d| d.revenue).sum(),
    };

    RunSummary {
        tool: "disagg".to_string(),
        input: config.input.clone(),
        output: config.output.clone(),
        schema: run.ingest.table.schema,
        encoding: run.ingest.encoding,
        invalid_rows: config.invalid_rows,
        rows_read: run.ingest.rows_read,
        rows_used: run.ingest.rows_used,
        row_errors: run.ingest.row_errors.clone(),
        expansion: run.expansion.stats.clone(),
        daily_rows_written: written,
        totals,
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), CoreError> {
    let file = File::create(path)
        .map_err(|e| CoreError::io(format!("Failed to create summary JSON '{}'", path.display()), e))?;
    serde_json::to_writer_pretty(file, summary).map_err(|e| CoreError::Io {
        context: "Failed to write summary JSON".to_string(),
        message: e.to_string(),
    })
}
