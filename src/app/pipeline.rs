//! Shared transform pipeline used by the CLI and the integration tests.
//!
//! ingest -> resolve Sundays -> expand to days
//!
//! Writing the output is left to the caller.

use tracing::info;

use crate::calendar::resolve_records;
use crate::domain::{ResolvedDates, TransformConfig};
use crate::error::CoreError;
use crate::expand::{Expansion, expand_to_daily};
use crate::io::ingest::{IngestOptions, IngestedTable, load_weekly_file};

/// All computed outputs of a single transform run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedTable,
    pub resolved: Vec<ResolvedDates>,
    pub expansion: Expansion,
}

/// Read the configured input and expand it.
pub fn run_transform(config: &TransformConfig) -> Result<RunOutput, CoreError> {
    let options = IngestOptions {
        encoding: config.encoding,
        invalid_rows: config.invalid_rows,
    };
    let ingest = load_weekly_file(&config.input, options)?;
    info!(
        input = %config.input.display(),
        schema = ?ingest.table.schema,
        rows = ingest.rows_used,
        skipped = ingest.row_errors.len(),
        "loaded weekly table"
    );

    transform_table(ingest, config.allow_empty)
}

/// Expand an already ingested table.
///
/// Fails with `EmptyResult` when no daily row survives, unless `allow_empty` is set.
pub fn transform_table(ingest: IngestedTable, allow_empty: bool) -> Result<RunOutput, CoreError> {
    let resolved = resolve_records(&ingest.table.records)?;
    let expansion = expand_to_daily(&ingest.table.records, &resolved)?;

    info!(
        daily_rows = expansion.stats.daily_rows,
        groups = expansion.stats.groups,
        outside_month = expansion.stats.outside_month,
        before_week_start = expansion.stats.before_week_start,
        zero_rows = expansion.stats.zero_rows_dropped,
        "expanded weekly rows"
    );

    if expansion.daily.is_empty() && !allow_empty {
        return Err(CoreError::EmptyResult {
            weekly_rows: ingest.rows_used,
        });
    }

    Ok(RunOutput {
        ingest,
        resolved,
        expansion,
    })
}
