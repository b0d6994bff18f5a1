//! Formatted terminal output.
//!
//! Formatting lives in one place so the pipeline stays free of presentation code.

use chrono::NaiveDate;

use crate::domain::{HeaderSchema, ResolvedDates};
use crate::io::summary::RunSummary;

/// How many skipped rows are listed before the rest are counted.
const MAX_LISTED_ROW_ERRORS: usize = 10;

/// Format the run summary printed after `disagg transform`.
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let stats = &summary.expansion;

    out.push_str("=== disagg - weekly to daily sales ===\n");
    out.push_str(&format!("Input:  {}\n", summary.input.display()));
    out.push_str(&format!("Output: {}\n", summary.output.display()));
    out.push_str(&format!(
        "Schema: {} | encoding: {:?}\n",
        schema_label(summary.schema),
        summary.encoding
    ));
    out.push_str(&format!(
        "Weekly rows: read={} used={} skipped={}\n",
        summary.rows_read,
        summary.rows_used,
        summary.rows_skipped()
    ));
    out.push_str(&format!(
        "Candidate days: {} | outside month: {} | before week start: {} | zero rows: {}\n",
        stats.candidate_days, stats.outside_month, stats.before_week_start, stats.zero_rows_dropped
    ));
    out.push_str(&format!(
        "Daily rows written: {} ({} groups)\n",
        summary.daily_rows_written, stats.groups
    ));
    out.push_str(&format!(
        "Units:   {:.2} -> {:.2}\n",
        summary.totals.unit_sales_in, summary.totals.unit_sales_out
    ));
    out.push_str(&format!(
        "Revenue: {:.2} -> {:.2}\n",
        summary.totals.revenue_in, summary.totals.revenue_out
    ));

    if !summary.row_errors.is_empty() {
        out.push_str("\nSkipped rows:\n");
        for e in summary.row_errors.iter().take(MAX_LISTED_ROW_ERRORS) {
            out.push_str(&format!("  {}\n", e.message));
        }
        let rest = summary.row_errors.len().saturating_sub(MAX_LISTED_ROW_ERRORS);
        if rest > 0 {
            out.push_str(&format!("  ... and {rest} more\n"));
        }
    }

    out
}

/// Format the output of `disagg resolve`.
pub fn format_resolution(year: i32, week: i32, month: i32, dates: &ResolvedDates, days: &[NaiveDate]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{year}-W{week:02} reported in month {month}\n"));
    out.push_str(&format!("Sunday (ISO):     {}\n", dates.sunday_original));
    out.push_str(&format!("Sunday (clipped): {}\n", dates.sunday_clipped));
    if days.is_empty() {
        out.push_str("Daily dates:      none\n");
    } else {
        let list: Vec<String> = days.iter().map(|d| d.format("%Y-%m-%d (%a)").to_string()).collect();
        out.push_str(&format!("Daily dates ({}): {}\n", days.len(), list.join(", ")));
    }
    out
}

fn schema_label(schema: HeaderSchema) -> &'static str {
    match schema {
        HeaderSchema::Long => "long (renamed)",
        HeaderSchema::Short => "short",
    }
}
