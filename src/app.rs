//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the transform pipeline
//! - writes the daily CSV and optional summary JSON
//! - prints the run summary

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Command, ResolveArgs, TransformArgs};
use crate::domain::TransformConfig;
use crate::error::AppError;

pub mod logging;
pub mod pipeline;

/// Entry point for the `disagg` binary.
pub fn run() -> Result<(), AppError> {
    // `RUST_LOG` may come from `.env`; a missing file is fine.
    dotenvy::dotenv().ok();

    // `disagg ventas.csv` behaves like `disagg transform ventas.csv`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Transform(args) => handle_transform(args),
        Command::Resolve(args) => handle_resolve(args),
    }
}

fn handle_transform(args: TransformArgs) -> Result<(), AppError> {
    let config = transform_config_from_args(&args);
    let run = pipeline::run_transform(&config)?;

    let written = crate::io::export::write_daily_csv(&config.output, &run.ingest.table, &run.expansion.daily)?;
    if written == 0 {
        warn!(output = %config.output.display(), "no daily rows remained; wrote header only");
    }
    info!(output = %config.output.display(), rows = written, "daily CSV written");

    let summary = crate::io::summary::build_summary(&run, &config, written);
    if let Some(path) = &config.export_summary {
        crate::io::summary::write_summary_json(path, &summary)?;
    }

    if !config.quiet {
        print!("{}", crate::report::format_run_summary(&summary));
    }

    Ok(())
}

fn handle_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let dates = crate::calendar::resolve_sunday(args.week, args.year, args.month)
        .map_err(|e| AppError::new(2, e.to_string()))?;

    if let Err(e) = crate::calendar::validate_iso_week(args.year, args.week) {
        warn!(error = %e, "resolving anyway");
    }

    let probe = crate::domain::WeeklyRecord {
        line: 0,
        year: args.year,
        week: args.week,
        month: args.month,
        store_id: String::new(),
        product_id: String::new(),
        unit_sales: 0.0,
        revenue: 0.0,
        cells: Vec::new(),
    };
    let days = crate::expand::surviving_days(&probe, &dates);

    print!(
        "{}",
        crate::report::format_resolution(args.year, args.week, args.month, &dates, &days)
    );
    Ok(())
}

pub fn transform_config_from_args(args: &TransformArgs) -> TransformConfig {
    TransformConfig {
        input: args.input.clone(),
        output: args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input)),
        encoding: args.encoding,
        invalid_rows: args.invalid_rows,
        allow_empty: args.allow_empty,
        export_summary: args.export_summary.clone(),
        quiet: args.quiet,
    }
}

/// `<dir>/<stem>_daily.csv` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sales".to_string());
    input.with_file_name(format!("{stem}_daily.csv"))
}

/// Rewrite argv so a bare input path defaults to `transform`.
///
/// Rules:
/// - `disagg ventas.csv ...`     -> `disagg transform ventas.csv ...`
/// - `disagg -v ventas.csv ...`  -> `disagg transform -v ventas.csv ...`
/// - `disagg --help/--version`   -> unchanged (show top-level help/version)
/// - `disagg` alone              -> unchanged (clap prints usage)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "transform" | "resolve");
    if is_subcommand {
        return argv;
    }

    // Leading `-v` flags may precede an explicit subcommand.
    let first_positional = argv.iter().skip(1).find(|a| !a.starts_with('-'));
    if matches!(first_positional.map(String::as_str), Some("transform" | "resolve")) {
        return argv;
    }

    argv.insert(1, "transform".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_path_becomes_transform() {
        assert_eq!(
            rewrite_args(args(&["disagg", "ventas.csv", "-o", "out.csv"])),
            args(&["disagg", "transform", "ventas.csv", "-o", "out.csv"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_are_untouched() {
        let resolve = args(&["disagg", "resolve", "--year", "2024"]);
        assert_eq!(rewrite_args(resolve.clone()), resolve);
        let help = args(&["disagg", "--help"]);
        assert_eq!(rewrite_args(help.clone()), help);
        let verbose = args(&["disagg", "-v", "resolve", "--year", "2024"]);
        assert_eq!(rewrite_args(verbose.clone()), verbose);
        let bare = args(&["disagg"]);
        assert_eq!(rewrite_args(bare.clone()), bare);
    }

    #[test]
    fn leading_flags_with_path_become_transform() {
        assert_eq!(
            rewrite_args(args(&["disagg", "-vv", "ventas.csv"])),
            args(&["disagg", "transform", "-vv", "ventas.csv"])
        );
    }

    #[test]
    fn default_output_sits_next_to_input() {
        assert_eq!(
            default_output_path(Path::new("/data/reportes/ventas_enero.csv")),
            PathBuf::from("/data/reportes/ventas_enero_daily.csv")
        );
    }
}
