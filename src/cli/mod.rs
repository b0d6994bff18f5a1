//! Command-line parsing for the weekly-to-daily sales disaggregator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! calendar and expansion code.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::{InputEncoding, InvalidRowPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "disagg", version, about = "Weekly-to-daily retail sales disaggregation")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand a weekly sales CSV into a daily sales CSV.
    Transform(TransformArgs),
    /// Show the Sundays and daily dates a single week/year/month resolves to.
    Resolve(ResolveArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct TransformArgs {
    /// Weekly sales CSV.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Daily CSV to write (default: `<input-stem>_daily.csv` next to the input).
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// How to decode the input file.
    #[arg(long, value_enum, default_value_t = InputEncoding::Auto)]
    pub encoding: InputEncoding,

    /// What to do with rows holding invalid weeks, months or cells.
    #[arg(long = "invalid-rows", value_enum, default_value_t = InvalidRowPolicy::Error)]
    pub invalid_rows: InvalidRowPolicy,

    /// Write a header-only CSV instead of failing when no daily rows remain.
    #[arg(long)]
    pub allow_empty: bool,

    /// Also write a JSON run summary.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    /// Do not print the run summary.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct ResolveArgs {
    /// ISO year the week number belongs to.
    #[arg(long)]
    pub year: i32,

    /// ISO week number.
    #[arg(long, allow_hyphen_values = true)]
    pub week: i32,

    /// Month the week is reported against (1-12).
    #[arg(long)]
    pub month: i32,
}
