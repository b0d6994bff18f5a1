//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`InputEncoding`, `InvalidRowPolicy`)
//! - weekly input rows and their resolved Sundays (`WeeklyRecord`, `ResolvedDates`)
//! - daily output rows and the redistribution key (`DailyRecord`, `GroupKey`)

pub mod types;

pub use types::*;
