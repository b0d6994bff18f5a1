//! Error types.
//!
//! - `CalendarError`: a single (week, year, month) triple could not be resolved
//! - `CoreError`: value-returned by every library layer
//! - `AppError`: what the `disagg` binary prints, plus its process exit code

use thiserror::Error;

/// A calendar triple that cannot be turned into dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(i32),
    #[error("week {week} is not an ISO week of {year}")]
    WeekOutOfRange { week: i32, year: i32 },
    #[error("year {0} is outside the supported date range")]
    YearOutOfRange(i32),
    #[error("week {week} of {year} falls outside the supported date range")]
    DateOutOfRange { week: i32, year: i32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Missing required column(s): {}", format_columns(.missing))]
    SchemaMismatch { missing: Vec<String> },

    #[error("Line {line}: {source}")]
    InvalidCalendarInput {
        line: usize,
        #[source]
        source: CalendarError,
    },

    #[error("Line {line}: {message}")]
    MalformedRow { line: usize, message: String },

    #[error("week/year/month sequences differ in length ({weeks}, {years}, {months})")]
    LengthMismatch {
        weeks: usize,
        years: usize,
        months: usize,
    },

    #[error("{records} weekly row(s) but {resolved} resolved date pair(s)")]
    ResolvedMismatch { records: usize, resolved: usize },

    #[error("No daily rows remain after expanding {weekly_rows} weekly row(s).")]
    EmptyResult { weekly_rows: usize },

    #[error("{context}: {message}")]
    Io { context: String, message: String },

    #[error("CSV error: {message}")]
    Csv { message: String },

    #[error("Input is not valid {message}")]
    Encoding { message: String },
}

impl CoreError {
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Process exit code used by the CLI for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::SchemaMismatch { .. }
            | Self::InvalidCalendarInput { .. }
            | Self::MalformedRow { .. }
            | Self::Io { .. }
            | Self::Csv { .. }
            | Self::Encoding { .. } => 2,
            Self::EmptyResult { .. } => 3,
            Self::LengthMismatch { .. } | Self::ResolvedMismatch { .. } => 4,
        }
    }
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
        }
    }
}

fn format_columns(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("`{c}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_names_every_column() {
        let err = CoreError::SchemaMismatch {
            missing: vec!["Mes".to_string(), "Ptmcod".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required column(s): `Mes`, `Ptmcod`");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_result_maps_to_its_own_exit_code() {
        let app: AppError = CoreError::EmptyResult { weekly_rows: 4 }.into();
        assert_eq!(app.exit_code(), 3);
        assert!(app.to_string().contains("4 weekly row(s)"));
    }

    #[test]
    fn calendar_error_is_reported_with_line() {
        let err = CoreError::InvalidCalendarInput {
            line: 7,
            source: CalendarError::MonthOutOfRange(13),
        };
        assert_eq!(err.to_string(), "Line 7: month 13 is outside 1..=12");
    }
}
