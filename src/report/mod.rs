//! Reporting: run summary and week resolution text.

pub mod format;

pub use format::*;
