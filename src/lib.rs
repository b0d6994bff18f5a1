//! `sales-disagg` library crate.
//!
//! The binary (`disagg`) is a thin wrapper around this library so that:
//!
//! - the calendar and expansion logic is testable without spawning processes
//! - the pipeline can be driven from other front-ends (batch jobs, notebooks)
//!
//! Core: `calendar` resolves ISO weeks to week-ending Sundays, `expand` spreads
//! weekly quantities over the valid days of the reported month. The rest is I/O.

pub mod app;
pub mod calendar;
pub mod cli;
pub mod domain;
pub mod error;
pub mod expand;
pub mod io;
pub mod report;
