//! Input/output helpers.
//!
//! - header cleanup, schema detection and renaming (`schema`)
//! - CSV ingest + row validation (`ingest`)
//! - daily CSV export (`export`)
//! - run summary JSON (`summary`)

pub mod export;
pub mod ingest;
pub mod schema;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
