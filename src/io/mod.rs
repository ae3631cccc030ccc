//! Input/output helpers.
//!
//! - sample-file ingest + header metadata (`ingest`)
//! - JSON records, batch report and sample traces (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
