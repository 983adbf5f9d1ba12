// src/lib.rs
//! Samples 10% of the records in a local file and writes the sample back out
//! as CSV, plain text or PDF.

pub mod config;
pub mod data_types;
pub mod error;
pub mod export;
pub mod handlers;
pub mod sampling;
pub mod session;

pub use data_types::{Cell, Record, Sample, TableData};
pub use error::{ExportError, ParseError};
pub use export::{export_sample, ExportFormat};
pub use handlers::{load_sample, parse_file, FileFormat};
pub use session::{Session, UploadOutcome, UploadTicket};
