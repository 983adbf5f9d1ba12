// src/error.rs
use std::io;

use thiserror::Error;

/// Why a file could not be turned into a sample.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },
    #[error("could not decode {what}: {reason}")]
    Decode { what: String, reason: String },
    #[error("malformed {what}: {reason}")]
    Malformed { what: String, reason: String },
    #[error("no records to sample")]
    EmptyPopulation,
}

impl ParseError {
    #[must_use]
    pub fn decode(what: &str, reason: impl ToString) -> Self {
        Self::Decode {
            what: what.to_string(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn malformed(what: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            what: what.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Classifies a read failure: bad bytes are a decode problem, anything
    /// else means the file itself could not be used.
    #[must_use]
    pub fn from_io(what: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::InvalidData {
            Self::decode(what, err)
        } else {
            Self::malformed(what, err)
        }
    }
}

/// Failures while writing a sample back out.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to save.")]
    NoData,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),
}
