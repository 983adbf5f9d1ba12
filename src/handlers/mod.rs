// src/handlers/mod.rs
//! Picks an extractor from the file extension and folds failures into a
//! displayable sample.

use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::data_types::Sample;
use crate::error::ParseError;

pub mod csv_handler;
pub mod docx_handler;
pub mod spreadsheet_handler;
pub mod text_handler;
pub mod xml_handler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
    Text,
    Xml,
    Docx,
}

impl FileFormat {
    /// Case-insensitive extension lookup.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" | "xls" => Some(FileFormat::Spreadsheet),
            "txt" => Some(FileFormat::Text),
            "xml" => Some(FileFormat::Xml),
            "docx" => Some(FileFormat::Docx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Name and extensions for the open dialog filter.
    pub fn filter(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            FileFormat::Csv => ("CSV Files", &["csv"]),
            FileFormat::Spreadsheet => ("Excel Files", &["xlsx", "xls"]),
            FileFormat::Text => ("Text Files", &["txt"]),
            FileFormat::Xml => ("XML Files", &["xml"]),
            FileFormat::Docx => ("Word Files", &["docx"]),
        }
    }

    pub const ALL: [FileFormat; 5] = [
        FileFormat::Csv,
        FileFormat::Spreadsheet,
        FileFormat::Text,
        FileFormat::Xml,
        FileFormat::Docx,
    ];
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Csv => "CSV",
            FileFormat::Spreadsheet => "Excel",
            FileFormat::Text => "TXT",
            FileFormat::Xml => "XML",
            FileFormat::Docx => "DOCX",
        };
        f.write_str(name)
    }
}

/// Reads the file and returns a random sample of its records.
pub fn parse_file(path: &Path) -> Result<Sample, ParseError> {
    let format = FileFormat::from_path(path).ok_or_else(|| ParseError::UnsupportedFormat {
        extension: path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| "(none)".to_string()),
    })?;

    let sample = match format {
        FileFormat::Csv => csv_handler::parse_csv(path)?,
        FileFormat::Spreadsheet => spreadsheet_handler::parse_spreadsheet(path)?,
        FileFormat::Text => text_handler::parse_text(path)?,
        FileFormat::Xml => xml_handler::parse_xml(path)?,
        FileFormat::Docx => docx_handler::parse_docx(path)?,
    };

    info!(
        path = %path.display(),
        format = %format,
        population = sample.population_size,
        sampled = sample.len(),
        "sample drawn"
    );
    Ok(sample.with_source(path))
}

/// Like [`parse_file`], but never fails: errors become a one-line sample
/// carrying the message.
pub fn load_sample(path: &Path) -> Sample {
    match parse_file(path) {
        Ok(sample) => sample,
        Err(err @ ParseError::UnsupportedFormat { .. }) => {
            warn!(path = %path.display(), "{}", err);
            Sample::message(err.to_string()).with_source(path)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "parse failed");
            Sample::message(format!("Error parsing file: {}", err)).with_source(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::Record;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn extension_lookup_ignores_case() {
        assert_eq!(FileFormat::from_path(Path::new("a/FILE.CSV")), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path(Path::new("file.csv")), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path(Path::new("b.Xls")), Some(FileFormat::Spreadsheet));
        assert_eq!(FileFormat::from_path(Path::new("noext")), None);
        assert_eq!(FileFormat::from_path(Path::new("report.pdf")), None);
    }

    #[test]
    fn unsupported_extension_yields_one_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();

        assert!(matches!(parse_file(&path), Err(ParseError::UnsupportedFormat { .. })));

        let sample = load_sample(&path);
        assert_eq!(sample.len(), 1);
        assert!(matches!(&sample.records[0], Record::Line(msg) if msg.starts_with("Unsupported file type")));
    }

    #[test]
    fn parse_errors_are_folded_into_a_message() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");

        let sample = load_sample(&path);
        assert_eq!(sample.len(), 1);
        assert!(matches!(&sample.records[0], Record::Line(msg) if msg.starts_with("Error parsing file")));
    }

    #[test]
    fn upper_case_extension_routes_to_same_extractor() {
        let dir = TempDir::new().unwrap();
        let lower = dir.path().join("data.csv");
        let upper = dir.path().join("DATA.CSV");
        fs::write(&lower, "id,name\n1,a\n2,b\n").unwrap();
        fs::write(&upper, "id,name\n1,a\n2,b\n").unwrap();

        let a = parse_file(&lower).unwrap();
        let b = parse_file(&upper).unwrap();
        assert_eq!(a.headers(), b.headers());
        assert_eq!(a.population_size, b.population_size);
    }
}
