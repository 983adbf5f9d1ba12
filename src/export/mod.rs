// src/export/mod.rs
//! Writes the sample currently on screen. Exports never re-sample.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data_types::Sample;
use crate::error::ExportError;

pub mod delimited;
pub mod pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Text,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn filter_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV Files",
            ExportFormat::Text => "Text Files",
            ExportFormat::Pdf => "PDF Files",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

/// Appends `.ext` unless the file name already ends with it (any case).
pub fn ensure_extension(path: &Path, ext: &str) -> PathBuf {
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    if has_ext {
        return path.to_path_buf();
    }

    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Writes `sample` to `path` (extension added if missing) and returns the
/// path actually written.
pub fn export_sample(
    sample: &Sample,
    format: ExportFormat,
    path: &Path,
) -> Result<PathBuf, ExportError> {
    if sample.is_empty() {
        return Err(ExportError::NoData);
    }

    let path = ensure_extension(path, format.extension());
    match format {
        ExportFormat::Csv => delimited::write_csv(&sample.records, &path)?,
        ExportFormat::Text => delimited::write_text(&sample.records, &path)?,
        ExportFormat::Pdf => pdf::write_pdf(&sample.records, &path)?,
    }

    info!(path = %path.display(), format = %format, records = sample.len(), "sample exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn extension_is_appended_only_when_missing() {
        assert_eq!(ensure_extension(Path::new("out"), "csv"), PathBuf::from("out.csv"));
        assert_eq!(ensure_extension(Path::new("out.CSV"), "csv"), PathBuf::from("out.CSV"));
        assert_eq!(ensure_extension(Path::new("out.txt"), "pdf"), PathBuf::from("out.txt.pdf"));
        assert_eq!(ensure_extension(Path::new("v1.2"), "txt"), PathBuf::from("v1.2.txt"));
    }

    #[test]
    fn nothing_loaded_never_touches_disk() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out");
        let result = export_sample(&Sample::default(), ExportFormat::Csv, &target);
        assert!(matches!(result, Err(ExportError::NoData)));
        assert!(!dir.path().join("out.csv").exists());
    }
}
