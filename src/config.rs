// src/config.rs
//! Compile-time settings. Nothing here is persisted between runs.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_TITLE: &str = "Sample Viewer";

pub const WINDOW_SIZE: (u32, u32) = (1024, 768);

/// Fraction of the population kept in a sample.
pub const SAMPLE_RATIO: f64 = 0.1;
pub const MIN_SAMPLE_SIZE: usize = 1;

/// Extensions offered by the open dialog, without the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls", "txt", "xml", "docx"];

/// Column label used for flat line records.
pub const LINE_COLUMN: &str = "Line";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Page geometry for PDF export, in millimetres unless noted.
#[derive(Debug, Clone, Copy)]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Font size in points.
    pub font_size: f32,
    pub cell_padding: f32,
    pub grid_thickness: f32,
}

const PT_TO_MM: f32 = 25.4 / 72.0;

impl Default for PdfLayout {
    fn default() -> Self {
        // US Letter, landscape, 20pt margins.
        PdfLayout {
            page_width: 279.4,
            page_height: 215.9,
            margin: 20.0 * PT_TO_MM,
            font_size: 6.0,
            cell_padding: 1.2,
            grid_thickness: 0.25,
        }
    }
}

impl PdfLayout {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Height of one wrapped text line.
    pub fn line_height(&self) -> f32 {
        self.font_size * 1.2 * PT_TO_MM
    }

    /// Rough Helvetica advance width; good enough to decide where to wrap.
    pub fn char_width(&self) -> f32 {
        self.font_size * 0.5 * PT_TO_MM
    }
}
