// src/export/pdf.rs
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};
use tracing::debug;

use crate::config::PdfLayout;
use crate::data_types::{Record, TableData};
use crate::error::ExportError;

const LAYER: &str = "Table";

/// Renders the records as a landscape table with a repeating header row.
pub fn write_pdf(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let table = TableData::from_records(records);
    let (doc, pages) = render(&table, &PdfLayout::default())?;
    debug!(pages, rows = table.rows.len(), "pdf laid out");
    doc.save(&mut BufWriter::new(File::create(path)?))?;
    Ok(())
}

/// Lays the table out over as many pages as needed.
fn render(
    table: &TableData,
    layout: &PdfLayout,
) -> Result<(PdfDocumentReference, usize), ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        "Sample",
        Mm(layout.page_width),
        Mm(layout.page_height),
        LAYER,
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let columns = table.headers.len().max(1);
    let col_width = layout.content_width() / columns as f32;
    let max_chars = chars_per_line(col_width, layout);

    let top = layout.page_height - layout.margin;
    let bottom = layout.margin;

    let header: Vec<Vec<String>> = table
        .headers
        .iter()
        .map(|h| wrap_cell(h, max_chars))
        .collect();
    let header_height = row_height(&header, layout);
    let max_lines = (((top - bottom - header_height) - 2.0 * layout.cell_padding)
        / layout.line_height())
    .floor()
    .max(1.0) as usize;

    let painter = TablePainter {
        layout,
        font: &font,
        col_width,
    };

    let mut canvas = doc.get_page(page).get_layer(layer);
    let mut pages = 1;
    painter.row(&canvas, &header, top, header_height, true);
    let mut y = top - header_height;

    for row in &table.rows {
        let mut cells: Vec<Vec<String>> = row.iter().map(|c| wrap_cell(c, max_chars)).collect();
        for lines in &mut cells {
            lines.truncate(max_lines);
        }
        let height = row_height(&cells, layout);

        if y - height < bottom {
            let (page, layer) = doc.add_page(Mm(layout.page_width), Mm(layout.page_height), LAYER);
            canvas = doc.get_page(page).get_layer(layer);
            pages += 1;
            painter.row(&canvas, &header, top, header_height, true);
            y = top - header_height;
        }

        painter.row(&canvas, &cells, y, height, false);
        y -= height;
    }

    Ok((doc, pages))
}

struct TablePainter<'a> {
    layout: &'a PdfLayout,
    font: &'a IndirectFontRef,
    col_width: f32,
}

impl TablePainter<'_> {
    fn row(
        &self,
        canvas: &PdfLayerReference,
        cells: &[Vec<String>],
        top: f32,
        height: f32,
        is_header: bool,
    ) {
        let layout = self.layout;
        let left = layout.margin;
        let right = layout.page_width - layout.margin;
        let bottom = top - height;

        if is_header {
            canvas.set_fill_color(grey(0.83));
            canvas.add_rect(
                Rect::new(Mm(left), Mm(bottom), Mm(right), Mm(top)).with_mode(PaintMode::Fill),
            );
        }

        canvas.set_fill_color(grey(0.0));
        for (col, lines) in cells.iter().enumerate() {
            let x = left + col as f32 * self.col_width + layout.cell_padding;
            for (i, line) in lines.iter().enumerate() {
                let baseline = top - layout.cell_padding - layout.line_height() * (i as f32 + 0.8);
                canvas.use_text(line.as_str(), layout.font_size, Mm(x), Mm(baseline), self.font);
            }
        }

        canvas.set_outline_color(grey(0.5));
        canvas.set_outline_thickness(layout.grid_thickness);
        segment(canvas, (left, top), (right, top));
        for col in 0..=cells.len().max(1) {
            let x = left + col as f32 * self.col_width;
            segment(canvas, (x, top), (x, bottom));
        }

        if is_header {
            canvas.set_outline_color(grey(0.0));
            canvas.set_outline_thickness(1.0);
        }
        segment(canvas, (left, bottom), (right, bottom));
    }
}

fn grey(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

fn segment(canvas: &PdfLayerReference, from: (f32, f32), to: (f32, f32)) {
    canvas.add_line(Line {
        points: vec![
            (Point::new(Mm(from.0), Mm(from.1)), false),
            (Point::new(Mm(to.0), Mm(to.1)), false),
        ],
        is_closed: false,
    });
}

fn chars_per_line(col_width: f32, layout: &PdfLayout) -> usize {
    (((col_width - 2.0 * layout.cell_padding) / layout.char_width()).floor() as usize).max(1)
}

fn row_height(cells: &[Vec<String>], layout: &PdfLayout) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f32 * layout.line_height() + 2.0 * layout.cell_padding
}

/// Greedy word wrap. Embedded newlines always break; words longer than the
/// line are split.
pub fn wrap_cell(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut width = 0;

        for word in paragraph.replace('\t', " ").split(' ').filter(|w| !w.is_empty()) {
            let mut chars: Vec<char> = word.chars().collect();

            if width > 0 && width + 1 + chars.len() > max_chars {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }

            while chars.len() > max_chars {
                let rest = chars.split_off(max_chars);
                if width > 0 {
                    lines.push(std::mem::take(&mut current));
                    width = 0;
                }
                lines.push(chars.into_iter().collect());
                chars = rest;
            }

            if width > 0 {
                current.push(' ');
                width += 1;
            }
            width += chars.len();
            current.extend(chars);
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_words_and_newlines() {
        assert_eq!(wrap_cell("alpha beta gamma", 11), vec!["alpha beta", "gamma"]);
        assert_eq!(wrap_cell("one\ntwo", 40), vec!["one", "two"]);
        assert_eq!(wrap_cell("", 10), vec![""]);
    }

    #[test]
    fn splits_long_words() {
        assert_eq!(wrap_cell("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_cell("x abcdefgh", 4), vec!["x", "abcd", "efgh"]);
    }

    #[test]
    fn long_tables_span_pages() {
        let table = TableData {
            headers: vec!["id".into(), "text".into()],
            rows: (0..400).map(|i| vec![i.to_string(), "row".into()]).collect(),
        };
        let (_, pages) = render(&table, &PdfLayout::default()).unwrap();
        assert!(pages > 1);

        let short = TableData {
            headers: vec!["Line".into()],
            rows: vec![vec!["only".into()]],
        };
        let (_, pages) = render(&short, &PdfLayout::default()).unwrap();
        assert_eq!(pages, 1);
    }
}
