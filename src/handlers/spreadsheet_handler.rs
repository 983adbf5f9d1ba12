// src/handlers/spreadsheet_handler.rs
use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use indexmap::IndexMap;
use tracing::debug;

use crate::data_types::{Cell, Record, Sample};
use crate::error::ParseError;
use crate::sampling;

const WHAT: &str = "workbook";

/// Samples the rows of the workbook's first sheet. Row 1 supplies the headers.
pub fn parse_spreadsheet(path: &Path) -> Result<Sample, ParseError> {
    let bytes = fs::read(path).map_err(|e| ParseError::from_io(WHAT, e))?;
    // Detect the container from its contents; calamine's path-based detection
    // only knows lower-case extensions.
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| ParseError::malformed(WHAT, e))?;

    let sheet = workbook.sheet_names().first().cloned().unwrap_or_default();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ParseError::malformed(WHAT, "no worksheets"))?
        .map_err(|e| ParseError::malformed(WHAT, e))?;
    debug!(sheet = %sheet, size = ?range.get_size(), "reading worksheet");

    let grid = anchored_rows(&range);
    let rows = rows_to_records(grid.iter().map(Vec::as_slice));
    let population = rows.len();
    Ok(Sample::new(sampling::sample(rows)?, population))
}

/// Rows laid out from cell A1. calamine trims leading blank rows and columns
/// off a range; they are put back so row 1 is always the header row and
/// column indices match the sheet.
pub fn anchored_rows(range: &Range<Data>) -> Vec<Vec<Data>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let lead = start_col as usize;
    let width = lead + range.width();

    let mut rows: Vec<Vec<Data>> = (0..start_row).map(|_| vec![Data::Empty; width]).collect();
    rows.extend(range.rows().map(|row| {
        let mut padded = vec![Data::Empty; lead];
        padded.extend_from_slice(row);
        padded
    }));
    rows
}

/// Turns raw sheet rows into keyed records. Blank header cells, and cells
/// past the last header, are named `ColumnN` after their zero-based index.
pub fn rows_to_records<'a, I>(mut rows: I) -> Vec<Record>
where
    I: Iterator<Item = &'a [Data]>,
{
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell_value(cell) {
            Cell::Empty => placeholder(i),
            Cell::Text(s) if s.is_empty() => placeholder(i),
            value => value.to_string(),
        })
        .collect();

    rows.map(|row| {
        let map: IndexMap<String, Cell> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let key = headers.get(i).cloned().unwrap_or_else(|| placeholder(i));
                (key, cell_value(cell))
            })
            .collect();
        Record::Keyed(map)
    })
    .collect()
}

fn placeholder(index: usize) -> String {
    format!("Column{}", index)
}

fn cell_value(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::from(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(when) => Cell::Text(when.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn headers_come_from_first_row_with_placeholders() {
        let rows: Vec<Vec<Data>> = vec![
            vec![text("id"), Data::Empty, text("name")],
            vec![Data::Float(1.0), text("x"), Data::Empty, text("extra")],
        ];
        let records = rows_to_records(rows.iter().map(Vec::as_slice));

        assert_eq!(records.len(), 1);
        let Record::Keyed(map) = &records[0] else {
            panic!("expected keyed record");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "Column1", "name", "Column3"]);
        assert_eq!(map["id"].to_string(), "1");
        assert_eq!(map["name"], Cell::Empty);
    }

    #[test]
    fn header_only_sheet_has_no_records() {
        let rows: Vec<Vec<Data>> = vec![vec![text("a"), text("b")]];
        assert!(rows_to_records(rows.iter().map(Vec::as_slice)).is_empty());
        assert!(rows_to_records(std::iter::empty()).is_empty());
    }

    #[test]
    fn numeric_and_boolean_cells_stringify() {
        assert_eq!(cell_value(&Data::Int(7)).to_string(), "7");
        assert_eq!(cell_value(&Data::Float(2.5)).to_string(), "2.5");
        assert_eq!(cell_value(&Data::Bool(true)).to_string(), "TRUE");
    }

    #[test]
    fn blank_leading_column_keeps_sheet_indices() {
        let mut range: Range<Data> = Range::new((0, 1), (1, 2));
        range.set_value((0, 1), text("id"));
        range.set_value((0, 2), text("name"));
        range.set_value((1, 1), Data::Int(1));
        range.set_value((1, 2), text("ann"));

        let grid = anchored_rows(&range);
        let records = rows_to_records(grid.iter().map(Vec::as_slice));
        let Record::Keyed(map) = &records[0] else {
            panic!("expected keyed record");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Column0", "id", "name"]);
        assert_eq!(map["Column0"], Cell::Empty);
    }

    #[test]
    fn blank_first_row_is_still_the_header_row() {
        let mut range: Range<Data> = Range::new((1, 0), (2, 1));
        range.set_value((1, 0), text("a"));
        range.set_value((2, 0), text("b"));

        let grid = anchored_rows(&range);
        assert_eq!(grid.len(), 3);
        let records = rows_to_records(grid.iter().map(Vec::as_slice));
        assert_eq!(records.len(), 2);
        let Record::Keyed(map) = &records[0] else {
            panic!("expected keyed record");
        };
        assert_eq!(map["Column0"], Cell::from("a"));
    }

    /// Minimal OOXML workbook: one sheet, header row of inline strings,
    /// numeric ids and inline-string names.
    fn write_xlsx(path: &std::path::Path, data_rows: usize) {
        use std::io::Write;
        use zip::write::FileOptions;

        let mut sheet = String::from(r#"<row r="1"><c r="A1" t="inlineStr"><is><t>id</t></is></c><c r="B1" t="inlineStr"><is><t>name</t></is></c></row>"#);
        for i in 0..data_rows {
            let r = i + 2;
            sheet.push_str(&format!(
                r#"<row r="{r}"><c r="A{r}"><v>{i}</v></c><c r="B{r}" t="inlineStr"><is><t>person {i}</t></is></c></row>"#
            ));
        }

        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/worksheets/sheet1.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    sheet
                ),
            ),
        ];

        let mut zip = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
        for (name, body) in parts {
            zip.start_file(name, FileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn workbook_rows_are_sampled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.xlsx");
        write_xlsx(&path, 25);

        let sample = parse_spreadsheet(&path).unwrap();
        assert_eq!(sample.population_size, 25);
        assert_eq!(sample.len(), 2);
        assert_eq!(sample.headers(), Some(vec!["id".to_string(), "name".to_string()]));
        for record in &sample.records {
            let Record::Keyed(map) = record else {
                panic!("expected keyed record");
            };
            let id = map["id"].to_string();
            assert_eq!(map["name"], Cell::Text(format!("person {}", id)));
        }
    }

    #[test]
    fn header_only_workbook_is_empty_population() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.XLSX");
        write_xlsx(&path, 0);
        assert!(matches!(parse_spreadsheet(&path), Err(ParseError::EmptyPopulation)));
    }

    #[test]
    fn non_workbook_bytes_are_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.xlsx");
        fs::write(&path, b"definitely not a zip archive").unwrap();
        assert!(matches!(parse_spreadsheet(&path), Err(ParseError::Malformed { .. })));
    }
}
