// src/export/delimited.rs
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;

use crate::data_types::{Cell, Record};
use crate::error::ExportError;

/// Keyed records get a header row from the first record's keys; line
/// records are written as single-column rows with no header.
pub fn write_csv(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;

    match records.first() {
        Some(Record::Keyed(first)) => {
            let headers: Vec<&String> = first.keys().collect();
            writer.write_record(&headers)?;
            for record in records {
                writer.write_record(row_for(record, &headers))?;
            }
        }
        Some(Record::Line(_)) => {
            for record in records {
                writer.write_record(row_for(record, &[]))?;
            }
        }
        None => {}
    }

    writer.flush()?;
    Ok(())
}

fn row_for(record: &Record, headers: &[&String]) -> Vec<String> {
    match record {
        Record::Keyed(map) if !headers.is_empty() => headers
            .iter()
            .map(|h| map.get(*h).map(Cell::to_string).unwrap_or_default())
            .collect(),
        Record::Keyed(map) => vec![tab_joined(map.values())],
        Record::Line(line) => vec![line.clone()],
    }
}

/// One record per line: keyed values tab-joined in key order, lines verbatim.
pub fn write_text(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    for record in records {
        match record {
            Record::Keyed(map) => writeln!(out, "{}", tab_joined(map.values()))?,
            Record::Line(line) => writeln!(out, "{}", line)?,
        }
    }
    out.flush()?;
    Ok(())
}

fn tab_joined<'a>(cells: impl Iterator<Item = &'a Cell>) -> String {
    cells.map(Cell::to_string).collect::<Vec<_>>().join("\t")
}
