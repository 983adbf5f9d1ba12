// src/handlers/csv_handler.rs
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use indexmap::IndexMap;

use crate::data_types::{Cell, Record, Sample};
use crate::error::ParseError;
use crate::sampling;

const WHAT: &str = "CSV";

/// Header row names the columns; every later row becomes a keyed record.
pub fn parse_csv(path: &Path) -> Result<Sample, ParseError> {
    let rows = read_rows(path)?;
    let population = rows.len();
    let records = sampling::sample(rows)?;
    Ok(Sample::new(records, population))
}

pub fn read_rows(path: &Path) -> Result<Vec<Record>, ParseError> {
    let file = File::open(path).map_err(|e| ParseError::from_io(WHAT, e))?;

    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let mut row: IndexMap<String, Cell> = record
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let key = headers
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("Column{}", i));
                (key, Cell::from(field))
            })
            .collect();
        // Short rows still carry every header column.
        for header in headers.iter().skip(record.len()) {
            row.entry(header.clone()).or_insert(Cell::Empty);
        }
        rows.push(Record::Keyed(row));
    }

    Ok(rows)
}

fn csv_error(err: csv::Error) -> ParseError {
    let bad_bytes = match err.kind() {
        csv::ErrorKind::Utf8 { .. } => true,
        csv::ErrorKind::Io(io) => io.kind() == std::io::ErrorKind::InvalidData,
        _ => false,
    };
    if bad_bytes {
        ParseError::decode(WHAT, err)
    } else {
        ParseError::malformed(WHAT, err)
    }
}
