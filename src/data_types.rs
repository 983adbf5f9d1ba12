// src/data_types.rs
use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::config::LINE_COLUMN;

/// One cell of a keyed record.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// A single sampled record: either a row keyed by column name, or a bare line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Keyed(IndexMap<String, Cell>),
    Line(String),
}

/// The records currently on screen, plus where they came from.
#[derive(Debug, Clone, Default)]
pub struct Sample {
    pub records: Vec<Record>,
    pub population_size: usize,
    pub source: Option<PathBuf>,
}

impl Sample {
    pub fn new(records: Vec<Record>, population_size: usize) -> Self {
        Sample {
            records,
            population_size,
            source: None,
        }
    }

    /// A one-line sample used to show a status or error message as table data.
    pub fn message(text: impl Into<String>) -> Self {
        Sample::new(vec![Record::Line(text.into())], 0)
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Column names taken from the first record, in insertion order.
    pub fn headers(&self) -> Option<Vec<String>> {
        match self.records.first()? {
            Record::Keyed(map) => Some(map.keys().cloned().collect()),
            Record::Line(_) => None,
        }
    }
}

/// A rectangular, fully stringified view of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn empty() -> Self {
        TableData {
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Lays records out as a grid. Keyed records take their columns from the
    /// first record; keys missing from later records render as "".
    pub fn from_records(records: &[Record]) -> Self {
        let Some(first) = records.first() else {
            return TableData::empty();
        };

        match first {
            Record::Keyed(map) => {
                let headers: Vec<String> = map.keys().cloned().collect();
                let rows = records
                    .iter()
                    .map(|record| match record {
                        Record::Keyed(map) => headers
                            .iter()
                            .map(|h| map.get(h).map(Cell::to_string).unwrap_or_default())
                            .collect(),
                        Record::Line(line) => {
                            let mut row = vec![String::new(); headers.len()];
                            if let Some(cell) = row.first_mut() {
                                *cell = line.clone();
                            }
                            row
                        }
                    })
                    .collect();
                TableData { headers, rows }
            }
            Record::Line(_) => TableData {
                headers: vec![LINE_COLUMN.to_string()],
                rows: records
                    .iter()
                    .map(|record| match record {
                        Record::Line(line) => vec![line.clone()],
                        Record::Keyed(map) => vec![map
                            .values()
                            .map(Cell::to_string)
                            .collect::<Vec<_>>()
                            .join("\t")],
                    })
                    .collect(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(pairs: &[(&str, &str)]) -> Record {
        Record::Keyed(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), Cell::from(*v)))
                .collect(),
        )
    }

    #[test]
    fn numbers_without_fraction_display_as_integers() {
        assert_eq!(Cell::Number(42.0).to_string(), "42");
        assert_eq!(Cell::Number(-3.5).to_string(), "-3.5");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn keyed_table_uses_first_record_headers() {
        let records = vec![
            keyed(&[("id", "1"), ("name", "ann")]),
            keyed(&[("id", "2")]),
        ];
        let table = TableData::from_records(&records);
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.rows[1], vec!["2".to_string(), String::new()]);
    }

    #[test]
    fn line_records_render_single_line_column() {
        let records = vec![Record::Line("a".into()), Record::Line("b".into())];
        let table = TableData::from_records(&records);
        assert_eq!(table.headers, vec![LINE_COLUMN]);
        assert_eq!(table.rows, vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn no_records_render_empty_table() {
        assert!(TableData::from_records(&[]).is_empty());
        assert_eq!(Sample::default().headers(), None);
    }
}
