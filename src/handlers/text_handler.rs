// src/handlers/text_handler.rs
use std::fs;
use std::path::Path;

use encoding_rs::mem::decode_latin1;
use tracing::debug;

use crate::data_types::{Record, Sample};
use crate::error::ParseError;
use crate::sampling;

/// Samples the lines of a text file. Bytes that are not UTF-8 are re-read as
/// Latin-1 instead of failing.
pub fn parse_text(path: &Path) -> Result<Sample, ParseError> {
    let bytes = fs::read(path).map_err(|e| ParseError::from_io("text file", e))?;
    let text = decode(bytes);

    let lines: Vec<Record> = text
        .lines()
        .map(|line| Record::Line(line.trim_end().to_string()))
        .collect();
    let population = lines.len();

    Ok(Sample::new(sampling::sample(lines)?, population))
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            debug!("not UTF-8, falling back to Latin-1");
            decode_latin1(err.as_bytes()).into_owned()
        }
    }
}
