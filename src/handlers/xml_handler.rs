// src/handlers/xml_handler.rs
use std::io::BufRead;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::data_types::{Record, Sample};
use crate::error::ParseError;
use crate::sampling;

const WHAT: &str = "XML";

/// Samples the text lines found anywhere in the document.
pub fn parse_xml(path: &Path) -> Result<Sample, ParseError> {
    let reader = Reader::from_file(path).map_err(|e| ParseError::malformed(WHAT, e))?;
    let lines: Vec<Record> = text_lines(reader)?
        .into_iter()
        .map(Record::Line)
        .collect();
    let population = lines.len();
    Ok(Sample::new(sampling::sample(lines)?, population))
}

/// Collects each element's leading text (the text between its start tag and
/// its first child) and the text of comments inside the root, in document
/// order, then splits embedded newlines so each
/// line is a separate entry. Text after a child element is not collected, and
/// whitespace-only text is ignored.
pub fn text_lines<R: BufRead>(mut reader: Reader<R>) -> Result<Vec<String>, ParseError> {
    reader.config_mut().trim_text(false);

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut leading = false;
    let mut depth = 0usize;
    let mut buf = Vec::with_capacity(1024);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                if leading {
                    let text = e.unescape().map_err(|err| malformed_at(&reader, err))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if leading {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(other) => {
                flush(&mut current, &mut chunks);
                leading = false;
                match other {
                    Event::Start(_) => {
                        depth += 1;
                        leading = true;
                    }
                    Event::End(_) => depth = depth.saturating_sub(1),
                    // Comments inside the document are nodes with text of their own.
                    Event::Comment(e) if depth > 0 => {
                        current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                        flush(&mut current, &mut chunks);
                    }
                    Event::Eof => break,
                    _ => {}
                }
            }
            Err(err) => return Err(malformed_at(&reader, err)),
        }
        buf.clear();
    }

    Ok(chunks
        .join("\n")
        .lines()
        .map(str::to_string)
        .collect())
}

fn flush(current: &mut String, chunks: &mut Vec<String>) {
    if !current.trim().is_empty() {
        chunks.push(current.clone());
    }
    current.clear();
}

fn malformed_at<R>(reader: &Reader<R>, err: quick_xml::Error) -> ParseError {
    ParseError::malformed(WHAT, format!("{} (at byte {})", err, reader.buffer_position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn lines_of(xml: &str) -> Result<Vec<String>, ParseError> {
        text_lines(Reader::from_str(xml))
    }

    #[test]
    fn collects_text_in_document_order() {
        let xml = "<root><a>first</a><b><c>second\nthird</c></b><d><![CDATA[fourth]]></d></root>";
        assert_eq!(lines_of(xml).unwrap(), vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn mixed_content_keeps_only_leading_text_untrimmed() {
        let xml = "<p>Hello <b>world</b> again</p>";
        assert_eq!(lines_of(xml).unwrap(), vec!["Hello ", "world"]);
    }

    #[test]
    fn comments_end_leading_text() {
        let xml = "<!-- outside --><root>  lead <!-- note -->after<a>x&amp;y</a></root>";
        assert_eq!(lines_of(xml).unwrap(), vec!["  lead ", " note ", "x&y"]);
    }

    #[test]
    fn whitespace_only_nodes_are_skipped() {
        let xml = "<root>\n  <a>x</a>\n  <b>  </b>\n</root>";
        assert_eq!(lines_of(xml).unwrap(), vec!["x"]);
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        assert!(matches!(lines_of("<a><b>x</a>"), Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn twenty_entries_sample_to_two_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.xml");
        let body: String = (0..20).map(|i| format!("<item>entry {}</item>", i)).collect();
        fs::write(&path, format!("<?xml version=\"1.0\"?><items>{}</items>", body)).unwrap();

        let sample = parse_xml(&path).unwrap();
        assert_eq!(sample.population_size, 20);
        assert_eq!(sample.len(), 2);
        assert!(sample
            .records
            .iter()
            .all(|r| matches!(r, Record::Line(l) if l.starts_with("entry "))));
    }
}
