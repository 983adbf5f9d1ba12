// src/handlers/docx_handler.rs
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::data_types::{Record, Sample};
use crate::error::ParseError;
use crate::sampling;

const WHAT: &str = "Word document";

/// Samples the non-empty body paragraphs of a .docx file.
///
/// DOCX files are ZIP archives; the body lives in `word/document.xml`.
pub fn parse_docx(path: &Path) -> Result<Sample, ParseError> {
    let file = File::open(path).map_err(|e| ParseError::from_io(WHAT, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| ParseError::malformed(WHAT, e))?;
    let document = archive
        .by_name("word/document.xml")
        .map_err(|e| ParseError::malformed(WHAT, e))?;

    let lines: Vec<Record> = paragraphs(BufReader::new(document))?
        .into_iter()
        .map(Record::Line)
        .collect();
    let population = lines.len();
    Ok(Sample::new(sampling::sample(lines)?, population))
}

/// Extracts trimmed, non-empty paragraph text from `document.xml`.
/// Paragraphs nested in tables are not part of the body and are skipped.
pub fn paragraphs<R: BufRead>(source: R) -> Result<Vec<String>, ParseError> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::with_capacity(1024);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut table_depth = 0usize;
    // Paragraphs nested in a body paragraph (text boxes) count toward depth
    // but contribute no text.
    let mut paragraph_depth = 0usize;
    let mut in_text = false;

    loop {
        let collecting = paragraph_depth == 1 && table_depth == 0;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" if table_depth == 0 => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 {
                        current.clear();
                    }
                }
                b"t" if collecting => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if collecting => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| ParseError::malformed(WHAT, err))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" if table_depth == 0 && paragraph_depth > 0 => {
                    paragraph_depth -= 1;
                    if paragraph_depth == 0 {
                        let text = current.trim();
                        if !text.is_empty() {
                            paragraphs.push(text.to_string());
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => return Err(ParseError::malformed(WHAT, err)),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            inner
        )
    }

    #[test]
    fn paragraphs_are_joined_runs_trimmed() {
        let xml = body(
            r#"<w:p><w:r><w:t xml:space="preserve">  Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>
               <w:p/>
               <w:p><w:r><w:t>   </w:t></w:r></w:p>
               <w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t></w:r></w:p>"#,
        );
        let found = paragraphs(xml.as_bytes()).unwrap();
        assert_eq!(found, vec!["Hello world", "a\tb"]);
    }

    #[test]
    fn table_paragraphs_are_skipped() {
        let xml = body(
            r#"<w:p><w:r><w:t>before</w:t></w:r></w:p>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs(xml.as_bytes()).unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn text_box_paragraphs_do_not_clobber_outer_text() {
        let xml = body(
            r#"<w:p><w:r><w:t>outer start</w:t></w:r><w:r><w:pict><v:textbox xmlns:v="urn:schemas-microsoft-com:vml"><w:txbxContent><w:p><w:r><w:t>boxed</w:t></w:r></w:p></w:txbxContent></v:textbox></w:pict></w:r><w:r><w:t> outer end</w:t></w:r></w:p>
               <w:p><w:r><w:t>next</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            paragraphs(xml.as_bytes()).unwrap(),
            vec!["outer start outer end", "next"]
        );
    }

    #[test]
    fn plain_file_is_not_a_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.docx");
        std::fs::write(&path, "just text").unwrap();
        assert!(matches!(parse_docx(&path), Err(ParseError::Malformed { .. })));
    }
}
