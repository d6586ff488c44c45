//! Raw text decoding for WordprocessingML documents.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use quick_xml::events::Event;
use tracing::debug;

/// Default location of the main document part.
const DOCUMENT_PART: &str = "word/document.xml";

/// Decode the raw text of a DOCX archive.
///
/// Every paragraph is followed by a blank line, tabs and line breaks are
/// kept, and field codes and deleted revisions are skipped. Of each
/// `mc:AlternateContent` block only the `mc:Fallback` branch is read. The
/// output is not normalized.
pub fn extract_raw_text(data: &[u8]) -> Result<String> {
    let container = OoxmlContainer::from_bytes(data)?;
    let part = container.main_part(DOCUMENT_PART);
    debug!(part = %part, "reading main document part");

    let xml = container.read_xml(&part)?;
    text_from_document_xml(&xml)
}

/// Collect the text of a `w:document` body.
pub(crate) fn text_from_document_xml(xml: &str) -> Result<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Keep whitespace from xml:space="preserve" runs
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut output = String::new();
    let mut in_body = false;
    let mut saw_body = false;
    let mut in_text = false;
    let mut in_ppr = false;
    // Nesting depth of mc:Choice elements; nothing inside them is emitted
    let mut choice_depth = 0usize;
    let mut paragraphs = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:body" => {
                    in_body = true;
                    saw_body = true;
                }
                b"mc:Choice" => choice_depth += 1,
                b"w:t" if in_body && choice_depth == 0 => in_text = true,
                b"w:pPr" => in_ppr = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"w:body" => saw_body = true,
            Ok(Event::Empty(ref e)) if in_body && choice_depth == 0 => match e.name().as_ref() {
                // w:tab inside paragraph properties is a tab stop, not a character
                b"w:tab" if !in_ppr => output.push('\t'),
                b"w:br" | b"w:cr" => output.push('\n'),
                b"w:p" => {
                    output.push_str("\n\n");
                    paragraphs += 1;
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::XmlParse(err.to_string()))?;
                output.push_str(&text);
            }
            Ok(Event::CData(ref e)) if in_text => {
                output.push_str(&String::from_utf8_lossy(e));
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:body" => in_body = false,
                b"mc:Choice" => choice_depth = choice_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                b"w:pPr" => in_ppr = false,
                b"w:p" if in_body && choice_depth == 0 => {
                    output.push_str("\n\n");
                    paragraphs += 1;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !saw_body {
        return Err(Error::MissingComponent("w:body".to_string()));
    }

    debug!(paragraphs, chars = output.len(), "decoded document text");
    Ok(output)
}
