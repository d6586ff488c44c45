//! In-memory OOXML package access.
//!
//! Only the pieces the extractors need: opening the archive, reading a part
//! as text, and following relationships to the parts they name.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::cell::RefCell;
use std::io::{Cursor, Read};
use tracing::debug;

/// Package-level relationships part.
const PACKAGE_RELS: &str = "_rels/.rels";

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// Relationships declared by a single part, in document order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Look up a relationship by its `Id`.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.id == id)
    }

    /// First relationship whose type URI ends with `suffix`.
    ///
    /// Matching on the suffix accepts both the transitional and the strict
    /// OOXML namespaces (`.../officeDocument/2006/relationships/worksheet`
    /// and `http://purl.oclc.org/ooxml/.../worksheet`).
    pub fn find_type(&self, suffix: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.rel_type.ends_with(suffix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode a part to text.
///
/// Parts are UTF-8 in practice; a byte order mark selects UTF-8 or UTF-16
/// explicitly. Decoded UTF-16 has its declaration rewritten so quick-xml
/// does not try to transcode it a second time.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(invalid_data);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(|s| declare_utf8(&s));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(|s| declare_utf8(&s));
    }

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(invalid_data)
}

fn invalid_data<E>(err: E) -> Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
}

/// Replace a UTF-16 `encoding` pseudo-attribute in the XML declaration.
fn declare_utf8(content: &str) -> String {
    let Some(end) = content
        .strip_prefix("<?xml")
        .and_then(|_| content.find("?>"))
    else {
        return content.to_string();
    };

    let (decl, rest) = content.split_at(end);
    let lower = decl.to_ascii_lowercase();
    match lower.find("utf-16") {
        Some(pos) => format!("{}UTF-8{}{}", &decl[..pos], &decl[pos + 6..], rest),
        None => content.to_string(),
    }
}

/// A ZIP-packaged OOXML document over a borrowed buffer.
pub struct OoxmlContainer<'a> {
    archive: RefCell<zip::ZipArchive<Cursor<&'a [u8]>>>,
}

impl<'a> OoxmlContainer<'a> {
    /// Open a container over a byte slice.
    ///
    /// Fails when the bytes are not a readable ZIP archive.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use officetext::container::OoxmlContainer;
    ///
    /// let data = std::fs::read("document.docx")?;
    /// let container = OoxmlContainer::from_bytes(&data)?;
    /// let xml = container.read_xml(&container.main_part("word/document.xml"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        debug!(entries = archive.len(), "opened OOXML container");
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read a part as text. A part that is not in the archive is
    /// `MissingComponent`.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_xml_bytes(&bytes)
    }

    /// Relationships declared by `part`, read from `<dir>/_rels/<name>.rels`.
    ///
    /// A part without a relationships file has none.
    pub fn read_relationships(&self, part: &str) -> Result<Relationships> {
        let rels_path = match part.rsplit_once('/') {
            Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
            None if part.is_empty() => PACKAGE_RELS.to_string(),
            None => format!("_rels/{}.rels", part),
        };
        self.parse_relationships(&rels_path)
    }

    /// Locate the main document part through the package relationships,
    /// falling back to `default`.
    pub fn main_part(&self, default: &str) -> String {
        self.parse_relationships(PACKAGE_RELS)
            .ok()
            .and_then(|rels| {
                rels.find_type("/officeDocument")
                    .map(|rel| Self::resolve_path("", &rel.target))
            })
            .unwrap_or_else(|| default.to_string())
    }

    fn parse_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let xml = match self.read_xml(rels_path) {
            Ok(xml) => xml,
            Err(Error::MissingComponent(_)) => return Ok(Relationships::default()),
            Err(e) => return Err(e),
        };

        let mut reader = quick_xml::Reader::from_str(&xml);
        let mut rels = Relationships::default();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                    };
                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                        match attr.key.as_ref() {
                            b"Id" => rel.id = value,
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            _ => {}
                        }
                    }
                    if !rel.id.is_empty() {
                        rels.entries.push(rel);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
        }

        debug!(path = rels_path, count = rels.len(), "read relationships");
        Ok(rels)
    }

    /// Resolve a relationship target against the part that declares it.
    ///
    /// Absolute targets (`/xl/...`) are taken from the package root; `..`
    /// segments pop the base directory.
    pub fn resolve_path(base: &str, target: &str) -> String {
        if let Some(absolute) = target.strip_prefix('/') {
            return absolute.to_string();
        }

        let mut segments: Vec<&str> = match base.rsplit_once('/') {
            Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
            None => Vec::new(),
        };
        for segment in target.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        segments.join("/")
    }
}

impl std::fmt::Debug for OoxmlContainer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("entries", &self.archive.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_archive(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "../media/image1.png"),
            "media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("xl/workbook.xml", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("xl/workbook.xml", "./sharedStrings.xml"),
            "xl/sharedStrings.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("", "word/document.xml"),
            "word/document.xml"
        );
    }

    #[test]
    fn test_rejects_non_zip() {
        let result = OoxmlContainer::from_bytes(b"definitely not a zip archive");
        assert!(matches!(result, Err(Error::ZipArchive(_))));
    }

    #[test]
    fn test_read_parts() {
        let data = build_archive(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", "<w:document/>"),
        ]);
        let container = OoxmlContainer::from_bytes(&data).unwrap();

        assert_eq!(container.read_xml("word/document.xml").unwrap(), "<w:document/>");
        assert!(matches!(
            container.read_xml("word/missing.xml"),
            Err(Error::MissingComponent(_))
        ));
        assert_eq!(format!("{:?}", container), "OoxmlContainer { entries: 2 }");
    }

    #[test]
    fn test_main_part_from_package_rels() {
        let rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/document2.xml"/>
</Relationships>"#;
        let data = build_archive(&[("_rels/.rels", rels)]);
        let container = OoxmlContainer::from_bytes(&data).unwrap();
        assert_eq!(container.main_part("word/document.xml"), "word/document2.xml");

        let bare = build_archive(&[("word/document.xml", "<w:document/>")]);
        let container = OoxmlContainer::from_bytes(&bare).unwrap();
        assert_eq!(container.main_part("word/document.xml"), "word/document.xml");
    }

    #[test]
    fn test_main_part_strict_namespace() {
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
        let data = build_archive(&[("_rels/.rels", rels)]);
        let container = OoxmlContainer::from_bytes(&data).unwrap();
        assert_eq!(container.main_part("word/document.xml"), "xl/workbook.xml");
    }

    #[test]
    fn test_part_relationships() {
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://test/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://test/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;
        let data = build_archive(&[("xl/_rels/workbook.xml.rels", rels)]);
        let container = OoxmlContainer::from_bytes(&data).unwrap();

        let parsed = container.read_relationships("xl/workbook.xml").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("rId1").unwrap().target, "worksheets/sheet1.xml");
        assert!(parsed.get("rId3").is_none());
        assert_eq!(parsed.find_type("/sharedStrings").unwrap().id, "rId2");

        // No .rels file means no relationships rather than an error
        let none = container.read_relationships("word/document.xml").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_malformed_relationships_fail() {
        let data = build_archive(&[("xl/_rels/workbook.xml.rels", "<Relationships><Relationship Id=\"rId1\"></Oops>")]);
        let container = OoxmlContainer::from_bytes(&data).unwrap();
        assert!(matches!(
            container.read_relationships("xl/workbook.xml"),
            Err(Error::XmlParse(_))
        ));
    }

    #[test]
    fn test_byte_order_marks() {
        assert_eq!(decode_xml_bytes(b"\xFF\xFE<\0a\0/\0>\0").unwrap(), "<a/>");
        assert_eq!(decode_xml_bytes(b"\xFE\xFF\0<\0a\0/\0>").unwrap(), "<a/>");
        assert_eq!(decode_xml_bytes(b"\xEF\xBB\xBF<a/>").unwrap(), "<a/>");
        assert_eq!(decode_xml_bytes(b"<a/>").unwrap(), "<a/>");
    }

    #[test]
    fn test_utf16_declaration_is_rewritten() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(
            decode_xml_bytes(&bytes).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>"
        );
    }
}
