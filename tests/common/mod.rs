//! In-memory DOCX/XLSX fixtures for integration tests.

#![allow(dead_code)]

use officetext::CellValue;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_archive(parts: &[(String, String)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in parts {
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build a DOCX with one paragraph per entry.
pub fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            format!(
                r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                escape(p)
            )
        })
        .collect();

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>{}<w:sectPr/></w:body>
</w:document>"#,
        body
    );

    write_archive(&[
        (
            "[Content_Types].xml".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#
                .to_string(),
        ),
        (
            "_rels/.rels".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
                .to_string(),
        ),
        ("word/document.xml".to_string(), document),
    ])
}

/// A sheet fixture: name plus rows of optional cells.
pub type SheetFixture<'a> = (&'a str, Vec<Vec<Option<CellValue>>>);

fn column_name(mut col: usize) -> String {
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name
}

/// Build an XLSX workbook. Strings go through the shared strings table.
pub fn build_xlsx(sheets: &[SheetFixture<'_>]) -> Vec<u8> {
    let mut shared: Vec<String> = Vec::new();
    let mut parts: Vec<(String, String)> = Vec::new();

    let mut sheet_entries = String::new();
    let mut rel_entries = String::new();

    for (idx, (name, rows)) in sheets.iter().enumerate() {
        let n = idx + 1;
        sheet_entries.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            n,
            n
        ));
        rel_entries.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));

        let mut sheet_data = String::new();
        for (r, row) in rows.iter().enumerate() {
            sheet_data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, cell) in row.iter().enumerate() {
                let reference = format!("{}{}", column_name(c), r + 1);
                match cell {
                    None => {}
                    Some(CellValue::Text(s)) => {
                        let index = shared.iter().position(|x| x == s).unwrap_or_else(|| {
                            shared.push(s.clone());
                            shared.len() - 1
                        });
                        sheet_data.push_str(&format!(
                            r#"<c r="{}" t="s"><v>{}</v></c>"#,
                            reference, index
                        ));
                    }
                    Some(CellValue::Number(v)) => {
                        sheet_data.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, v));
                    }
                    Some(CellValue::Bool(b)) => {
                        sheet_data.push_str(&format!(
                            r#"<c r="{}" t="b"><v>{}</v></c>"#,
                            reference,
                            if *b { 1 } else { 0 }
                        ));
                    }
                }
            }
            sheet_data.push_str("</row>");
        }

        let sheet_xml = if sheet_data.is_empty() {
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#.to_string()
        } else {
            format!(
                r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                sheet_data
            )
        };
        parts.push((format!("xl/worksheets/sheet{}.xml", n), sheet_xml));
    }

    rel_entries.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheets.len() + 1
    ));

    let sst: String = shared
        .iter()
        .map(|s| format!("<si><t>{}</t></si>", escape(s)))
        .collect();

    parts.push((
        "[Content_Types].xml".to_string(),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#
            .to_string(),
    ));
    parts.push((
        "_rels/.rels".to_string(),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
            .to_string(),
    ));
    parts.push((
        "xl/workbook.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            sheet_entries
        ),
    ));
    parts.push((
        "xl/_rels/workbook.xml.rels".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rel_entries
        ),
    ));
    parts.push((
        "xl/sharedStrings.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#,
            sst
        ),
    ));

    write_archive(&parts)
}

pub fn text(s: &str) -> Option<CellValue> {
    Some(CellValue::Text(s.to_string()))
}

pub fn number(n: f64) -> Option<CellValue> {
    Some(CellValue::Number(n))
}

/// The "People" sheet used across tests.
pub fn people_sheet() -> Vec<Vec<Option<CellValue>>> {
    vec![
        vec![text("Name"), text("Age"), text("City")],
        vec![text("Alice"), number(30.0), text("Berlin")],
        vec![text("Bob"), None, text("Paris")],
        vec![text("Charlie"), number(25.0), text("London")],
    ]
}
