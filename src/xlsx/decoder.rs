//! Workbook decoding for SpreadsheetML archives.

use super::shared_strings::SharedStrings;
use crate::container::OoxmlContainer;
use crate::detect::is_zip_file;
use crate::error::{Error, Result};
use crate::model::{CellValue, Sheet, Workbook};
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

/// Default location of the workbook part.
const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Default location of the shared strings part.
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Sheet name used when the input is read as delimited text.
const TEXT_SHEET_NAME: &str = "Sheet1";

/// Worksheet bounds: rows 1..=1048576, columns A..=XFD.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Decode a workbook from raw bytes.
///
/// ZIP input is read as SpreadsheetML; an archive without workbook parts
/// decodes to an empty workbook. Input that is not a ZIP archive at all is
/// read as comma-delimited text into a single sheet. Only a corrupt archive
/// or malformed workbook XML is an error.
pub fn decode_workbook(data: &[u8]) -> Result<Workbook> {
    if !is_zip_file(data) {
        debug!(bytes = data.len(), "input is not a ZIP archive, reading as delimited text");
        return Ok(decode_delimited_text(data));
    }

    let container = OoxmlContainer::from_bytes(data)?;
    let workbook_part = container.main_part(WORKBOOK_PART);

    let xml = match container.read_xml(&workbook_part) {
        Ok(xml) => xml,
        Err(_) => {
            debug!(part = %workbook_part, "no workbook part, decoding as empty workbook");
            return Ok(Workbook::new());
        }
    };
    let sheets = parse_sheet_list(&xml)?;
    let rels = container
        .read_relationships(&workbook_part)
        .unwrap_or_default();

    let shared_strings_part = rels
        .find_type("/sharedStrings")
        .map(|rel| OoxmlContainer::resolve_path(&workbook_part, &rel.target))
        .unwrap_or_else(|| SHARED_STRINGS_PART.to_string());
    let shared_strings = match container.read_xml(&shared_strings_part) {
        Ok(xml) => SharedStrings::parse(&xml)?,
        Err(_) => SharedStrings::default(),
    };
    debug!(
        sheets = sheets.len(),
        shared_strings = shared_strings.len(),
        "parsed workbook"
    );

    let mut workbook = Workbook::new();
    for (idx, info) in sheets.into_iter().enumerate() {
        let part = match rels.get(&info.rel_id) {
            Some(rel) => OoxmlContainer::resolve_path(&workbook_part, &rel.target),
            None => format!("xl/worksheets/sheet{}.xml", idx + 1),
        };

        let mut sheet = Sheet::new(info.name);
        match container.read_xml(&part) {
            Ok(xml) => match parse_sheet_rows(&xml, &shared_strings) {
                Ok(rows) => sheet.rows = rows,
                Err(e) => warn!(sheet = %sheet.name, error = %e, "skipping unreadable sheet"),
            },
            Err(_) => warn!(sheet = %sheet.name, part = %part, "sheet part not found"),
        }
        workbook.add_sheet(sheet);
    }

    Ok(workbook)
}

/// Parse workbook.xml for the declared sheets, in order.
fn parse_sheet_list(xml: &str) -> Result<Vec<SheetInfo>> {
    let mut sheets = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                let mut name = String::new();
                let mut rel_id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => {
                            name = attr
                                .unescape_value()
                                .map(|v| v.into_owned())
                                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string());
                        }
                        _ if attr.key.local_name().as_ref() == b"id" => {
                            rel_id = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        _ => {}
                    }
                }

                if !name.is_empty() {
                    sheets.push(SheetInfo { name, rel_id });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// A cell collected while scanning a worksheet.
struct PlacedCell {
    row: usize,
    col: usize,
    value: CellValue,
}

/// Parse a worksheet into a dense, row-major grid.
///
/// Positions come from cell references (`B3`); gaps become `None`. The grid
/// starts at the first populated row and column.
fn parse_sheet_rows(xml: &str, shared: &SharedStrings) -> Result<Vec<Vec<Option<CellValue>>>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut cells: Vec<PlacedCell> = Vec::new();

    let mut next_row = 0usize;
    let mut row = 0usize;
    let mut next_col = 0usize;

    let mut in_cell = false;
    let mut in_value = false;
    let mut in_phonetic = false;
    let mut cell_pos = (0usize, 0usize);
    let mut cell_type: Option<String> = None;
    let mut cell_value = String::new();
    let mut has_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    row = row_index(e).unwrap_or(next_row);
                    next_col = 0;
                }
                b"c" => {
                    in_cell = true;
                    has_value = false;
                    cell_value.clear();
                    cell_type = attr_value(e, b"t");
                    cell_pos = attr_value(e, b"r")
                        .and_then(|r| parse_cell_ref(&r))
                        .unwrap_or((row, next_col));
                    next_col = cell_pos.1 + 1;
                }
                b"v" if in_cell => {
                    has_value = true;
                    in_value = true;
                }
                b"is" if in_cell => has_value = true,
                b"t" if in_cell => in_value = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    row = row_index(e).unwrap_or(next_row);
                    next_row = row + 1;
                }
                b"c" => {
                    next_col = attr_value(e, b"r")
                        .and_then(|r| parse_cell_ref(&r))
                        .map(|(_, col)| col + 1)
                        .unwrap_or(next_col + 1);
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_cell => {
                if in_value && !in_phonetic {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::XmlParse(err.to_string()))?;
                    cell_value.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"row" => next_row = row + 1,
                b"c" => {
                    let value = has_value
                        .then(|| resolve_cell_value(&cell_value, cell_type.as_deref(), shared))
                        .flatten();
                    if let Some(value) = value {
                        cells.push(PlacedCell {
                            row: cell_pos.0,
                            col: cell_pos.1,
                            value,
                        });
                    }
                    in_cell = false;
                    in_value = false;
                }
                b"v" | b"t" => in_value = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }

        buf.clear();
    }

    Ok(into_grid(cells))
}

fn into_grid(cells: Vec<PlacedCell>) -> Vec<Vec<Option<CellValue>>> {
    let (Some(min_row), Some(max_row), Some(min_col)) = (
        cells.iter().map(|c| c.row).min(),
        cells.iter().map(|c| c.row).max(),
        cells.iter().map(|c| c.col).min(),
    ) else {
        return Vec::new();
    };

    let mut grid: Vec<Vec<Option<CellValue>>> = vec![Vec::new(); max_row - min_row + 1];
    for cell in cells {
        let row = &mut grid[cell.row - min_row];
        let col = cell.col - min_col;
        if row.len() <= col {
            row.resize(col + 1, None);
        }
        row[col] = Some(cell.value);
    }
    grid
}

/// Resolve a raw cell value based on its type attribute.
///
/// Error cells (`#DIV/0!`, `#N/A`, ...) carry no value.
fn resolve_cell_value(
    value: &str,
    cell_type: Option<&str>,
    shared: &SharedStrings,
) -> Option<CellValue> {
    let resolved = match cell_type {
        Some("e") => return None,
        Some("s") => match value.trim().parse::<usize>().ok().and_then(|i| shared.get(i)) {
            Some(s) => CellValue::Text(s.to_string()),
            None => CellValue::Text(value.to_string()),
        },
        Some("b") => CellValue::Bool(matches!(value.trim(), "1" | "true" | "TRUE")),
        Some("str") | Some("inlineStr") | Some("d") => CellValue::Text(value.to_string()),
        _ => parse_scalar(value),
    };
    Some(resolved)
}

/// Interpret text as a finite number when possible.
fn parse_scalar(value: &str) -> CellValue {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(value.to_string()),
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Zero-based index from a row's `r` attribute; out-of-range values are
/// ignored so the row is placed after the previous one.
fn row_index(e: &BytesStart<'_>) -> Option<usize> {
    attr_value(e, b"r")?
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|r| (1..=MAX_ROWS).contains(r))
        .map(|r| r - 1)
}

/// Parse an A1-style cell reference into zero-based (row, column).
///
/// References outside `A1:XFD1048576` are rejected.
fn parse_cell_ref(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.trim();
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || letters.len() > 3 || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let col = letters
        .chars()
        .try_fold(0usize, |acc, c| {
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            acc.checked_mul(26)?.checked_add(digit)
        })?
        .checked_sub(1)?;
    let row = digits.parse::<usize>().ok()?.checked_sub(1)?;

    (row < MAX_ROWS && col < MAX_COLUMNS).then_some((row, col))
}

/// Read non-archive input as comma-delimited text in a single sheet.
fn decode_delimited_text(data: &[u8]) -> Workbook {
    let text = String::from_utf8_lossy(data);
    let mut sheet = Sheet::new(TEXT_SHEET_NAME);

    for line in text.lines() {
        let row = line
            .split(',')
            .map(|field| {
                let field = field.trim();
                if field.is_empty() {
                    None
                } else {
                    Some(parse_scalar(field))
                }
            })
            .collect();
        sheet.add_row(row);
    }

    let mut workbook = Workbook::new();
    workbook.add_sheet(sheet);
    workbook
}
