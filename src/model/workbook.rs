//! Decoded spreadsheet structures.

use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text (shared, inline, formula string, or date)
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
}

impl CellValue {
    /// Whether the value counts as empty when flattening rows.
    ///
    /// Empty strings, zero, NaN and `false` are all treated as empty.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Bool(b) => !b,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write_number(f, *n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Shortest round-trip form; magnitudes from 1e21 up and below 1e-6 switch
/// to exponent notation with an explicit sign (`1e+21`, `1.5e-7`).
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let magnitude = n.abs();
    if n == 0.0 {
        return f.write_str("0");
    }
    if magnitude.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                write!(f, "{}e+{}", mantissa, power)
            }
            _ => f.write_str(&exp),
        };
    }
    write!(f, "{}", n)
}

/// A worksheet as a dense, row-major grid. Missing cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Sheet name as declared in the workbook
    pub name: String,
    /// Rows of cells
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn add_row(&mut self, row: Vec<Option<CellValue>>) {
        self.rows.push(row);
    }

    /// Flatten the sheet into text lines.
    ///
    /// Blank cells are dropped, survivors are joined with `" | "`, and rows
    /// left with nothing are skipped.
    pub fn text_rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .flatten()
                    .filter(|cell| !cell.is_blank())
                    .map(|cell| cell.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// A decoded workbook with sheets in declared order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    /// Sheets in workbook order
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet.
    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Sheet names in declared order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
