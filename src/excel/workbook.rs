//! Owned worksheet grids with 1-indexed cell access

use calamine::Data;

static EMPTY: Data = Data::Empty;

/// A named 2-D cell grid. Row 1 is the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    rows: Vec<Vec<Data>>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the last populated row (0 for an empty sheet)
    pub fn last_row(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Index of the widest row's last column
    pub fn last_column(&self) -> u32 {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at 1-based (row, col); anything outside the grid is empty
    pub fn cell(&self, row: u32, col: u32) -> &Data {
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .unwrap_or(&EMPTY)
    }

    /// Display text of a cell; `None` for empty and error cells
    pub fn text(&self, row: u32, col: u32) -> Option<String> {
        match self.cell(row, col) {
            Data::Empty | Data::Error(_) => None,
            Data::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Cell text, treating an empty string like a missing value
    pub fn required_text(&self, row: u32, col: u32) -> Option<String> {
        self.text(row, col).filter(|s| !s.is_empty())
    }

    /// Non-empty string cell; numbers and other typed cells give `None`
    pub fn required_string(&self, row: u32, col: u32) -> Option<String> {
        match self.cell(row, col) {
            Data::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Cell as a finite decimal. Numeric cells are taken directly, text
    /// cells are parsed after trimming, everything else fails.
    pub fn number(&self, row: u32, col: u32) -> Option<f64> {
        let value = match self.cell(row, col) {
            Data::Float(f) => Some(*f),
            Data::Int(i) => Some(*i as f64),
            Data::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Ordered, read-only set of worksheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Worksheet>) -> Self {
        Self { sheets }
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
