//! Workbook reader - spreadsheet file → [`Workbook`]

use crate::error::{ImportError, ImportResult};
use crate::excel::{Workbook, Worksheet};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

/// Load every worksheet of an `.xlsx`, `.xlsm`, `.xls` or `.ods` file
pub fn open_workbook<P: AsRef<Path>>(path: P) -> ImportResult<Workbook> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        ImportError::Workbook(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            ImportError::Workbook(format!("Failed to read sheet {}: {}", sheet_name, e))
        })?;
        sheets.push(worksheet_from_range(sheet_name, &range));
    }

    Ok(Workbook::new(sheets))
}

/// Copy a calamine range into an owned grid anchored at A1.
///
/// Ranges that start below or right of A1 are padded with empty cells so
/// that worksheet coordinates match the spreadsheet's.
pub fn worksheet_from_range(name: String, range: &Range<Data>) -> Worksheet {
    let Some((end_row, end_col)) = range.end() else {
        return Worksheet::new(name, Vec::new());
    };

    let rows = (0..=end_row)
        .map(|row| {
            (0..=end_col)
                .map(|col| range.get_value((row, col)).cloned().unwrap_or(Data::Empty))
                .collect()
        })
        .collect();

    Worksheet::new(name, rows)
}
