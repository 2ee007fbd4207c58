//! Workbook fixtures written with rust_xlsxwriter

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::Path;

/// One fixture cell
#[derive(Debug, Clone, Copy)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    Empty,
}

pub use Cell::{Empty, Number as N, Text as T};

pub struct Sheet {
    pub name: &'static str,
    pub rows: Vec<Vec<Cell>>,
}

pub fn sheet(name: &'static str, rows: Vec<Vec<Cell>>) -> Sheet {
    Sheet { name, rows }
}

pub const OBJECT_HEADER: [Cell; 8] = [
    T("ClassName"),
    T("ItemName"),
    T("X"),
    T("Y"),
    T("Z"),
    T("Length"),
    T("Width"),
    T("Height"),
];

pub const LINK_HEADER: [Cell; 5] = [
    T("ClassName"),
    T("LinkName"),
    T("FromNode"),
    T("ToNode"),
    T("NetworkName"),
];

pub const VERTEX_HEADER: [Cell; 4] = [T("LinkName"), T("X"), T("Y"), T("Z")];

/// Header row followed by extra property headers
pub fn header(base: &[Cell], properties: &[&'static str]) -> Vec<Cell> {
    let mut row = base.to_vec();
    row.extend(properties.iter().copied().map(T));
    row
}

pub fn write_workbook(path: &Path, sheets: &[Sheet]) {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name).unwrap();
        for (row, cells) in sheet.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let (row, col) = (row as u32, col as u16);
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row, col, *text).unwrap();
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(row, col, *value).unwrap();
                    }
                    Cell::Empty => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}
