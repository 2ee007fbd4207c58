//! Workbook access
//!
//! The importer reads cells through [`Workbook`] and [`Worksheet`], owned
//! 1-indexed grids loaded once from disk with `calamine`.

mod reader;
mod workbook;

pub use reader::{open_workbook, worksheet_from_range};
pub use workbook::{Workbook, Worksheet};
