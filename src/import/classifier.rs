//! Sheet classification by name prefix

use crate::excel::Worksheet;
use serde::Serialize;

/// Shortest sheet name considered for import
const MIN_SHEET_NAME_LEN: usize = 5;

/// Role of a worksheet in the import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SheetKind {
    Objects,
    Links,
    Vertices,
}

impl SheetKind {
    /// Classify by lower-cased literal prefix; `None` for sheets to ignore
    pub fn classify(sheet_name: &str) -> Option<SheetKind> {
        let name = sheet_name.to_lowercase();
        if name.chars().count() < MIN_SHEET_NAME_LEN {
            return None;
        }

        if name.starts_with("objects") {
            Some(SheetKind::Objects)
        } else if name.starts_with("links") {
            Some(SheetKind::Links)
        } else if name.starts_with("vertices") {
            Some(SheetKind::Vertices)
        } else {
            None
        }
    }
}

/// Workbook sheets bucketed by kind, each list in workbook order
#[derive(Debug, Default)]
pub struct ClassifiedSheets<'a> {
    pub objects: Vec<&'a Worksheet>,
    pub links: Vec<&'a Worksheet>,
    pub vertices: Vec<&'a Worksheet>,
}

impl ClassifiedSheets<'_> {
    /// A run needs at least one Objects or Links sheet
    pub fn has_importable(&self) -> bool {
        !(self.objects.is_empty() && self.links.is_empty())
    }
}

pub fn classify(sheets: &[Worksheet]) -> ClassifiedSheets<'_> {
    let mut classified = ClassifiedSheets::default();
    for sheet in sheets {
        match SheetKind::classify(sheet.name()) {
            Some(SheetKind::Objects) => classified.objects.push(sheet),
            Some(SheetKind::Links) => classified.links.push(sheet),
            Some(SheetKind::Vertices) => classified.vertices.push(sheet),
            None => {}
        }
    }
    classified
}
