//! Per-sheet counts and diagnostics of one import run

use crate::import::SheetKind;
use crate::log::{ImportLog, Severity};
use serde::Serialize;

/// A skip/abort reason or count line recorded for a sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Outcome of importing one worksheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub kind: SheetKind,
    /// Data rows attempted (header excluded)
    pub rows_read: u32,
    pub added: u32,
    pub updated: u32,
    /// Rows abandoned before completion
    pub skipped: u32,
    /// Row whose failure stopped the rest of the sheet
    pub aborted_at: Option<u32>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SheetReport {
    pub fn new(sheet: impl Into<String>, kind: SheetKind) -> Self {
        Self {
            sheet: sheet.into(),
            kind,
            rows_read: 0,
            added: 0,
            updated: 0,
            skipped: 0,
            aborted_at: None,
            diagnostics: Vec::new(),
        }
    }

    /// Record a message in the log and keep it with this sheet
    pub fn note(&mut self, log: &mut dyn ImportLog, severity: Severity, message: String) {
        log.record(severity, &message);
        self.diagnostics.push(Diagnostic { severity, message });
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted_at.is_some()
    }
}

/// Everything one workbook import did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub sheets: Vec<SheetReport>,
    /// Vertices collected from Vertices sheets
    pub vertices_staged: usize,
}

impl ImportReport {
    pub fn sheets_of(&self, kind: SheetKind) -> impl Iterator<Item = &SheetReport> {
        self.sheets.iter().filter(move |s| s.kind == kind)
    }

    pub fn added(&self, kind: SheetKind) -> u32 {
        self.sheets_of(kind).map(|s| s.added).sum()
    }

    pub fn updated(&self, kind: SheetKind) -> u32 {
        self.sheets_of(kind).map(|s| s.updated).sum()
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetReport> {
        self.sheets.iter().find(|s| s.sheet == name)
    }

    /// Warnings and errors across all sheets
    pub fn problems(&self) -> impl Iterator<Item = (&str, &Diagnostic)> {
        self.sheets.iter().flat_map(|s| {
            s.diagnostics
                .iter()
                .filter(|d| d.severity >= Severity::Warning)
                .map(move |d| (s.sheet.as_str(), d))
        })
    }
}
