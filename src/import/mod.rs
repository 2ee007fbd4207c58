//! Workbook → facility model import
//!
//! A run classifies the workbook's sheets, then inside one bulk update of the
//! target model:
//!
//! 1. upserts objects from every Objects sheet,
//! 2. stages vertices from every Vertices sheet,
//! 3. (re)creates links from every Links sheet using the staged vertices.
//!
//! Row and sheet failures are logged and the run continues; only fatal
//! failures are returned, tagged with the sheet and row being processed.

mod classifier;
mod coder;
pub mod layout;
mod links;
mod objects;
mod properties;
mod report;
mod vertices;

pub use classifier::{classify, ClassifiedSheets, SheetKind};
pub use coder::decode;
pub use links::LinkImporter;
pub use objects::ObjectImporter;
pub use properties::{HeaderColumns, OnFailure, PropertyIndex};
pub use report::{Diagnostic, ImportReport, SheetReport};
pub use vertices::VertexCollector;

use crate::error::{ImportError, ImportResult};
use crate::excel::{Workbook, Worksheet};
use crate::log::{compile_excludes, ExcludeLog, ImportLog};
use crate::model::{DesignContext, FacilityGraph};
use layout::FIRST_DATA_ROW;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Run options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Read Vertices sheets; when off, links get no intermediate vertices
    pub import_vertices: bool,
    /// Case-insensitive regexes hiding matching log messages
    pub log_excludes: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            import_vertices: true,
            log_excludes: Vec::new(),
        }
    }
}

/// What the driver loop does after a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Continue,
    /// Row abandoned; continue with the next one
    SkipRow,
    /// Stop this sheet; continue with the next sheet
    AbortSheet,
}

/// Last attempted operation, reported with fatal errors
#[derive(Debug, Clone)]
pub struct Position {
    marker: String,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    pub fn new() -> Self {
        Self {
            marker: "Begin.".to_string(),
        }
    }

    pub fn stage(&mut self, marker: impl Into<String>) {
        self.marker = marker.into();
    }

    pub fn enter(&mut self, sheet: &str, row: u32) {
        self.marker = format!("Sheet={} Row={}", sheet, row);
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

/// Run `import_row` over the data rows of `sheet`, honouring its outcomes
pub(crate) fn drive_rows<F>(
    sheet: &Worksheet,
    position: &mut Position,
    report: &mut SheetReport,
    mut import_row: F,
) -> ImportResult<()>
where
    F: FnMut(u32, &str, &mut SheetReport) -> ImportResult<RowOutcome>,
{
    for row in FIRST_DATA_ROW..=sheet.last_row() {
        position.enter(sheet.name(), row);
        report.rows_read += 1;

        match import_row(row, position.marker(), report)? {
            RowOutcome::Continue => {}
            RowOutcome::SkipRow => report.skipped += 1,
            RowOutcome::AbortSheet => {
                report.aborted_at = Some(row);
                debug!(sheet = sheet.name(), row, "sheet aborted");
                break;
            }
        }
    }
    Ok(())
}

/// Imports a workbook into a facility graph
#[derive(Debug, Clone, Default)]
pub struct FacilityImporter {
    options: ImportOptions,
}

impl FacilityImporter {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import into the context's active model
    pub fn execute<C: DesignContext>(
        &self,
        context: &mut C,
        workbook: &Workbook,
        log: &mut dyn ImportLog,
    ) -> ImportResult<ImportReport> {
        let graph = context.active_model_mut().ok_or(ImportError::NoActiveModel)?;
        self.import_into(graph, workbook, log)
    }

    pub fn import_into<G: FacilityGraph>(
        &self,
        graph: &mut G,
        workbook: &Workbook,
        log: &mut dyn ImportLog,
    ) -> ImportResult<ImportReport> {
        let excludes = compile_excludes(&self.options.log_excludes)?;
        let mut log = ExcludeLog::new(log, excludes);
        let log: &mut dyn ImportLog = &mut log;
        let mut position = Position::new();

        info!(progress = 25, "Checking worksheets");
        position.stage("Categorizing Worksheets.");
        let sheets = classify(workbook.sheets());
        if !sheets.has_importable() {
            log.error("Workbook contains no valid object or link worksheets.");
            return Err(ImportError::NoImportableSheets);
        }

        let mut report = ImportReport::default();
        graph.bulk_update(|graph| {
            self.run(graph, &sheets, log, &mut position, &mut report)
                .map_err(|e| e.at(position.marker()))
        })?;

        info!(
            progress = 100,
            objects_added = report.added(SheetKind::Objects),
            links_added = report.added(SheetKind::Links),
            "Complete"
        );
        Ok(report)
    }

    fn run<G: FacilityGraph>(
        &self,
        graph: &mut G,
        sheets: &ClassifiedSheets<'_>,
        log: &mut dyn ImportLog,
        position: &mut Position,
        report: &mut ImportReport,
    ) -> ImportResult<()> {
        info!(progress = 50, "Building objects");
        for sheet in &sheets.objects {
            let mut importer = ObjectImporter::new(graph, log);
            if let Some(sheet_report) = importer.import_sheet(sheet, position)? {
                report.sheets.push(sheet_report);
            }
        }

        let mut vertices = Vec::new();
        if self.options.import_vertices {
            for sheet in &sheets.vertices {
                let mut collector = VertexCollector::new(log);
                report
                    .sheets
                    .push(collector.collect(sheet, position, &mut vertices)?);
            }
        }
        report.vertices_staged = vertices.len();

        info!(progress = 75, "Building links");
        for sheet in &sheets.links {
            let mut importer = LinkImporter::new(graph, log, &vertices);
            report.sheets.push(importer.import_sheet(sheet, position)?);
        }

        Ok(())
    }
}
