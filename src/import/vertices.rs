//! Vertices sheets → staged link vertices

use crate::error::ImportResult;
use crate::excel::Worksheet;
use crate::import::layout::{VERTEX_LINK, VERTEX_X};
use crate::import::{drive_rows, Position, RowOutcome, SheetKind, SheetReport};
use crate::log::{ImportLog, Severity};
use crate::types::{Location, Vertex};

/// Reads vertex rows in order until the first invalid one
pub struct VertexCollector<'a> {
    log: &'a mut dyn ImportLog,
}

impl<'a> VertexCollector<'a> {
    pub fn new(log: &'a mut dyn ImportLog) -> Self {
        Self { log }
    }

    /// Append this sheet's vertices to `vertices`. An empty link name or a bad
    /// coordinate ends the sheet; rows already read stay staged.
    pub fn collect(
        &mut self,
        sheet: &Worksheet,
        position: &mut Position,
        vertices: &mut Vec<Vertex>,
    ) -> ImportResult<SheetReport> {
        let mut report = SheetReport::new(sheet.name(), SheetKind::Vertices);
        position.stage(format!("Reading Vertex sheet {}", sheet.name()));

        drive_rows(sheet, position, &mut report, |row, marker, report| {
            let Some(link_name) = sheet.required_string(row, VERTEX_LINK) else {
                report.note(self.log, Severity::Warning, format!("{}: No LinkName", marker));
                return Ok(RowOutcome::AbortSheet);
            };

            let coordinates = (
                sheet.number(row, VERTEX_X),
                sheet.number(row, VERTEX_X + 1),
                sheet.number(row, VERTEX_X + 2),
            );
            let (Some(x), Some(y), Some(z)) = coordinates else {
                report.note(
                    self.log,
                    Severity::Warning,
                    format!("{}: Bad Vertex Coordinate", marker),
                );
                return Ok(RowOutcome::AbortSheet);
            };

            vertices.push(Vertex::new(link_name, Location::new(x, y, z)));
            report.added += 1;
            Ok(RowOutcome::Continue)
        })?;

        let summary = format!("Staged {} vertices from sheet {}", report.added, sheet.name());
        report.note(self.log, Severity::Information, summary);
        Ok(report)
    }
}
