//! Objects sheets → fixed objects and nodes

use crate::error::ImportResult;
use crate::excel::Worksheet;
use crate::import::layout::{OBJECT_CLASS, OBJECT_LENGTH, OBJECT_NAME, OBJECT_PROPERTY_START, OBJECT_X};
use crate::import::properties::{apply_row_properties, HeaderColumns, OnFailure};
use crate::import::{drive_rows, Position, RowOutcome, SheetKind, SheetReport};
use crate::log::{ImportLog, Severity};
use crate::model::FacilityGraph;
use crate::types::{Location, Size};

/// Upserts one object per row: new names are created, known names updated
pub struct ObjectImporter<'a, G: FacilityGraph> {
    graph: &'a mut G,
    log: &'a mut dyn ImportLog,
}

impl<'a, G: FacilityGraph> ObjectImporter<'a, G> {
    pub fn new(graph: &'a mut G, log: &'a mut dyn ImportLog) -> Self {
        Self { graph, log }
    }

    /// Import every data row of an Objects sheet. Empty sheets yield `None`.
    pub fn import_sheet(
        &mut self,
        sheet: &Worksheet,
        position: &mut Position,
    ) -> ImportResult<Option<SheetReport>> {
        if sheet.is_empty() {
            return Ok(None);
        }

        let mut report = SheetReport::new(sheet.name(), SheetKind::Objects);
        let marker = format!(
            "Reading {} rows from Object sheet {}",
            sheet.last_row(),
            sheet.name()
        );
        position.stage(marker.clone());
        report.note(self.log, Severity::Information, marker);

        let headers = HeaderColumns::read(sheet, OBJECT_PROPERTY_START);
        drive_rows(sheet, position, &mut report, |row, marker, report| {
            self.import_row(sheet, row, marker, &headers, report)
        })?;

        let summary = format!(
            "Added {} objects and updated {} objects",
            report.added, report.updated
        );
        report.note(self.log, Severity::Information, summary);
        Ok(Some(report))
    }

    fn import_row(
        &mut self,
        sheet: &Worksheet,
        row: u32,
        marker: &str,
        headers: &HeaderColumns,
        report: &mut SheetReport,
    ) -> ImportResult<RowOutcome> {
        let (Some(class_name), Some(item_name)) = (
            sheet.required_text(row, OBJECT_CLASS),
            sheet.required_text(row, OBJECT_NAME),
        ) else {
            report.note(
                self.log,
                Severity::Warning,
                format!("{}: Empty ClassName or ItemName", marker),
            );
            return Ok(RowOutcome::SkipRow);
        };

        let coordinates = read_location(sheet, row);

        let id = match self.graph.find_object(&item_name) {
            None => {
                let location = coordinates.unwrap_or_default();
                let Some(id) = self.graph.create_object(&class_name, location) else {
                    report.note(
                        self.log,
                        Severity::Warning,
                        format!("{}: Cannot create object with className={}", marker, class_name),
                    );
                    return Ok(RowOutcome::SkipRow);
                };
                self.graph.set_object_name(id, &item_name)?;
                report.added += 1;
                id
            }
            Some(id) => {
                if let Some(location) = coordinates {
                    self.graph.set_location(id, location)?;
                }
                report.updated += 1;
                id
            }
        };

        let current = self.graph.size(id)?;
        let size = Size::new(
            size_axis(sheet.number(row, OBJECT_LENGTH), current.length),
            size_axis(sheet.number(row, OBJECT_LENGTH + 1), current.width),
            size_axis(sheet.number(row, OBJECT_LENGTH + 2), current.height),
        );
        self.graph.set_size(id, size)?;

        apply_row_properties(
            self.graph,
            id,
            sheet,
            row,
            headers,
            OnFailure::NextColumn,
            self.log,
            report,
        )?;

        Ok(RowOutcome::Continue)
    }
}

/// X, Y, Z when all three parse
fn read_location(sheet: &Worksheet, row: u32) -> Option<Location> {
    let x = sheet.number(row, OBJECT_X)?;
    let y = sheet.number(row, OBJECT_X + 1)?;
    let z = sheet.number(row, OBJECT_X + 2)?;
    Some(Location::new(x, y, z))
}

/// Unparsable and zero values keep the current extent
fn size_axis(parsed: Option<f64>, current: f64) -> f64 {
    match parsed {
        Some(value) if value != 0.0 => value,
        _ => current,
    }
}
