//! Links sheets → links between nodes

use crate::error::ImportResult;
use crate::excel::Worksheet;
use crate::import::layout::{LINK_CLASS, LINK_FROM, LINK_NAME, LINK_NETWORK, LINK_PROPERTY_START, LINK_TO};
use crate::import::properties::{apply_row_properties, HeaderColumns, OnFailure};
use crate::import::{drive_rows, Position, RowOutcome, SheetKind, SheetReport};
use crate::log::{ImportLog, Severity};
use crate::model::{FacilityGraph, ObjectId};
use crate::types::{Location, Vertex};

/// Replaces or creates one link per row. Existing links of the same name are
/// removed and rebuilt so their endpoints and vertices always match the sheet.
pub struct LinkImporter<'a, G: FacilityGraph> {
    graph: &'a mut G,
    log: &'a mut dyn ImportLog,
    vertices: &'a [Vertex],
}

impl<'a, G: FacilityGraph> LinkImporter<'a, G> {
    pub fn new(graph: &'a mut G, log: &'a mut dyn ImportLog, vertices: &'a [Vertex]) -> Self {
        Self {
            graph,
            log,
            vertices,
        }
    }

    pub fn import_sheet(
        &mut self,
        sheet: &Worksheet,
        position: &mut Position,
    ) -> ImportResult<SheetReport> {
        let mut report = SheetReport::new(sheet.name(), SheetKind::Links);
        let marker = format!(
            "Reading {} rows from Link sheet {}",
            sheet.last_row(),
            sheet.name()
        );
        position.stage(marker.clone());
        report.note(self.log, Severity::Information, marker);

        let headers = HeaderColumns::read(sheet, LINK_PROPERTY_START);
        drive_rows(sheet, position, &mut report, |row, marker, report| {
            self.import_row(sheet, row, marker, &headers, report)
        })?;

        let summary = format!(
            "Added {} links and deleted and re-added {} existing links",
            report.added, report.updated
        );
        report.note(self.log, Severity::Information, summary);
        Ok(report)
    }

    fn import_row(
        &mut self,
        sheet: &Worksheet,
        row: u32,
        marker: &str,
        headers: &HeaderColumns,
        report: &mut SheetReport,
    ) -> ImportResult<RowOutcome> {
        let [class_name, link_name, from_name, to_name] = match required_fields(sheet, row) {
            Ok(fields) => fields,
            Err(label) => {
                report.note(self.log, Severity::Warning, format!("{}: Invalid {}", marker, label));
                return Ok(RowOutcome::SkipRow);
            }
        };

        let Some(from) = self.resolve_node(&from_name) else {
            report.note(
                self.log,
                Severity::Warning,
                format!("{}: Cannot find 'from' node name {}", marker, from_name),
            );
            return Ok(RowOutcome::AbortSheet);
        };
        let Some(to) = self.resolve_node(&to_name) else {
            report.note(
                self.log,
                Severity::Warning,
                format!("{}: Cannot find 'to' node name {}", marker, to_name),
            );
            return Ok(RowOutcome::AbortSheet);
        };

        match self.graph.find_object(&link_name) {
            Some(existing) => {
                self.graph.remove_object(existing)?;
                report.updated += 1;
            }
            None => report.added += 1,
        }

        let path: Vec<Location> = self
            .vertices
            .iter()
            .filter(|v| v.link_name == link_name)
            .map(|v| v.location)
            .collect();

        let Some(link) = self.graph.create_link(&class_name, from, to, &path) else {
            report.note(
                self.log,
                Severity::Warning,
                format!(
                    "{}: Cannot create Link with className={} from {} to {}",
                    marker, class_name, from_name, to_name
                ),
            );
            return Ok(RowOutcome::AbortSheet);
        };
        self.graph.set_object_name(link, &link_name)?;

        let Some(network_name) = sheet.required_string(row, LINK_NETWORK) else {
            report.note(self.log, Severity::Warning, format!("{}: Null NetworkName", marker));
            return Ok(RowOutcome::SkipRow);
        };
        let network = self.graph.get_or_create_network(&network_name)?;
        self.graph.add_to_network(link, network)?;

        apply_row_properties(
            self.graph,
            link,
            sheet,
            row,
            headers,
            OnFailure::StopRow,
            self.log,
            report,
        )?;

        Ok(RowOutcome::Continue)
    }

    /// Object of that name, provided it is a node
    fn resolve_node(&self, name: &str) -> Option<ObjectId> {
        self.graph
            .find_object(name)
            .filter(|id| self.graph.is_node(*id))
    }
}

/// ClassName, LinkName, FromNodeName, ToNodeName; `Err` names the first missing one
fn required_fields(sheet: &Worksheet, row: u32) -> Result<[String; 4], &'static str> {
    let read = |col: u32, label: &'static str| sheet.required_string(row, col).ok_or(label);
    Ok([
        read(LINK_CLASS, "ClassName")?,
        read(LINK_NAME, "LinkName")?,
        read(LINK_FROM, "FromNodeName")?,
        read(LINK_TO, "ToNodeName")?,
    ])
}
