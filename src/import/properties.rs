//! Property columns: header matching and per-row assignment

use crate::error::ImportResult;
use crate::excel::Worksheet;
use crate::import::coder;
use crate::import::layout::HEADER_ROW;
use crate::import::report::SheetReport;
use crate::log::{ImportLog, Severity};
use crate::model::{FacilityGraph, ObjectId};
use std::collections::HashMap;

/// Property columns of a sheet with their lower-cased header names.
/// Columns with an empty header are left out.
#[derive(Debug, Clone, Default)]
pub struct HeaderColumns {
    columns: Vec<(u32, String)>,
}

impl HeaderColumns {
    pub fn read(sheet: &Worksheet, first_column: u32) -> Self {
        let columns = (first_column..=sheet.last_column())
            .filter_map(|col| {
                sheet
                    .required_text(HEADER_ROW, col)
                    .map(|name| (col, name.to_lowercase()))
            })
            .collect();
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.columns.iter().map(|(col, name)| (*col, name.as_str()))
    }
}

/// Lower-cased property name → property slot of one target object
#[derive(Debug, Clone, Default)]
pub struct PropertyIndex {
    slots: HashMap<String, usize>,
}

impl PropertyIndex {
    pub fn for_object<G: FacilityGraph>(graph: &G, id: ObjectId) -> ImportResult<Self> {
        let mut slots = HashMap::new();
        for (slot, name) in graph.property_names(id)?.into_iter().enumerate() {
            // First declaration wins when names differ only by case
            slots.entry(name.to_lowercase()).or_insert(slot);
        }
        Ok(Self { slots })
    }

    pub fn slot(&self, lower_name: &str) -> Option<usize> {
        self.slots.get(lower_name).copied()
    }
}

/// What a failed assignment does to the rest of the row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Log and try the next column
    NextColumn,
    /// Log and leave the row's remaining columns alone
    StopRow,
}

/// Assign this row's property cells to `id`.
///
/// Columns whose header names no property of the target, and empty cells,
/// are skipped. Returns the number of properties assigned.
#[allow(clippy::too_many_arguments)]
pub fn apply_row_properties<G: FacilityGraph>(
    graph: &mut G,
    id: ObjectId,
    sheet: &Worksheet,
    row: u32,
    headers: &HeaderColumns,
    on_failure: OnFailure,
    log: &mut dyn ImportLog,
    report: &mut SheetReport,
) -> ImportResult<usize> {
    if headers.is_empty() {
        return Ok(0);
    }

    let index = PropertyIndex::for_object(graph, id)?;
    let mut assigned = 0;

    for (col, header) in headers.iter() {
        let Some(slot) = index.slot(header) else {
            continue;
        };
        let Some(text) = sheet.text(row, col) else {
            continue;
        };

        let property = graph.property_mut(id, slot)?;
        match coder::decode(property, &text) {
            Ok(()) => assigned += 1,
            Err(e) => {
                report.note(log, Severity::Warning, e.to_string());
                if on_failure == OnFailure::StopRow {
                    break;
                }
            }
        }
    }

    Ok(assigned)
}
