//! Facility Import - spreadsheet import of facility layouts
//!
//! This library reads a workbook of object, link and vertex sheets and
//! upserts its contents into a facility model graph.
//!
//! # Features
//!
//! - Sheet classification by name prefix (`objects*`, `links*`, `vertices*`)
//! - Object upsert with location, size and property columns
//! - Link replacement with staged vertices and network membership
//! - Repeating (tabular) property decoding from a single cell
//! - Row/sheet level recovery with a detailed import log
//!
//! # Example
//!
//! ```no_run
//! use facility_import::excel::open_workbook;
//! use facility_import::import::FacilityImporter;
//! use facility_import::log::MemoryLog;
//! use facility_import::model::{ClassCatalog, FacilityModel};
//! use std::path::Path;
//!
//! let workbook = open_workbook(Path::new("layout.xlsx"))?;
//! let mut model = FacilityModel::new("Plant", ClassCatalog::standard());
//! let mut log = MemoryLog::new();
//!
//! let report = FacilityImporter::default().import_into(&mut model, &workbook, &mut log)?;
//! println!("Sheets: {}", report.sheets.len());
//! println!("Objects: {}", model.objects().len());
//! # Ok::<(), facility_import::error::ImportError>(())
//! ```

pub mod cli;
pub mod error;
pub mod excel;
pub mod import;
pub mod log;
pub mod model;
pub mod types;

// Re-export commonly used types
pub use error::{ImportError, ImportResult, PropertyError};
pub use import::{FacilityImporter, ImportOptions, ImportReport};
pub use types::{Location, Property, PropertyDefinition, PropertyType, Size, Vertex};
