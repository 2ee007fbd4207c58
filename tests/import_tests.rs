//! End-to-end import tests against real .xlsx workbooks

mod common;

use common::*;
use facility_import::error::{ImportError, ImportResult};
use facility_import::excel::open_workbook;
use facility_import::import::{FacilityImporter, ImportOptions, ImportReport, SheetKind};
use facility_import::log::MemoryLog;
use facility_import::model::{ClassCatalog, FacilityGraph, FacilityModel, NetworkId, ObjectId};
use facility_import::types::{Location, Property, Size};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn run(
    model: &mut impl FacilityGraph,
    sheets: &[Sheet],
    options: ImportOptions,
) -> (ImportResult<ImportReport>, MemoryLog) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.xlsx");
    write_workbook(&path, sheets);

    let workbook = open_workbook(&path).unwrap();
    let mut log = MemoryLog::new();
    let result = FacilityImporter::new(options).import_into(model, &workbook, &mut log);
    (result, log)
}

fn import(model: &mut FacilityModel, sheets: &[Sheet]) -> (ImportReport, MemoryLog) {
    let (result, log) = run(model, sheets, ImportOptions::default());
    (result.unwrap(), log)
}

fn new_model() -> FacilityModel {
    FacilityModel::new("Plant", ClassCatalog::standard())
}

fn nodes_sheet(name: &'static str) -> Sheet {
    sheet(
        name,
        vec![
            OBJECT_HEADER.to_vec(),
            vec![T("BasicNode"), T("A"), N(0.0), N(0.0), N(0.0)],
            vec![T("BasicNode"), T("B"), N(10.0), N(0.0), N(0.0)],
            vec![T("TransferNode"), T("C"), N(20.0), N(0.0), N(0.0)],
        ],
    )
}

fn link_row(class: &'static str, name: &'static str, from: &'static str, to: &'static str) -> Vec<Cell> {
    vec![T(class), T(name), T(from), T(to), T("Main")]
}

// ═══════════════════════════════════════════════════════════════════════════
// CLASSIFICATION AND PASS ORDER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sheets_classified_by_prefix() {
    let mut model = new_model();
    let (report, _) = import(
        &mut model,
        &[
            nodes_sheet("Objects-Floor1"),
            sheet(
                "Summary",
                vec![OBJECT_HEADER.to_vec(), vec![T("Server"), T("Ignored")]],
            ),
            sheet(
                "linksMain",
                vec![LINK_HEADER.to_vec(), link_row("Path", "AB", "A", "B")],
            ),
        ],
    );

    let names: Vec<&str> = report.sheets.iter().map(|s| s.sheet.as_str()).collect();
    assert_eq!(names, vec!["Objects-Floor1", "linksMain"]);
    assert!(model.object_by_name("Ignored").is_none());
    assert!(model.object_by_name("AB").is_some());
}

#[test]
fn test_links_sheet_before_objects_sheet() {
    let mut model = new_model();
    let (report, _) = import(
        &mut model,
        &[
            sheet(
                "Links",
                vec![LINK_HEADER.to_vec(), link_row("Path", "AB", "A", "B")],
            ),
            nodes_sheet("Objects"),
        ],
    );

    assert_eq!(report.sheets[0].kind, SheetKind::Objects);
    assert_eq!(report.added(SheetKind::Links), 1);
}

#[test]
fn test_workbook_without_importable_sheets() {
    let mut model = new_model();
    let (result, log) = run(
        &mut model,
        &[
            sheet("Vertices", vec![VERTEX_HEADER.to_vec()]),
            sheet("Notes", vec![vec![T("hello")]]),
        ],
        ImportOptions::default(),
    );

    assert!(matches!(result, Err(ImportError::NoImportableSheets)));
    assert_eq!(
        log.messages(),
        vec!["Workbook contains no valid object or link worksheets."]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// OBJECTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_objects_reimport_updates() {
    let mut model = new_model();
    let objects = || {
        sheet(
            "Objects",
            vec![
                OBJECT_HEADER.to_vec(),
                vec![T("Server"), T("Drill"), N(1.0), N(2.0), N(0.0), N(3.0), N(2.0), N(1.0)],
            ],
        )
    };

    let (first, _) = import(&mut model, &[objects()]);
    let (second, _) = import(&mut model, &[objects()]);

    assert_eq!(first.added(SheetKind::Objects), 1);
    assert_eq!(second.added(SheetKind::Objects), 0);
    assert_eq!(second.updated(SheetKind::Objects), 1);
    assert_eq!(model.objects().len(), 1);
    let drill = model.object_by_name("Drill").unwrap();
    assert_eq!(drill.location, Location::new(1.0, 2.0, 0.0));
    assert_eq!(drill.size, Size::new(3.0, 2.0, 1.0));
}

#[test]
fn test_zero_and_blank_sizes_keep_current_axis() {
    let mut model = new_model();
    let id = model.create_object("Server", Location::default()).unwrap();
    model.set_object_name(id, "Drill").unwrap();
    model.set_size(id, Size::new(10.0, 20.0, 30.0)).unwrap();

    import(
        &mut model,
        &[sheet(
            "Objects",
            vec![
                OBJECT_HEADER.to_vec(),
                vec![T("Server"), T("Drill"), Empty, Empty, Empty, N(0.0), T(""), N(40.0)],
            ],
        )],
    );

    assert_eq!(model.object(id).unwrap().size, Size::new(10.0, 20.0, 40.0));
}

#[test]
fn test_property_columns() {
    let mut model = new_model();
    let (report, log) = import(
        &mut model,
        &[sheet(
            "Objects",
            vec![
                header(&OBJECT_HEADER, &["initialcapacity", "ProcessingTime", "Colour"]),
                vec![
                    T("Server"), T("Drill"), N(0.0), N(0.0), N(0.0), Empty, Empty, Empty,
                    N(3.0), T("Random.Exponential(5)"), T("Red"),
                ],
                vec![
                    T("Server"), T("Lathe"), N(5.0), N(0.0), N(0.0), Empty, Empty, Empty,
                    T("two"), T("4"),
                ],
            ],
        )],
    );

    let drill = model.object_by_name("Drill").unwrap();
    assert_eq!(drill.property("InitialCapacity").unwrap().value, "3");
    assert_eq!(drill.property("ProcessingTime").unwrap().value, "Random.Exponential(5)");

    let lathe = model.object_by_name("Lathe").unwrap();
    assert_eq!(lathe.property("InitialCapacity").unwrap().value, "1");
    assert_eq!(lathe.property("ProcessingTime").unwrap().value, "4");

    assert_eq!(report.problems().count(), 1);
    assert!(log
        .messages()
        .contains(&"Property=InitialCapacity Value=two Err=expected a number"));
}

#[test]
fn test_repeating_property_from_cell() {
    let mut model = new_model();
    import(
        &mut model,
        &[sheet(
            "Objects",
            vec![
                header(&OBJECT_HEADER, &["AssignmentsOnEntering"]),
                vec![
                    T("Server"), T("Drill"), N(0.0), N(0.0), N(0.0), Empty, Empty, Empty,
                    T("1 Row;AssignmentsOnEnteringStateVariableName;ModelEntity.Picture~AssignmentsOnEnteringNewValue;1"),
                ],
            ],
        )],
    );

    let drill = model.object_by_name("Drill").unwrap();
    let assignments = drill.property("AssignmentsOnEntering").unwrap();
    assert_eq!(assignments.value, "1 Row");

    let table = assignments.repeating.as_ref().unwrap();
    assert_eq!(table.row_count(), 1);
    let row = &table.rows[0];
    assert_eq!(
        row.field("AssignmentsOnEnteringStateVariableName").unwrap().value,
        "ModelEntity.Picture"
    );
    assert_eq!(row.field("AssignmentsOnEnteringNewValue").unwrap().value, "1");
}

// ═══════════════════════════════════════════════════════════════════════════
// VERTICES AND LINKS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_links_reimport_replaces() {
    let mut model = new_model();
    let sheets = || {
        vec![
            nodes_sheet("Objects"),
            sheet(
                "Links",
                vec![LINK_HEADER.to_vec(), link_row("Conveyor", "AB", "A", "B")],
            ),
        ]
    };

    let (first, _) = import(&mut model, &sheets());
    let (second, _) = import(&mut model, &sheets());

    assert_eq!(first.added(SheetKind::Links), 1);
    assert_eq!(second.added(SheetKind::Links), 0);
    assert_eq!(second.updated(SheetKind::Links), 1);
    assert_eq!(model.links().count(), 1);
    assert_eq!(model.networks().len(), 1);
}

#[test]
fn test_bad_vertex_row_halts_sheet() {
    let mut model = new_model();
    let (report, _) = import(
        &mut model,
        &[
            nodes_sheet("Objects"),
            sheet(
                "Vertices",
                vec![
                    VERTEX_HEADER.to_vec(),
                    vec![T("L1"), N(0.0), N(0.0), N(0.0)],
                    vec![T("L1"), N(1.0), N(0.0), N(0.0)],
                    vec![T("BAD"), T("x"), T("notanumber"), N(0.0)],
                    vec![T("L1"), N(5.0), N(5.0), N(5.0)],
                ],
            ),
            sheet(
                "Links",
                vec![LINK_HEADER.to_vec(), link_row("Path", "L1", "A", "B")],
            ),
        ],
    );

    assert_eq!(report.vertices_staged, 2);
    assert_eq!(report.sheet("Vertices").unwrap().aborted_at, Some(4));
    let link = model.object_by_name("L1").unwrap().link.as_ref().unwrap();
    assert_eq!(
        link.vertices,
        vec![Location::new(0.0, 0.0, 0.0), Location::new(1.0, 0.0, 0.0)]
    );
}

#[test]
fn test_vertices_can_be_switched_off() {
    let mut model = new_model();
    let (result, _) = run(
        &mut model,
        &[
            nodes_sheet("Objects"),
            sheet(
                "Vertices",
                vec![VERTEX_HEADER.to_vec(), vec![T("AB"), N(5.0), N(0.0), N(0.0)]],
            ),
            sheet(
                "Links",
                vec![LINK_HEADER.to_vec(), link_row("Path", "AB", "A", "B")],
            ),
        ],
        ImportOptions {
            import_vertices: false,
            ..Default::default()
        },
    );

    let report = result.unwrap();
    assert_eq!(report.vertices_staged, 0);
    assert!(report.sheet("Vertices").is_none());
    let link = model.object_by_name("AB").unwrap().link.as_ref().unwrap();
    assert!(link.vertices.is_empty());
}

#[test]
fn test_unresolved_endpoint_only_stops_its_sheet() {
    let mut model = new_model();
    let (report, log) = import(
        &mut model,
        &[
            nodes_sheet("Objects"),
            sheet(
                "Links1",
                vec![
                    LINK_HEADER.to_vec(),
                    link_row("Path", "XB", "Nowhere", "B"),
                    link_row("Path", "AB", "A", "B"),
                ],
            ),
            sheet(
                "Links2",
                vec![LINK_HEADER.to_vec(), link_row("TimePath", "BC", "B", "C")],
            ),
        ],
    );

    assert_eq!(report.sheet("Links1").unwrap().aborted_at, Some(2));
    assert!(model.object_by_name("AB").is_none());
    assert!(model.object_by_name("BC").is_some());
    assert!(log
        .messages()
        .contains(&"Sheet=Links1 Row=2: Cannot find 'from' node name Nowhere"));
}

#[test]
fn test_link_properties_skip_blank_headers() {
    let mut model = new_model();
    let mut link_header = LINK_HEADER.to_vec();
    link_header.extend([Empty, T("SpeedLimit")]);
    let mut row = link_row("Path", "AB", "A", "B");
    row.extend([T("junk"), N(2.5)]);

    import(
        &mut model,
        &[nodes_sheet("Objects"), sheet("Links", vec![link_header, row])],
    );

    let link = model.object_by_name("AB").unwrap();
    assert_eq!(link.property("SpeedLimit").unwrap().value, "2.5");
}

// ═══════════════════════════════════════════════════════════════════════════
// BATCHING AND FATAL ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_is_one_model_change() {
    let mut model = new_model();
    let before = model.revision();

    import(
        &mut model,
        &[
            nodes_sheet("Objects"),
            sheet(
                "Links",
                vec![LINK_HEADER.to_vec(), link_row("Path", "AB", "A", "B")],
            ),
        ],
    );

    assert_eq!(model.revision(), before + 1);
}

/// A model whose objects cannot be resized
struct LockedSizes(FacilityModel);

impl FacilityGraph for LockedSizes {
    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.0.find_object(name)
    }
    fn is_node(&self, id: ObjectId) -> bool {
        self.0.is_node(id)
    }
    fn create_object(&mut self, class_name: &str, location: Location) -> Option<ObjectId> {
        self.0.create_object(class_name, location)
    }
    fn create_link(
        &mut self,
        class_name: &str,
        from: ObjectId,
        to: ObjectId,
        vertices: &[Location],
    ) -> Option<ObjectId> {
        self.0.create_link(class_name, from, to, vertices)
    }
    fn remove_object(&mut self, id: ObjectId) -> ImportResult<()> {
        self.0.remove_object(id)
    }
    fn set_object_name(&mut self, id: ObjectId, name: &str) -> ImportResult<()> {
        self.0.set_object_name(id, name)
    }
    fn set_location(&mut self, id: ObjectId, location: Location) -> ImportResult<()> {
        self.0.set_location(id, location)
    }
    fn size(&self, id: ObjectId) -> ImportResult<Size> {
        self.0.size(id)
    }
    fn set_size(&mut self, _id: ObjectId, _size: Size) -> ImportResult<()> {
        Err(ImportError::Host("sizes are locked".to_string()))
    }
    fn property_names(&self, id: ObjectId) -> ImportResult<Vec<String>> {
        self.0.property_names(id)
    }
    fn property_mut(&mut self, id: ObjectId, slot: usize) -> ImportResult<&mut Property> {
        self.0.property_mut(id, slot)
    }
    fn get_or_create_network(&mut self, name: &str) -> ImportResult<NetworkId> {
        self.0.get_or_create_network(name)
    }
    fn add_to_network(&mut self, link: ObjectId, network: NetworkId) -> ImportResult<()> {
        self.0.add_to_network(link, network)
    }
    fn bulk_update<F>(&mut self, f: F) -> ImportResult<()>
    where
        F: FnOnce(&mut Self) -> ImportResult<()>,
    {
        f(self)
    }
}

#[test]
fn test_host_failure_aborts_run_with_position() {
    let mut model = LockedSizes(new_model());
    let (result, _) = run(
        &mut model,
        &[
            nodes_sheet("Objects"),
            sheet(
                "Links",
                vec![LINK_HEADER.to_vec(), link_row("Path", "AB", "A", "B")],
            ),
        ],
        ImportOptions::default(),
    );

    let err = result.unwrap_err();
    match &err {
        ImportError::Aborted { marker, .. } => assert_eq!(marker, "Sheet=Objects Row=2"),
        other => panic!("expected an aborted run, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Marker=Sheet=Objects Row=2 Err=Host model error: sizes are locked"
    );
    // Links were never reached
    assert!(model.0.object_by_name("AB").is_none());
}
