use crate::excel::open_workbook;
use crate::import::{FacilityImporter, ImportOptions, ImportReport, SheetKind, SheetReport};
use crate::log::{MemoryLog, Severity, TeeLog, TracingLog};
use crate::model::{ClassCatalog, FacilityModel, ModelSession, ObjectId, ObjectKind};
use anyhow::{bail, Context};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments of the import command
#[derive(Debug, Clone, Default)]
pub struct ImportArgs {
    pub workbook: PathBuf,
    /// Model to update; created when the file does not exist
    pub model: Option<PathBuf>,
    /// Where to write the updated model (defaults to `model`)
    pub output: Option<PathBuf>,
    /// Extra class definitions merged over the standard catalog
    pub catalog: Option<PathBuf>,
    pub no_vertices: bool,
    /// Comma-separated log exclude regexes
    pub exclude: Option<String>,
    pub report: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

/// Split a comma-separated pattern list, dropping blanks
fn parse_excludes(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn load_extra_classes(path: Option<&Path>) -> anyhow::Result<Option<ClassCatalog>> {
    path.map(|path| {
        ClassCatalog::load(path)
            .with_context(|| format!("Failed to load class catalog {}", path.display()))
    })
    .transpose()
}

/// Standard classes with any extra definitions merged over them
fn load_catalog(extra: Option<&Path>) -> anyhow::Result<ClassCatalog> {
    let mut catalog = ClassCatalog::standard();
    if let Some(classes) = load_extra_classes(extra)? {
        catalog.merge(classes);
    }
    Ok(catalog)
}

/// Open the model at `path`, or start an empty one named after the file
fn load_or_create_model(
    path: Option<&Path>,
    extra: Option<ClassCatalog>,
) -> anyhow::Result<FacilityModel> {
    let mut model = match path {
        Some(path) if path.exists() => FacilityModel::load(path)
            .with_context(|| format!("Failed to load model {}", path.display()))?,
        Some(path) => {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Facility".to_string());
            FacilityModel::new(name, ClassCatalog::standard())
        }
        None => FacilityModel::new("Facility", ClassCatalog::standard()),
    };
    if let Some(classes) = extra {
        model.catalog.merge(classes);
    }
    Ok(model)
}

fn object_name(model: &FacilityModel, id: ObjectId) -> &str {
    model.object(id).map(|o| o.name.as_str()).unwrap_or("?")
}

fn kind_label(kind: SheetKind) -> &'static str {
    match kind {
        SheetKind::Objects => "Objects",
        SheetKind::Links => "Links",
        SheetKind::Vertices => "Vertices",
    }
}

fn print_sheet(sheet: &SheetReport) {
    let counts = match sheet.kind {
        SheetKind::Vertices => format!("{} rows, {} vertices", sheet.rows_read, sheet.added),
        _ => format!(
            "{} rows, {} added, {} updated, {} skipped",
            sheet.rows_read, sheet.added, sheet.updated, sheet.skipped
        ),
    };
    print!(
        "   📄 {:<8} {}: {}",
        kind_label(sheet.kind),
        sheet.sheet.bright_blue().bold(),
        counts
    );
    match sheet.aborted_at {
        Some(row) => println!(" {}", format!("(stopped at row {row})").yellow()),
        None => println!(),
    }
}

fn print_report(report: &ImportReport, verbose: bool) {
    for sheet in &report.sheets {
        print_sheet(sheet);
    }
    if report.vertices_staged > 0 {
        println!("   📐 {} vertices staged", report.vertices_staged);
    }
    println!();

    let problems: Vec<_> = report.problems().collect();
    if problems.is_empty() {
        return;
    }
    println!(
        "{}",
        format!("⚠️  {} rows or cells were not imported", problems.len()).yellow()
    );
    if verbose {
        for (sheet, diagnostic) in problems {
            println!("   [{}] {}", sheet.cyan(), diagnostic.message);
        }
    } else {
        println!("   Run with --verbose to list them");
    }
    println!();
}

/// Execute the import command
pub fn import(args: ImportArgs) -> anyhow::Result<()> {
    println!("{}", "🏭 Facility Import - Excel Import".bold().green());
    println!("   Workbook: {}", args.workbook.display());

    let Some(output) = args.output.clone().or_else(|| args.model.clone()) else {
        bail!("--output is required when no --model is given");
    };
    match &args.model {
        Some(model) => println!("   Model:    {}", model.display()),
        None => println!("   Model:    {}", "(new)".dimmed()),
    }
    println!("   Output:   {}\n", output.display());

    let extra = load_extra_classes(args.catalog.as_deref())?;
    let model = load_or_create_model(args.model.as_deref(), extra)?;

    if args.verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let workbook = open_workbook(&args.workbook)
        .with_context(|| format!("Failed to read workbook {}", args.workbook.display()))?;
    if args.verbose {
        for sheet in workbook.sheets() {
            println!(
                "   {} ({} rows, {} columns)",
                sheet.name(),
                sheet.last_row(),
                sheet.last_column()
            );
        }
        println!();
    }

    let options = ImportOptions {
        import_vertices: !args.no_vertices,
        log_excludes: args.exclude.as_deref().map(parse_excludes).unwrap_or_default(),
    };
    let mut memory = MemoryLog::new();

    if args.verbose {
        println!("{}", "🔧 Importing...".cyan());
    }
    let mut session = ModelSession::new(model);
    let importer = FacilityImporter::new(options);
    let result = importer.execute(
        &mut session,
        &workbook,
        &mut TeeLog::new(&mut memory, TracingLog),
    );

    if let Some(path) = &args.log_file {
        memory
            .write_to(path)
            .with_context(|| format!("Failed to write log {}", path.display()))?;
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprint!("{}", memory.render(Severity::Warning));
            return Err(e).context("Import aborted; the model was not saved");
        }
    };

    println!("{}", "✅ Import Complete!".bold().green());
    print_report(&report, args.verbose);

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("   Report: {}", path.display());
    }

    let Some(model) = session.model else {
        bail!("Model was closed during the import");
    };
    model
        .save(&output)
        .with_context(|| format!("Failed to write model {}", output.display()))?;
    println!(
        "   Model file: {} ({} objects, {} networks)\n",
        output.display(),
        model.objects().len(),
        model.networks().len()
    );

    Ok(())
}

/// Execute the classes command - list importable classes
pub fn classes(catalog: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", "📚 Facility Import - Classes".bold().green());
    println!();

    let catalog = load_catalog(catalog.as_deref())?;
    for class in &catalog.classes {
        let kind = match class.kind {
            ObjectKind::Fixed => "fixed",
            ObjectKind::Node => "node",
            ObjectKind::Link => "link",
        };
        println!(
            "   {} ({}, size {})",
            class.name.bright_blue().bold(),
            kind,
            class.size
        );
        for property in &class.properties {
            if property.is_repeating() {
                println!("      {} {}", property.name.cyan(), "[repeating]".dimmed());
                for field in &property.fields {
                    println!("         {} : {:?}", field.name, field.property_type);
                }
            } else if property.default.is_empty() {
                println!("      {} : {:?}", property.name.cyan(), property.property_type);
            } else {
                println!(
                    "      {} : {:?} = {}",
                    property.name.cyan(),
                    property.property_type,
                    property.default
                );
            }
        }
    }
    println!();

    Ok(())
}

/// Execute the inspect command - summarize a saved model
pub fn inspect(file: PathBuf) -> anyhow::Result<()> {
    println!("{}", "🔍 Facility Import - Inspect".bold().green());
    println!("   File: {}\n", file.display());

    let model = FacilityModel::load(&file)
        .with_context(|| format!("Failed to load model {}", file.display()))?;

    println!("   Model: {}", model.name.bright_blue().bold());
    println!();

    println!("{}", "   Objects:".bold());
    for object in model.nodes_and_fixed() {
        println!(
            "      {} ({}) at {} size {}",
            object.name.bright_blue(),
            object.class_name,
            object.location,
            object.size
        );
    }

    println!("{}", "   Links:".bold());
    for object in model.links() {
        let Some(link) = &object.link else {
            continue;
        };
        let networks = if link.networks.is_empty() {
            "no network".dimmed().to_string()
        } else {
            link.networks.join(", ")
        };
        println!(
            "      {} ({}) {} → {}, {} vertices, {}",
            object.name.bright_blue(),
            object.class_name,
            object_name(&model, link.from),
            object_name(&model, link.to),
            link.vertices.len(),
            networks
        );
    }

    println!("{}", "   Networks:".bold());
    for network in model.networks() {
        let members = model
            .links()
            .filter(|o| o.link.as_ref().is_some_and(|l| l.networks.contains(&network.name)))
            .count();
        println!("      {} ({} links)", network.name.cyan(), members);
    }
    println!();

    Ok(())
}
