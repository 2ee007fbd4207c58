use clap::{Parser, Subcommand};
use facility_import::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "facility-import")]
#[command(about = "Import facility layouts (objects, links, vertices) from Excel workbooks.")]
#[command(long_about = "Facility Import - Excel workbook to facility model

Reads worksheets named objects*, links* and vertices* and upserts their
rows into a facility model saved as YAML.

COMMANDS:
  import   - Import a workbook into a model
  classes  - List object and link classes with their properties
  inspect  - Summarize a saved model

WORKSHEETS (row 1 is the header):
  objects*   ClassName, ItemName, X, Y, Z, Length, Width, Height, Prop1..PropN
  links*     ClassName, LinkName, FromNode, ToNode, NetworkName, Prop1..PropN
  vertices*  LinkName, X, Y, Z

EXAMPLES:
  facility-import import layout.xlsx --model plant.yaml
  facility-import import layout.xlsx --output plant.yaml --report report.json
  facility-import inspect plant.yaml")]
#[command(version)]
struct Cli {
    /// Show verbose progress and list every skipped row or cell
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Import an Excel workbook into a facility model.

Objects sheets are imported first, then Vertices sheets are staged, then
Links sheets are imported using the staged vertices. Existing objects are
updated in place; existing links are removed and re-created.

Rows that cannot be imported are skipped and reported. The model is only
written when the run completes.

REPEATING PROPERTIES:
  Tabular properties are written in one cell as ~-separated segments of
  [row;]field;value, optionally preceded by the header value:

  1 Row;AssignmentsOnEnteringStateVariableName;ModelEntity.Picture~AssignmentsOnEnteringNewValue;1")]
    /// Import a workbook into a facility model
    Import {
        /// Path to the workbook (.xlsx, .xlsm, .xls, .ods)
        workbook: PathBuf,

        /// Model file to update (created if missing)
        #[arg(short, long, env = "FACILITY_IMPORT_MODEL")]
        model: Option<PathBuf>,

        /// Where to write the updated model (default: --model)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML file of extra class definitions
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Ignore Vertices sheets; links get no intermediate vertices
        #[arg(long)]
        no_vertices: bool,

        /// Comma-separated regexes of log messages to hide
        #[arg(short, long)]
        exclude: Option<String>,

        /// Write the import report as JSON
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Write the import log to a file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// List object and link classes with their properties
    Classes {
        /// YAML file of extra class definitions
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Summarize a saved model
    Inspect {
        /// Path to the model YAML file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "facility_import=info"
    } else {
        "facility_import=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FACILITY_IMPORT_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Import {
            workbook,
            model,
            output,
            catalog,
            no_vertices,
            exclude,
            report,
            log_file,
        } => cli::import(cli::ImportArgs {
            workbook,
            model,
            output,
            catalog,
            no_vertices,
            exclude,
            report,
            log_file,
            verbose: cli.verbose,
        }),

        Commands::Classes { catalog } => cli::classes(catalog),

        Commands::Inspect { file } => cli::inspect(file),
    }
}
