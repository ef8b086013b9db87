use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use sbrp_data::io::csv_read;
use sbrp_data::model::{InstanceFiles, ProblemInstance, STOP_CATEGORY};
use sbrp_data::parse::{ParseOptions, RagazziOverflow};
use sbrp_data::pipeline::{self, GraphOutputs};
use sbrp_data::{Result, ToolError};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Graph(args) => execute_graph(args),
        Command::Matrix(args) => execute_matrix(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn execute_graph(args: GraphArgs) -> Result<()> {
    require_input(&args.input)?;

    let defaults = GraphOutputs::from_stem(&file_stem(&args.input));
    let outputs = GraphOutputs {
        nodes_file: args.nodes_file.unwrap_or(defaults.nodes_file),
        edges_file: args.edges_file.unwrap_or(defaults.edges_file),
    };
    let options = ParseOptions {
        ragazzi_overflow: args.ragazzi_overflow.into(),
    };

    let export = pipeline::import_graph(&args.input, &args.output_dir, &outputs, &options)?;

    if args.check_references {
        if let Some(problem) = pipeline::check_references(&export.records) {
            warn!(error = %problem, "graph has dangling edges");
        }
    }

    for path in export.nodes_path.iter().chain(export.edges_path.iter()) {
        println!("{}", path.display());
    }
    Ok(())
}

fn execute_matrix(args: MatrixArgs) -> Result<()> {
    require_input(&args.input)?;

    let filename = args
        .output_file
        .unwrap_or_else(|| format!("{}.csv", file_stem(&args.input)));
    let path = pipeline::import_matrix(
        &args.input,
        &args.output_dir,
        &filename,
        args.sheet.as_deref(),
    )?;
    println!("{}", path.display());
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    if let Some(folder) = &args.instance {
        require_input(folder)?;
        let stem = args
            .stem
            .clone()
            .unwrap_or_else(|| file_stem(folder).to_lowercase());
        let instance = ProblemInstance::load(folder, &InstanceFiles::from_stem(&stem))?;
        println!(
            "{}: {} nodes, {} stops, {} edges, {} distance rows, {} time rows{}",
            folder.display(),
            instance.nodes.len(),
            instance.stop_count(),
            instance.edges.len(),
            instance.distances.len(),
            instance.times.len(),
            if instance.matrices_match_nodes() {
                ""
            } else {
                " (size differs from node count)"
            }
        );
    }

    if let Some(path) = &args.nodes {
        require_input(path)?;
        let rows = csv_read::read_nodes_csv(path)?;
        let stops = rows.iter().filter(|row| row.tipologia == STOP_CATEGORY).count();
        let ragazzi: i64 = rows.iter().flat_map(|row| row.ragazzi()).sum();
        println!(
            "{}: {} nodes, {stops} stops, {ragazzi} ragazzi",
            path.display(),
            rows.len()
        );
    }

    if let Some(path) = &args.edges {
        require_input(path)?;
        let edges = csv_read::read_edges_csv(path)?;
        let total_time: f64 = edges.iter().map(|edge| edge.time).sum();
        println!(
            "{}: {} edges, total time {total_time}",
            path.display(),
            edges.len()
        );
    }

    for path in &args.matrix {
        require_input(path)?;
        let matrix = csv_read::read_matrix_csv(path)?;
        let columns = matrix.first().map(Vec::len).unwrap_or_default();
        let square = matrix.iter().all(|row| row.len() == matrix.len());
        println!(
            "{}: {} x {columns} matrix{}",
            path.display(),
            matrix.len(),
            if square { "" } else { " (not square)" }
        );
    }

    Ok(())
}

fn require_input(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ToolError::MissingInput(path.to_path_buf()))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert school-bus routing graph dumps and matrices into CSV."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a graph text dump into node and edge CSV files.
    Graph(GraphArgs),
    /// Convert a distance or time workbook into a CSV matrix.
    Matrix(MatrixArgs),
    /// Summarise previously exported CSV files.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct GraphArgs {
    /// Graph text file.
    #[arg(long)]
    input: PathBuf,

    /// Directory receiving the CSV files; created when missing.
    #[arg(long)]
    output_dir: PathBuf,

    /// Node file name. Defaults to `<input stem>_nodes.csv`.
    #[arg(long)]
    nodes_file: Option<String>,

    /// Edge file name. Defaults to `<input stem>_edges.csv`.
    #[arg(long)]
    edges_file: Option<String>,

    /// How to treat stops listing more than four ragazzi values.
    #[arg(long, value_enum, default_value_t = OverflowPolicy::Reject)]
    ragazzi_overflow: OverflowPolicy,

    /// Warn about edges pointing at undeclared nodes.
    #[arg(long)]
    check_references: bool,
}

#[derive(clap::Args)]
struct MatrixArgs {
    /// Workbook holding the matrix, without a header row.
    #[arg(long)]
    input: PathBuf,

    /// Directory receiving the CSV file; created when missing.
    #[arg(long)]
    output_dir: PathBuf,

    /// Output file name. Defaults to `<input stem>.csv`.
    #[arg(long)]
    output_file: Option<String>,

    /// Worksheet to read instead of the first one.
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Folder holding a full exported instance.
    #[arg(long)]
    instance: Option<PathBuf>,

    /// File name prefix inside the instance folder. Defaults to the
    /// lowercased folder name.
    #[arg(long, requires = "instance")]
    stem: Option<String>,

    /// Exported node file.
    #[arg(long)]
    nodes: Option<PathBuf>,

    /// Exported edge file.
    #[arg(long)]
    edges: Option<PathBuf>,

    /// Exported matrix files.
    #[arg(long)]
    matrix: Vec<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OverflowPolicy {
    Reject,
    Truncate,
}

impl From<OverflowPolicy> for RagazziOverflow {
    fn from(policy: OverflowPolicy) -> Self {
        match policy {
            OverflowPolicy::Reject => RagazziOverflow::Reject,
            OverflowPolicy::Truncate => RagazziOverflow::Truncate,
        }
    }
}
