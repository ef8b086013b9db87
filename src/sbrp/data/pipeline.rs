use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, instrument};

use crate::sbrp::data::error::{Result, ToolError};
use crate::sbrp::data::graph::TransitGraph;
use crate::sbrp::data::io::{csv_write, excel_read};
use crate::sbrp::data::model::GraphRecords;
use crate::sbrp::data::parse::{ParseOptions, parse_graph};

/// File names used for the two graph exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOutputs {
    pub nodes_file: String,
    pub edges_file: String,
}

impl GraphOutputs {
    /// `<stem>_nodes.csv` and `<stem>_edges.csv`.
    pub fn from_stem(stem: &str) -> Self {
        Self {
            nodes_file: format!("{stem}_nodes.csv"),
            edges_file: format!("{stem}_edges.csv"),
        }
    }
}

/// Outcome of a graph import. Export failures are collected instead of
/// aborting the remaining exports.
#[derive(Debug, Default)]
pub struct GraphExport {
    pub records: GraphRecords,
    pub nodes_path: Option<PathBuf>,
    pub edges_path: Option<PathBuf>,
    pub failures: Vec<ToolError>,
}

impl GraphExport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parses a graph text file and writes its node and edge files into
/// `output_dir`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output_dir = %output_dir.display())
)]
pub fn import_graph(
    input: &Path,
    output_dir: &Path,
    outputs: &GraphOutputs,
    options: &ParseOptions,
) -> Result<GraphExport> {
    let text = fs::read_to_string(input)?;
    let records = parse_graph(&text, options)?;

    let mut export = GraphExport::default();

    match csv_write::write_edges_csv(&records.edges, output_dir, &outputs.edges_file) {
        Ok(path) => export.edges_path = path,
        Err(err) => {
            error!(error = %err, file = %outputs.edges_file, "edge export failed");
            export.failures.push(err);
        }
    }

    match csv_write::write_nodes_csv(&records.nodes, output_dir, &outputs.nodes_file) {
        Ok(path) => export.nodes_path = Some(path),
        Err(err) => {
            error!(error = %err, file = %outputs.nodes_file, "node export failed");
            export.failures.push(err);
        }
    }

    info!(
        node_count = records.node_count(),
        edge_count = records.edge_count(),
        failures = export.failures.len(),
        "graph import finished"
    );
    export.records = records;
    Ok(export)
}

/// Reads a matrix workbook and writes it as CSV into `output_dir`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output_dir = %output_dir.display(), filename = %filename)
)]
pub fn import_matrix(
    input: &Path,
    output_dir: &Path,
    filename: &str,
    sheet: Option<&str>,
) -> Result<PathBuf> {
    let matrix = excel_read::read_matrix_sheet(input, sheet)?;
    let path = csv_write::write_matrix_csv(&matrix, output_dir, filename)?;
    info!(path = %path.display(), rows = matrix.len(), "matrix written");
    Ok(path)
}

/// Materialises the graph only to check that every edge endpoint exists.
/// The integrity problem, if any, is handed back as a value.
#[instrument(level = "debug", skip_all)]
pub fn check_references(records: &GraphRecords) -> Option<ToolError> {
    TransitGraph::build(records).err()
}
