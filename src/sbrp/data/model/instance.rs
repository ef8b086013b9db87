use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::sbrp::data::error::{Result, ToolError};
use crate::sbrp::data::io::{csv_read, csv_write};
use crate::sbrp::data::model::{EdgeRecord, Matrix, NodeRow, STOP_CATEGORY};

/// File names of the four CSV files making up one routing instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceFiles {
    pub distances: String,
    pub times: String,
    pub nodes: String,
    pub edges: String,
}

impl InstanceFiles {
    /// `<stem>_distanceMatrix.csv`, `<stem>_timeMatrix.csv`, `<stem>_nodes.csv`
    /// and `<stem>_edges.csv`. The graph names match
    /// [`GraphOutputs::from_stem`](crate::pipeline::GraphOutputs::from_stem).
    pub fn from_stem(stem: &str) -> Self {
        Self {
            distances: format!("{stem}_distanceMatrix.csv"),
            times: format!("{stem}_timeMatrix.csv"),
            nodes: format!("{stem}_nodes.csv"),
            edges: format!("{stem}_edges.csv"),
        }
    }
}

/// Everything the solver reads for one instance, loaded from the exported
/// CSV files of a single folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProblemInstance {
    pub distances: Matrix,
    pub times: Matrix,
    pub nodes: Vec<NodeRow>,
    pub edges: Vec<EdgeRecord>,
}

impl ProblemInstance {
    /// Loads the four files from `folder`. A missing edge file means the
    /// graph had no edges, since the edge exporter writes nothing then.
    #[instrument(level = "info", skip_all, fields(folder = %folder.display()))]
    pub fn load(folder: &Path, files: &InstanceFiles) -> Result<Self> {
        let distances = csv_read::read_matrix_csv(&required(folder, &files.distances)?)?;
        let times = csv_read::read_matrix_csv(&required(folder, &files.times)?)?;
        let nodes = csv_read::read_nodes_csv(&required(folder, &files.nodes)?)?;

        let edges_path = folder.join(&files.edges);
        let edges = if edges_path.exists() {
            csv_read::read_edges_csv(&edges_path)?
        } else {
            debug!(path = %edges_path.display(), "no edge file, instance has no edges");
            Vec::new()
        };

        let instance = Self {
            distances,
            times,
            nodes,
            edges,
        };
        info!(
            nodes = instance.nodes.len(),
            edges = instance.edges.len(),
            matrix_rows = instance.distances.len(),
            "loaded problem instance"
        );
        Ok(instance)
    }

    /// Writes each part to its own file in `folder`, creating it if needed.
    #[instrument(level = "info", skip_all, fields(folder = %folder.display()))]
    pub fn write(&self, folder: &Path, files: &InstanceFiles) -> Result<()> {
        csv_write::write_matrix_csv(&self.distances, folder, &files.distances)?;
        csv_write::write_matrix_csv(&self.times, folder, &files.times)?;
        csv_write::write_node_rows(&self.nodes, folder, &files.nodes)?;
        csv_write::write_edges_csv(&self.edges, folder, &files.edges)?;
        Ok(())
    }

    /// Number of stops, i.e. nodes whose category is `fermata`.
    pub fn stop_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|row| row.tipologia == STOP_CATEGORY)
            .count()
    }

    /// Returns `true` when both matrices are square with one row per node.
    pub fn matrices_match_nodes(&self) -> bool {
        let size = self.nodes.len();
        [&self.distances, &self.times].iter().all(|matrix| {
            matrix.len() == size && matrix.iter().all(|row| row.len() == size)
        })
    }
}

fn required(folder: &Path, filename: &str) -> Result<PathBuf> {
    let path = folder.join(filename);
    if path.exists() {
        Ok(path)
    } else {
        Err(ToolError::MissingInput(path))
    }
}
