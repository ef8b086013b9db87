use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::debug;

use crate::sbrp::data::error::Result;
use crate::sbrp::data::io::prepare_output;
use crate::sbrp::data::model::{EdgeRecord, NodeId, NodeRecord, NodeRow};

/// Writes the edges with a `source,target,weight,time` header.
///
/// Nothing is written, and `None` is returned, when there are no edges.
pub fn write_edges_csv(
    edges: &[EdgeRecord],
    dir: &Path,
    filename: &str,
) -> Result<Option<PathBuf>> {
    if edges.is_empty() {
        debug!(dir = %dir.display(), filename, "no edges to write");
        return Ok(None);
    }

    let path = prepare_output(dir, filename)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_path(&path)?;
    for edge in edges {
        writer.serialize(edge)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = edges.len(), "wrote edge file");
    Ok(Some(path))
}

/// Writes one headerless ten-column row per node in ascending id order.
pub fn write_nodes_csv(
    nodes: &BTreeMap<NodeId, NodeRecord>,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf> {
    let rows: Vec<NodeRow> = nodes
        .iter()
        .map(|(key, node)| NodeRow::from_record(*key, node))
        .collect();
    write_node_rows(&rows, dir, filename)
}

/// Writes already flattened node rows as they are, without a header.
pub fn write_node_rows(rows: &[NodeRow], dir: &Path, filename: &str) -> Result<PathBuf> {
    let path = prepare_output(dir, filename)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "wrote node file");
    Ok(path)
}

/// Writes a numeric grid row by row, without a header.
pub fn write_matrix_csv(matrix: &[Vec<f64>], dir: &Path, filename: &str) -> Result<PathBuf> {
    let path = prepare_output(dir, filename)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)?;
    for row in matrix {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = matrix.len(), "wrote matrix file");
    Ok(path)
}
