//! Readers for the files produced by [`csv_write`](crate::io::csv_write), used
//! by downstream consumers and to check exports.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::sbrp::data::error::{Result, ToolError};
use crate::sbrp::data::model::{EdgeRecord, Matrix, NodeRow};

const EDGE_COLUMNS: [&str; 4] = ["source", "target", "weight", "time"];
const NODE_COLUMNS: [&str; NodeRow::WIDTH] = [
    "key",
    "id",
    "label",
    "x",
    "y",
    "tipologia",
    "ragazzi_1",
    "ragazzi_2",
    "ragazzi_3",
    "ragazzi_4",
];

/// Reads a headerless node file. Rows without exactly ten cells are skipped.
pub fn read_nodes_csv(path: &Path) -> Result<Vec<NodeRow>> {
    read_fixed_width(path, false, &NODE_COLUMNS)
}

/// Reads an edge file, skipping its header. Rows without exactly four cells
/// are skipped.
pub fn read_edges_csv(path: &Path) -> Result<Vec<EdgeRecord>> {
    read_fixed_width(path, true, &EDGE_COLUMNS)
}

/// Reads a headerless numeric grid. Rows may differ in length.
pub fn read_matrix_csv(path: &Path) -> Result<Matrix> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut matrix = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = line_of(&record);
        let row = record
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| ToolError::InvalidLiteral {
                        line,
                        column: format!("column {}", column + 1),
                        value: cell.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        matrix.push(row);
    }
    Ok(matrix)
}

fn read_fixed_width<T: DeserializeOwned>(
    path: &Path,
    has_headers: bool,
    columns: &[&str],
) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = line_of(&record);
        if record.len() != columns.len() {
            warn!(
                path = %path.display(),
                line,
                cells = record.len(),
                expected = columns.len(),
                "skipping row with unexpected width"
            );
            continue;
        }
        let row = record
            .deserialize(None)
            .map_err(|err| literal_error(&record, columns, line, &err))?;
        rows.push(row);
    }
    Ok(rows)
}

fn literal_error(
    record: &StringRecord,
    columns: &[&str],
    line: usize,
    err: &csv::Error,
) -> ToolError {
    let field = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.field().map(|index| index as usize),
        _ => None,
    };
    let column = field
        .and_then(|index| columns.get(index))
        .map(|name| name.to_string())
        .unwrap_or_else(|| "row".to_string());
    let value = field
        .and_then(|index| record.get(index))
        .map(str::to_string)
        .unwrap_or_else(|| record.iter().collect::<Vec<_>>().join(","));
    ToolError::InvalidLiteral {
        line,
        column,
        value,
    }
}

fn line_of(record: &StringRecord) -> usize {
    record
        .position()
        .map(|position| position.line() as usize)
        .unwrap_or_default()
}
