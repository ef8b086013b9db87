use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use tracing::{debug, info};

use crate::sbrp::data::error::{Result, ToolError};
use crate::sbrp::data::model::Matrix;

/// Reads the first worksheet of a distance or time workbook as a numeric grid.
/// The sheet has no header row.
pub fn read_matrix(path: &Path) -> Result<Matrix> {
    read_matrix_sheet(path, None)
}

/// Reads the named worksheet, or the first one when `sheet` is `None`.
///
/// The grid starts at the first used cell: leading empty rows and columns
/// are dropped. Cell positions in errors are 1-based sheet coordinates.
pub fn read_matrix_sheet(path: &Path, sheet: Option<&str>) -> Result<Matrix> {
    let mut workbook = open_workbook_auto(path)?;

    let range_result = match sheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    };
    let range = range_result.ok_or_else(|| ToolError::EmptyWorkbook(path.to_path_buf()))??;

    let matrix = range_to_matrix(&range)?;
    info!(
        path = %path.display(),
        rows = matrix.len(),
        columns = matrix.first().map(Vec::len).unwrap_or_default(),
        "read matrix from workbook"
    );
    Ok(matrix)
}

fn range_to_matrix(range: &Range<DataType>) -> Result<Matrix> {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    if first_row > 0 || first_col > 0 {
        debug!(
            skipped_rows = first_row,
            skipped_columns = first_col,
            "matrix starts below or right of A1"
        );
    }

    range
        .rows()
        .enumerate()
        .map(|(row_idx, row)| {
            row.iter()
                .enumerate()
                .map(|(col_idx, cell)| {
                    cell_to_number(
                        cell,
                        first_row as usize + row_idx,
                        first_col as usize + col_idx,
                    )
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect()
}

fn cell_to_number(cell: &DataType, row: usize, column: usize) -> Result<f64> {
    let number = match cell {
        DataType::Float(value) => Some(*value),
        DataType::Int(value) => Some(*value as f64),
        DataType::String(value) => value.trim().parse().ok(),
        _ => None,
    };
    number.ok_or_else(|| ToolError::NonNumericCell {
        row: row + 1,
        column: column + 1,
        value: cell_to_string(cell),
    })
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
