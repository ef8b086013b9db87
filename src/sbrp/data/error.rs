use std::path::PathBuf;

use thiserror::Error;

use crate::sbrp::data::model::NodeId;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Which kind of block the parser was filling when a problem surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Node,
    Edge,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Node => write!(f, "node"),
            RecordKind::Edge => write!(f, "edge"),
        }
    }
}

/// Error type covering the different failure cases that can occur when the
/// tool ingests, transforms, or emits data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the CSV reader and writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the spreadsheet reader implementation.
    #[error("spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Raised when a field line does not carry a value token.
    #[error("line {line}: field '{field}' has no value")]
    MalformedLine { line: usize, field: String },

    /// Raised when a value cannot be coerced into the type its field expects.
    #[error("line {line}: invalid literal '{value}' for {column}")]
    InvalidLiteral {
        line: usize,
        column: String,
        value: String,
    },

    /// Raised when a block closes without a field it cannot do without.
    #[error("line {line}: {record} block closed without required field '{field}'")]
    MissingRequiredField {
        line: usize,
        record: RecordKind,
        field: &'static str,
    },

    /// Raised when a node does not declare exactly two coordinates.
    #[error("node {id}: expected 2 pos values, found {count}")]
    InvalidCoordinates { id: NodeId, count: usize },

    /// Raised when a stop lists more passenger counts than the export schema holds.
    #[error("node {id}: {count} ragazzi values exceed the 4 available slots")]
    RagazziOverflow { id: NodeId, count: usize },

    /// Raised when a field shows up outside the block kind it belongs to.
    #[error("line {line}: field '{field}' is not valid here")]
    UnexpectedField { line: usize, field: String },

    /// Raised when a block opens while another one is still open.
    #[error("line {line}: {record} block opened before the previous block was closed")]
    NestedRecord { line: usize, record: RecordKind },

    /// Raised when the input ends inside a block.
    #[error("input ended inside an unterminated {0} block")]
    UnterminatedRecord(RecordKind),

    /// Raised when an edge points at a node id that was never declared.
    #[error("edge #{edge} ({from} -> {to}) references unknown node {missing}")]
    ReferentialIntegrity {
        edge: usize,
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    /// Raised when a matrix cell does not hold a number.
    #[error("non-numeric cell '{value}' at row {row}, column {column}")]
    NonNumericCell {
        row: usize,
        column: usize,
        value: String,
    },

    /// Raised when a workbook carries no usable worksheet.
    #[error("workbook has no worksheet to read: {0}")]
    EmptyWorkbook(PathBuf),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
