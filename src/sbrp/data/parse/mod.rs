//! Line-oriented reader for the GML-like graph dumps.
//!
//! Each `node [` or `edge [` line opens a block, field lines fill it and a
//! lone `]` closes it. Anything else, such as the enclosing `graph [` header
//! or its closing bracket, is skipped.

mod builder;

use std::mem;

use tracing::{info, trace, warn};

use crate::sbrp::data::error::{RecordKind, Result, ToolError};
use crate::sbrp::data::model::GraphRecords;

use builder::{EdgeBuilder, Field, NodeBuilder};

/// What to do with a stop that lists more than four passenger counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RagazziOverflow {
    /// Fail the import.
    #[default]
    Reject,
    /// Keep the first four values.
    Truncate,
}

/// Knobs that change how graph text is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub ragazzi_overflow: RagazziOverflow,
}

#[derive(Debug, Default)]
enum ParseState {
    #[default]
    Idle,
    Node(NodeBuilder),
    Edge(EdgeBuilder),
}

/// Parses the full text of a graph file into node and edge records.
///
/// Any structural problem aborts the whole parse; no partial result is
/// returned.
pub fn parse_graph(text: &str, options: &ParseOptions) -> Result<GraphRecords> {
    let mut records = GraphRecords::default();
    let mut state = ParseState::Idle;

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();

        if trimmed == "]" {
            close_block(mem::take(&mut state), line, options, &mut records)?;
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "node" => state = open_block(&state, RecordKind::Node, line)?,
            "edge" => state = open_block(&state, RecordKind::Edge, line)?,
            _ => match Field::from_keyword(keyword) {
                Some(field) => {
                    let value = tokens.next().ok_or_else(|| ToolError::MalformedLine {
                        line,
                        field: keyword.to_string(),
                    })?;
                    apply_field(&mut state, field, value, line)?;
                }
                None => trace!(line, keyword, "skipping unrecognised line"),
            },
        }
    }

    match state {
        ParseState::Idle => {}
        ParseState::Node(_) => return Err(ToolError::UnterminatedRecord(RecordKind::Node)),
        ParseState::Edge(_) => return Err(ToolError::UnterminatedRecord(RecordKind::Edge)),
    }

    info!(
        node_count = records.node_count(),
        edge_count = records.edge_count(),
        "parsed graph text"
    );
    Ok(records)
}

fn open_block(state: &ParseState, kind: RecordKind, line: usize) -> Result<ParseState> {
    if !matches!(state, ParseState::Idle) {
        return Err(ToolError::NestedRecord { line, record: kind });
    }
    Ok(match kind {
        RecordKind::Node => ParseState::Node(NodeBuilder::default()),
        RecordKind::Edge => ParseState::Edge(EdgeBuilder::default()),
    })
}

fn apply_field(state: &mut ParseState, field: Field, value: &str, line: usize) -> Result<()> {
    match (state, field.record()) {
        (ParseState::Node(node), RecordKind::Node) => node.set(field, value, line),
        (ParseState::Edge(edge), RecordKind::Edge) => edge.set(field, value, line),
        _ => Err(ToolError::UnexpectedField {
            line,
            field: field.keyword().to_string(),
        }),
    }
}

fn close_block(
    state: ParseState,
    line: usize,
    options: &ParseOptions,
    records: &mut GraphRecords,
) -> Result<()> {
    match state {
        ParseState::Idle => {}
        ParseState::Node(builder) => {
            let node = builder.finish(line, options)?;
            if let Some(previous) = records.nodes.insert(node.id, node) {
                warn!(node = previous.id, line, "duplicate node id replaces earlier block");
            }
        }
        ParseState::Edge(builder) => records.edges.push(builder.finish(line)?),
    }
    Ok(())
}
