mod instance;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use instance::{InstanceFiles, ProblemInstance};

/// Identifier assigned to a node in the graph text. Edges refer to nodes by
/// this value.
pub type NodeId = i64;

/// Row-major numeric grid read from a distance or time spreadsheet.
pub type Matrix = Vec<Vec<f64>>;

/// Number of passenger-count slots a stop carries in the exported schema.
pub const RAGAZZI_SLOTS: usize = 4;

/// `tipologia` value marking a node as a stop.
pub const STOP_CATEGORY: &str = "fermata";

/// A node block after it has been closed by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub label: Option<String>,
    /// Coordinates as `(x, y)`.
    pub pos: (f64, f64),
    pub tipologia: Option<String>,
    pub locazione: Option<String>,
    pub citta: Option<i64>,
    /// Passenger counts, zero-padded to [`RAGAZZI_SLOTS`] entries.
    pub ragazzi: Option<[i64; RAGAZZI_SLOTS]>,
}

impl NodeRecord {
    /// Returns `true` when the node is a stop.
    pub fn is_stop(&self) -> bool {
        self.tipologia.as_deref() == Some(STOP_CATEGORY)
    }

    /// The four trailing values of an exported node row: the passenger counts
    /// for stops, zeros for everything else.
    pub fn ragazzi_columns(&self) -> [i64; RAGAZZI_SLOTS] {
        match self.ragazzi {
            Some(counts) if self.is_stop() => counts,
            _ => [0; RAGAZZI_SLOTS],
        }
    }
}

/// A directed connection between two nodes.
///
/// Field order drives the header of the exported edge file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
    pub time: f64,
}

/// Everything a graph text file yields: nodes keyed by id plus the edges in
/// the order they were declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphRecords {
    pub nodes: BTreeMap<NodeId, NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphRecords {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Flat ten-column shape of a node in the exported node file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub key: NodeId,
    pub id: NodeId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub tipologia: String,
    pub ragazzi_1: i64,
    pub ragazzi_2: i64,
    pub ragazzi_3: i64,
    pub ragazzi_4: i64,
}

impl NodeRow {
    /// Number of columns in every node row.
    pub const WIDTH: usize = 10;

    /// Flattens a node stored under `key` into its exported row.
    pub fn from_record(key: NodeId, node: &NodeRecord) -> Self {
        let [ragazzi_1, ragazzi_2, ragazzi_3, ragazzi_4] = node.ragazzi_columns();
        Self {
            key,
            id: node.id,
            label: node.label.clone().unwrap_or_default(),
            x: node.pos.0,
            y: node.pos.1,
            tipologia: node.tipologia.clone().unwrap_or_default(),
            ragazzi_1,
            ragazzi_2,
            ragazzi_3,
            ragazzi_4,
        }
    }

    pub fn ragazzi(&self) -> [i64; RAGAZZI_SLOTS] {
        [self.ragazzi_1, self.ragazzi_2, self.ragazzi_3, self.ragazzi_4]
    }
}
