use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::sbrp::data::error::{Result, ToolError};
use crate::sbrp::data::model::{GraphRecords, NodeId, NodeRecord};

/// Attributes carried by every edge of the materialised graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeWeight {
    pub weight: f64,
    pub time: f64,
}

/// Directed view over parsed records, for tooling that wants to query
/// adjacency rather than walk flat lists.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    graph: DiGraph<NodeRecord, EdgeWeight>,
    index: HashMap<NodeId, NodeIndex>,
}

impl TransitGraph {
    /// Builds the graph, checking that every edge endpoint names a declared
    /// node. A repeated `(source, target)` pair keeps the last weight.
    pub fn build(records: &GraphRecords) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(records.node_count(), records.edge_count());
        let mut index = HashMap::with_capacity(records.node_count());

        for (id, node) in &records.nodes {
            index.insert(*id, graph.add_node(node.clone()));
        }

        for (position, edge) in records.edges.iter().enumerate() {
            let resolve = |id: NodeId| {
                index
                    .get(&id)
                    .copied()
                    .ok_or(ToolError::ReferentialIntegrity {
                        edge: position,
                        from: edge.source,
                        to: edge.target,
                        missing: id,
                    })
            };
            let from = resolve(edge.source)?;
            let to = resolve(edge.target)?;
            graph.update_edge(
                from,
                to,
                EdgeWeight {
                    weight: edge.weight,
                    time: edge.time,
                },
            );
        }

        debug!(
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            "materialised graph"
        );
        Ok(Self { graph, index })
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.index
            .get(&id)
            .and_then(|idx| self.graph.node_weight(*idx))
    }

    pub fn edge(&self, source: NodeId, target: NodeId) -> Option<&EdgeWeight> {
        let from = *self.index.get(&source)?;
        let to = *self.index.get(&target)?;
        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    /// Ids reachable over a single outgoing edge, sorted ascending.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        let Some(idx) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = self
            .graph
            .neighbors(*idx)
            .filter_map(|next| self.graph.node_weight(next).map(|node| node.id))
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Borrow the underlying petgraph structure.
    pub fn inner(&self) -> &DiGraph<NodeRecord, EdgeWeight> {
        &self.graph
    }
}
