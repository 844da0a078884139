use std::collections::HashSet;

use crate::graph::{EdgeId, Graph, NodeId};

use super::SelectionState;

/// The part of the graph currently on screen. `focus` is set only when a focus
/// actually narrowed the view, which is also what enables the radial layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleGraph {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub emphasized: HashSet<EdgeId>,
    pub focus: Option<NodeId>,
}

impl VisibleGraph {
    pub fn full(graph: &Graph) -> Self {
        Self {
            nodes: graph.node_ids().collect(),
            edges: graph.edge_ids().collect(),
            emphasized: HashSet::new(),
            focus: None,
        }
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    pub fn is_emphasized(&self, edge: EdgeId) -> bool {
        self.emphasized.contains(&edge)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub fn filter(graph: &Graph, selection: &SelectionState) -> VisibleGraph {
    let focus = match selection {
        SelectionState::Default { focus: Some(id) } => graph.node_id(id),
        _ => None,
    };

    let Some(focus) = focus else {
        return VisibleGraph::full(graph);
    };

    let neighbors = graph.neighbors(focus);
    if neighbors.is_empty() {
        return VisibleGraph::full(graph);
    }

    let nodes = graph
        .node_ids()
        .filter(|node| *node == focus || neighbors.contains(node))
        .collect();

    let mut edges = graph.incident_edges(focus).to_vec();
    edges.sort_unstable();

    let emphasized = edges.iter().copied().collect();

    VisibleGraph {
        nodes,
        edges,
        emphasized,
        focus: Some(focus),
    }
}
