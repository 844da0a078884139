use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::data::{Entity, Transaction};

mod transform;

pub use transform::{TRANSFER_STRENGTH, TransformDiagnostics, Transformed, transform};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClusterLabel {
    Site(String),
    Standalone,
}

impl ClusterLabel {
    pub fn is_standalone(&self) -> bool {
        matches!(self, Self::Standalone)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Site(label) => label.as_str(),
            Self::Standalone => "standalone",
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Transfer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub entity: Entity,
    pub cluster: ClusterLabel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub strength: f32,
    pub kind: EdgeKind,
    pub transaction: Transaction,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Normalized entity graph. Node and edge ids are positions in insertion
/// order, so every derived view can refer back by index.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, NodeId>,
    incident: Vec<Vec<EdgeId>>,
}

impl Graph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn node_id(&self, entity_id: &str) -> Option<NodeId> {
        self.index_by_id.get(entity_id).copied()
    }

    pub fn node_by_entity(&self, entity_id: &str) -> Option<&Node> {
        self.node_id(entity_id).map(|id| self.node(id))
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.index_by_id.contains_key(entity_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn incident_edges(&self, node: NodeId) -> &[EdgeId] {
        self.incident.get(node.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes sharing at least one transaction with `node`, in either direction.
    /// Self-transfers do not make a node its own neighbor.
    pub fn neighbors(&self, node: NodeId) -> BTreeSet<NodeId> {
        self.incident_edges(node)
            .iter()
            .map(|&edge_id| {
                let edge = self.edge(edge_id);
                if edge.source == node {
                    edge.target
                } else {
                    edge.source
                }
            })
            .filter(|&other| other != node)
            .collect()
    }

    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incident_edges(node)
            .iter()
            .map(|&edge_id| self.edge(edge_id))
            .filter(move |edge| edge.source == node)
    }

    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incident_edges(node)
            .iter()
            .map(|&edge_id| self.edge(edge_id))
            .filter(move |edge| edge.target == node && edge.source != node)
    }

    /// Distinct cluster labels in order of first appearance.
    pub fn cluster_labels(&self) -> Vec<&ClusterLabel> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .map(|node| &node.cluster)
            .filter(|label| seen.insert(*label))
            .collect()
    }

    fn push_node(&mut self, entity: &Entity, cluster: ClusterLabel) -> Option<NodeId> {
        if self.index_by_id.contains_key(&entity.id) {
            return None;
        }

        let id = NodeId(self.nodes.len());
        self.index_by_id.insert(entity.id.clone(), id);
        self.nodes.push(Node {
            id: entity.id.clone(),
            entity: entity.clone(),
            cluster,
        });
        self.incident.push(Vec::new());
        Some(id)
    }

    fn push_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.incident[edge.source.0].push(id);
        if edge.target != edge.source {
            self.incident[edge.target.0].push(id);
        }
        self.edges.push(edge);
        id
    }
}
