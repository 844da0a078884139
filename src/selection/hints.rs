use std::collections::BTreeMap;

use crate::data::PriorityLevel;
use crate::graph::{Graph, NodeId};

use super::{SelectionState, VisibleGraph};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeFlow {
    Neutral,
    Outgoing,
    Incoming,
}

/// One rendered line: every visible transaction between a directed pair.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeHint {
    pub source: NodeId,
    pub target: NodeId,
    pub source_id: String,
    pub target_id: String,
    pub strength: f32,
    pub emphasized: bool,
    pub stroke_weight: f32,
    pub flow: EdgeFlow,
    pub transaction_count: usize,
    pub total_amount: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeHint {
    pub node: NodeId,
    pub radius: f32,
    pub priority: PriorityLevel,
    pub focused: bool,
    pub selected: bool,
}

pub fn node_render_radius(connections: u32) -> f32 {
    (connections as f32 * 2.0).clamp(25.0, 45.0)
}

fn stroke_weight(strength: f32, emphasized: bool) -> f32 {
    if emphasized {
        (strength * 4.0).max(3.0)
    } else {
        (strength * 3.0).max(1.0)
    }
}

pub fn edge_hints(graph: &Graph, visible: &VisibleGraph) -> Vec<EdgeHint> {
    let mut grouped: BTreeMap<(NodeId, NodeId), EdgeHint> = BTreeMap::new();

    for &edge_id in &visible.edges {
        let edge = graph.edge(edge_id);
        let emphasized = visible.is_emphasized(edge_id);
        let entry = grouped
            .entry((edge.source, edge.target))
            .or_insert_with(|| EdgeHint {
                source: edge.source,
                target: edge.target,
                source_id: graph.node(edge.source).id.clone(),
                target_id: graph.node(edge.target).id.clone(),
                strength: 0.0,
                emphasized: false,
                stroke_weight: 0.0,
                flow: match visible.focus {
                    Some(focus) if edge.source == focus => EdgeFlow::Outgoing,
                    Some(focus) if edge.target == focus => EdgeFlow::Incoming,
                    _ => EdgeFlow::Neutral,
                },
                transaction_count: 0,
                total_amount: 0.0,
            });

        entry.strength = entry.strength.max(edge.strength);
        entry.emphasized |= emphasized;
        entry.transaction_count += 1;
        entry.total_amount += edge.transaction.amount;
    }

    grouped
        .into_values()
        .map(|mut hint| {
            hint.stroke_weight = stroke_weight(hint.strength, hint.emphasized);
            hint
        })
        .collect()
}

pub fn node_hints(
    graph: &Graph,
    visible: &VisibleGraph,
    selection: &SelectionState,
) -> Vec<NodeHint> {
    visible
        .nodes
        .iter()
        .map(|&node| {
            let entity = &graph.node(node).entity;
            NodeHint {
                node,
                radius: node_render_radius(entity.connection_count),
                priority: entity.priority(),
                focused: selection.focus() == Some(entity.id.as_str()),
                selected: selection
                    .selected()
                    .is_some_and(|selected| selected.contains(&entity.id)),
            }
        })
        .collect()
}
