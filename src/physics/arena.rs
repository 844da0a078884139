use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::graph::{ClusterLabel, EdgeKind, Graph, NodeId};
use crate::selection::{SelectionMode, VisibleGraph};
use crate::util::stable_pair;

use super::Canvas;
use super::params::LayoutParams;

/// Who owns a node's position this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeState {
    Free,
    Pinned { position: Vec2 },
    Dragging { position: Vec2 },
}

impl NodeState {
    pub fn anchor(self) -> Option<Vec2> {
        match self {
            Self::Free => None,
            Self::Pinned { position } | Self::Dragging { position } => Some(position),
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub node: NodeId,
    pub cluster: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    pub state: NodeState,
}

/// Spring between two arena slots. Parallel transactions share one link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub strength: f32,
    pub kind: EdgeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterSlot {
    pub label: ClusterLabel,
    pub center: Vec2,
    pub members: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct LayoutIdentity {
    node_ids: Vec<String>,
    links: Vec<(usize, usize)>,
    mode: SelectionMode,
    focus: Option<usize>,
}

/// Exclusively-owned node buffer for one simulation run, indexed by slot and
/// by entity id.
#[derive(Clone, Debug, Default)]
pub struct LayoutArena {
    pub(super) nodes: Vec<LayoutNode>,
    pub(super) links: Vec<Link>,
    pub(super) adjacency: Vec<Vec<usize>>,
    pub(super) index_by_id: HashMap<String, usize>,
    pub(super) clusters: Vec<ClusterSlot>,
    pub(super) focus: Option<usize>,
    pub(super) radial_slots: Vec<Option<usize>>,
    pub(super) radial_count: usize,
    pub(super) canvas: Canvas,
    pub(super) forces: Vec<Vec2>,
}

impl LayoutArena {
    pub fn build(
        graph: &Graph,
        visible: &VisibleGraph,
        canvas: Canvas,
        params: &LayoutParams,
    ) -> Self {
        let mut nodes = Vec::with_capacity(visible.nodes.len());
        let mut index_by_id = HashMap::with_capacity(visible.nodes.len());
        let mut slot_by_node = HashMap::with_capacity(visible.nodes.len());
        let mut clusters: Vec<ClusterSlot> = Vec::new();
        let mut cluster_by_label: HashMap<&ClusterLabel, usize> = HashMap::new();

        for (index, &node_id) in visible.nodes.iter().enumerate() {
            let node = graph.node(node_id);
            let cluster = *cluster_by_label.entry(&node.cluster).or_insert_with(|| {
                clusters.push(ClusterSlot {
                    label: node.cluster.clone(),
                    center: Vec2::ZERO,
                    members: Vec::new(),
                });
                clusters.len() - 1
            });
            clusters[cluster].members.push(index);

            index_by_id.insert(node.id.clone(), index);
            slot_by_node.insert(node_id, index);
            nodes.push(LayoutNode {
                id: node.id.clone(),
                node: node_id,
                cluster,
                position: Vec2::ZERO,
                velocity: Vec2::ZERO,
                state: NodeState::Free,
            });
        }

        let mut links: Vec<Link> = Vec::new();
        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut link_by_pair: HashMap<(usize, usize), usize> = HashMap::new();
        for &edge_id in &visible.edges {
            let edge = graph.edge(edge_id);
            if edge.is_self_loop() {
                continue;
            }
            let (Some(&source), Some(&target)) =
                (slot_by_node.get(&edge.source), slot_by_node.get(&edge.target))
            else {
                continue;
            };

            let pair = (source.min(target), source.max(target));
            if let Some(&existing) = link_by_pair.get(&pair) {
                links[existing].strength = links[existing].strength.max(edge.strength);
                continue;
            }

            let link_index = links.len();
            link_by_pair.insert(pair, link_index);
            links.push(Link {
                source,
                target,
                strength: edge.strength,
                kind: edge.kind,
            });
            adjacency[source].push(link_index);
            adjacency[target].push(link_index);
        }

        let focus = visible
            .focus
            .and_then(|node_id| slot_by_node.get(&node_id).copied());
        let mut radial_slots = vec![None; nodes.len()];
        let mut radial_count = 0;
        if let Some(focus) = focus {
            for (index, slot) in radial_slots.iter_mut().enumerate() {
                if index != focus {
                    *slot = Some(radial_count);
                    radial_count += 1;
                }
            }
        }

        let mut arena = Self {
            forces: vec![Vec2::ZERO; nodes.len()],
            nodes,
            links,
            adjacency,
            index_by_id,
            clusters,
            focus,
            radial_slots,
            radial_count,
            canvas,
        };
        arena.place_clusters(params);
        arena.seed(params);
        arena
    }

    fn place_clusters(&mut self, params: &LayoutParams) {
        let center = self.canvas.center();
        let ring_radius = self.canvas.min_side() * params.cluster_ring_ratio;
        let named_count = self
            .clusters
            .iter()
            .filter(|slot| !slot.label.is_standalone())
            .count();

        let mut named_index = 0usize;
        for slot in &mut self.clusters {
            if slot.label.is_standalone() {
                slot.center = center;
                continue;
            }

            let angle = std::f32::consts::TAU * named_index as f32 / named_count as f32;
            slot.center = center + Vec2::angled(angle) * ring_radius;
            named_index += 1;
        }
    }

    /// Scatters every node around its cluster center with a per-id offset, so the
    /// same input always starts from the same place.
    pub(super) fn seed(&mut self, params: &LayoutParams) {
        for node in &mut self.nodes {
            let (jx, jy) = stable_pair(&node.id);
            node.velocity = Vec2::ZERO;
            node.position = match node.state.anchor() {
                Some(anchor) => anchor,
                None => self.clusters[node.cluster].center + vec2(jx, jy) * params.seed_spread,
            };
        }
    }

    pub(super) fn identity(&self, mode: SelectionMode) -> LayoutIdentity {
        LayoutIdentity {
            node_ids: self.nodes.iter().map(|node| node.id.clone()).collect(),
            links: self
                .links
                .iter()
                .map(|link| (link.source, link.target))
                .collect(),
            mode,
            focus: self.focus,
        }
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn clusters(&self) -> &[ClusterSlot] {
        &self.clusters
    }

    pub fn focus(&self) -> Option<&LayoutNode> {
        self.focus.map(|index| &self.nodes[index])
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub(super) fn node_mut(&mut self, id: &str) -> Option<&mut LayoutNode> {
        let index = self.index_of(id)?;
        self.nodes.get_mut(index)
    }

    pub fn centroid(&self, cluster: usize) -> Option<Vec2> {
        cluster_centroid(&self.clusters[cluster], &self.nodes)
    }

    /// Index of the cluster whose precomputed center is closest to `position`.
    pub fn nearest_cluster(&self, position: Vec2) -> Option<usize> {
        self.clusters
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.center - position)
                    .length_sq()
                    .total_cmp(&(b.center - position).length_sq())
            })
            .map(|(index, _)| index)
    }
}

pub(super) fn cluster_centroid(slot: &ClusterSlot, nodes: &[LayoutNode]) -> Option<Vec2> {
    if slot.members.is_empty() {
        return None;
    }

    let sum = slot
        .members
        .iter()
        .fold(Vec2::ZERO, |sum, &index| sum + nodes[index].position);
    Some(sum / slot.members.len() as f32)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::{Cluster, Entity, EntityKind, Transaction};
    use crate::graph::transform;
    use crate::selection::{SelectionState, filter};

    fn wallet(id: &str) -> Entity {
        Entity::new(id, EntityKind::EWallet, id)
    }

    fn sample() -> Graph {
        let clusters = [
            Cluster::new("north", vec![wallet("a"), wallet("b")]),
            Cluster::new("south", vec![wallet("c")]),
        ];
        let standalone = [wallet("d")];
        let transactions = [
            Transaction::new("a", "b", 1.0),
            Transaction::new("b", "a", 2.0),
            Transaction::new("a", "c", 3.0),
            Transaction::new("d", "d", 4.0),
        ];
        transform(&clusters, &standalone, &transactions).graph
    }

    #[test]
    fn collapses_parallel_edges_and_skips_self_loops() {
        let graph = sample();
        let visible = filter(&graph, &SelectionState::default());
        let arena = LayoutArena::build(&graph, &visible, Canvas::default(), &LayoutParams::default());

        assert_eq!(arena.len(), 4);
        assert_eq!(arena.links().len(), 2);
        assert_eq!(arena.adjacency[0].len(), 2);
        assert!(arena.adjacency[3].is_empty());
    }

    #[test]
    fn clusters_sit_on_a_ring_and_standalone_at_center() {
        let graph = sample();
        let visible = filter(&graph, &SelectionState::default());
        let canvas = Canvas::new(800.0, 600.0);
        let arena = LayoutArena::build(&graph, &visible, canvas, &LayoutParams::default());

        let clusters = arena.clusters();
        assert_eq!(clusters.len(), 3);
        assert_relative_eq!((clusters[0].center - canvas.center()).length(), 180.0, epsilon = 1e-3);
        assert_relative_eq!((clusters[1].center - canvas.center()).length(), 180.0, epsilon = 1e-3);
        assert_relative_eq!((clusters[0].center - clusters[1].center).length(), 360.0, epsilon = 1e-3);
        assert_eq!(clusters[2].label, ClusterLabel::Standalone);
        assert_eq!(clusters[2].center, canvas.center());
    }

    #[test]
    fn seeding_is_deterministic_and_near_cluster_centers() {
        let graph = sample();
        let visible = filter(&graph, &SelectionState::default());
        let params = LayoutParams::default();
        let first = LayoutArena::build(&graph, &visible, Canvas::default(), &params);
        let second = LayoutArena::build(&graph, &visible, Canvas::default(), &params);

        assert_eq!(first.nodes(), second.nodes());
        for node in first.nodes() {
            let center = first.clusters()[node.cluster].center;
            assert!((node.position - center).length() <= params.seed_spread * 2.0_f32.sqrt() + 1e-3);
            assert_eq!(first.nearest_cluster(center), Some(node.cluster));
        }
    }

    #[test]
    fn focus_assigns_radial_slots_to_everyone_else() {
        let graph = sample();
        let visible = filter(&graph, &SelectionState::focused("a"));
        let arena = LayoutArena::build(&graph, &visible, Canvas::default(), &LayoutParams::default());

        assert_eq!(arena.focus().map(|node| node.id.as_str()), Some("a"));
        assert_eq!(arena.radial_count, 2);
        assert_eq!(arena.radial_slots, [None, Some(0), Some(1)]);
    }

    #[test]
    fn identity_tracks_mode_and_membership() {
        let graph = sample();
        let params = LayoutParams::default();
        let full = LayoutArena::build(
            &graph,
            &filter(&graph, &SelectionState::default()),
            Canvas::default(),
            &params,
        );
        let focused = LayoutArena::build(
            &graph,
            &filter(&graph, &SelectionState::focused("a")),
            Canvas::default(),
            &params,
        );

        assert_eq!(
            full.identity(SelectionMode::Default),
            full.identity(SelectionMode::Default)
        );
        assert_ne!(
            full.identity(SelectionMode::Default),
            full.identity(SelectionMode::Multi)
        );
        assert_ne!(
            full.identity(SelectionMode::Default),
            focused.identity(SelectionMode::Default)
        );
    }
}
