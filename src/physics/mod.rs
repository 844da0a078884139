mod arena;
mod forces;
mod params;
mod quadtree;

use std::mem;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::graph::{ClusterLabel, Graph};
use crate::selection::{SelectionMode, VisibleGraph};

pub use arena::{ClusterSlot, LayoutArena, LayoutNode, Link, NodeState};
use arena::{LayoutIdentity, cluster_centroid};
use forces::{ForceContext, net_force};
pub use params::LayoutParams;
use quadtree::Quadtree;

/// Layout area in world units. Cluster centers and the radial ring are placed
/// relative to its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    pub fn min_side(self) -> f32 {
        self.width.min(self.height)
    }
}

/// Simulation temperature. Every reset or restart bumps `generation`, which
/// tells callers that an earlier run has been superseded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cooling {
    pub alpha: f32,
    pub alpha_target: f32,
    pub running: bool,
    pub generation: u64,
}

impl Default for Cooling {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
            generation: 0,
        }
    }
}

impl Cooling {
    pub fn restart(&mut self) {
        self.alpha = 1.0;
        self.alpha_target = 0.0;
        self.running = true;
        self.generation += 1;
    }

    pub fn stop(&mut self) {
        self.alpha = 0.0;
        self.running = false;
    }

    pub fn reheat(&mut self, target: f32) {
        self.alpha_target = target;
        self.running = true;
    }

    pub fn cool_down(&mut self) {
        self.alpha_target = 0.0;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    pub node_count: usize,
    pub link_count: usize,
    pub alpha: f32,
    pub running: bool,
    pub kinetic_energy: f32,
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

/// Advances the simulation by one frame.
pub fn step(arena: &mut LayoutArena, cooling: &mut Cooling, params: &LayoutParams) -> StepReport {
    if arena.is_empty() {
        cooling.running = false;
        return StepReport {
            alpha: cooling.alpha,
            generation: cooling.generation,
            ..StepReport::default()
        };
    }

    if !cooling.running {
        return report(arena, cooling, 0.0);
    }

    cooling.alpha += (cooling.alpha_target - cooling.alpha) * (1.0 - params.alpha_decay);
    cooling.alpha = cooling.alpha.max(0.0);

    let positions = arena.nodes.iter().map(|node| node.position).collect::<Vec<_>>();
    let centroids = arena
        .clusters
        .iter()
        .map(|slot| cluster_centroid(slot, &arena.nodes))
        .collect::<Vec<_>>();
    let quadtree = Quadtree::build(&positions);

    let mut deltas = mem::take(&mut arena.forces);
    deltas.clear();
    {
        let ctx = ForceContext {
            alpha: cooling.alpha,
            center: arena.canvas.center(),
            positions: &positions,
            links: &arena.links,
            adjacency: &arena.adjacency,
            clusters: &arena.clusters,
            centroids: &centroids,
            quadtree: quadtree.as_ref(),
            focus: arena.focus,
            radial_slots: &arena.radial_slots,
            radial_count: arena.radial_count,
        };
        deltas.extend((0..arena.nodes.len()).map(|index| net_force(index, &arena.nodes, &ctx, params)));
    }

    let retain = 1.0 - params.velocity_decay;
    let mut kinetic_energy = 0.0;
    for (node, delta) in arena.nodes.iter_mut().zip(&deltas) {
        if let Some(anchor) = node.state.anchor() {
            node.position = anchor;
            node.velocity = Vec2::ZERO;
            continue;
        }
        if !delta.is_finite() {
            continue;
        }

        node.velocity = (node.velocity + *delta) * retain;
        node.position += node.velocity;
        kinetic_energy += node.velocity.length_sq();
    }
    arena.forces = deltas;

    if cooling.alpha < params.alpha_min && cooling.alpha_target < params.alpha_min {
        cooling.running = false;
        debug!(
            generation = cooling.generation,
            alpha = cooling.alpha,
            kinetic_energy,
            "layout cooled"
        );
    }

    report(arena, cooling, kinetic_energy)
}

fn report(arena: &LayoutArena, cooling: &Cooling, kinetic_energy: f32) -> StepReport {
    StepReport {
        node_count: arena.nodes.len(),
        link_count: arena.links.len(),
        alpha: cooling.alpha,
        running: cooling.running,
        kinetic_energy,
        generation: cooling.generation,
    }
}

/// Owns the node arena and its cooling schedule across frames.
#[derive(Debug)]
pub struct LayoutEngine {
    arena: LayoutArena,
    cooling: Cooling,
    params: LayoutParams,
    canvas: Canvas,
    identity: Option<LayoutIdentity>,
    last_report: StepReport,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(Canvas::default(), LayoutParams::default())
    }
}

impl LayoutEngine {
    pub fn new(canvas: Canvas, params: LayoutParams) -> Self {
        Self {
            arena: LayoutArena::default(),
            cooling: Cooling::default(),
            params: params.sanitized(),
            canvas,
            identity: None,
            last_report: StepReport::default(),
        }
    }

    /// Rebuilds the arena for `visible`. Returns `false` and keeps the running
    /// layout when the node set, links, mode and focus are unchanged.
    pub fn load(&mut self, graph: &Graph, visible: &VisibleGraph, mode: SelectionMode) -> bool {
        let arena = LayoutArena::build(graph, visible, self.canvas, &self.params);
        let identity = arena.identity(mode);
        if self.identity.as_ref() == Some(&identity) {
            return false;
        }

        self.arena = arena;
        self.identity = Some(identity);
        self.cooling.restart();
        self.last_report = report(&self.arena, &self.cooling, 0.0);
        debug!(
            generation = self.cooling.generation,
            nodes = self.arena.len(),
            links = self.arena.links.len(),
            focus = ?self.arena.focus().map(|node| node.id.as_str()),
            "layout reset"
        );
        true
    }

    /// Reseeds every free node and starts a fresh run.
    pub fn reset(&mut self) {
        self.arena.seed(&self.params);
        self.cooling.restart();
        self.last_report = report(&self.arena, &self.cooling, 0.0);
        debug!(generation = self.cooling.generation, "layout reseeded");
    }

    /// Reheats to full temperature from the current positions.
    pub fn restart(&mut self) {
        self.cooling.restart();
        debug!(generation = self.cooling.generation, "layout restarted");
    }

    pub fn stop(&mut self) {
        self.cooling.stop();
        debug!(generation = self.cooling.generation, "layout stopped");
    }

    pub fn tick(&mut self) -> StepReport {
        self.last_report = step(&mut self.arena, &mut self.cooling, &self.params);
        self.last_report
    }

    /// Steps until the layout cools or `max_steps` is reached. Returns the number
    /// of steps taken.
    pub fn run_until_cool(&mut self, max_steps: usize) -> usize {
        let generation = self.cooling.generation;
        let mut steps = 0;
        while self.cooling.running && steps < max_steps && self.cooling.generation == generation {
            self.tick();
            steps += 1;
        }
        steps
    }

    pub fn begin_drag(&mut self, id: &str, position: Vec2) -> bool {
        let Some(node) = self.arena.node_mut(id) else {
            return false;
        };

        node.state = NodeState::Dragging { position };
        node.position = position;
        node.velocity = Vec2::ZERO;
        self.cooling.reheat(self.params.drag_alpha_target);
        true
    }

    pub fn drag_to(&mut self, id: &str, position: Vec2) -> bool {
        let Some(node) = self.arena.node_mut(id) else {
            return false;
        };
        if !matches!(node.state, NodeState::Dragging { .. }) {
            return false;
        }

        node.state = NodeState::Dragging { position };
        node.position = position;
        true
    }

    pub fn end_drag(&mut self, id: &str) -> bool {
        let Some(node) = self.arena.node_mut(id) else {
            return false;
        };
        if !matches!(node.state, NodeState::Dragging { .. }) {
            return false;
        }

        node.state = NodeState::Free;
        self.cooling.cool_down();
        true
    }

    pub fn pin(&mut self, id: &str, position: Vec2) -> bool {
        let Some(node) = self.arena.node_mut(id) else {
            return false;
        };

        node.state = NodeState::Pinned { position };
        node.position = position;
        node.velocity = Vec2::ZERO;
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(node) = self.arena.node_mut(id) else {
            return false;
        };
        if node.state.is_free() {
            return false;
        }

        node.state = NodeState::Free;
        true
    }

    pub fn positions(&self) -> Vec<NodePosition> {
        self.arena
            .nodes
            .iter()
            .map(|node| NodePosition {
                id: node.id.clone(),
                x: node.position.x,
                y: node.position.y,
            })
            .collect()
    }

    pub fn position_of(&self, id: &str) -> Option<Vec2> {
        self.arena.node(id).map(|node| node.position)
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        self.arena.nodes()
    }

    pub fn arena(&self) -> &LayoutArena {
        &self.arena
    }

    pub fn alpha(&self) -> f32 {
        self.cooling.alpha
    }

    pub fn is_running(&self) -> bool {
        self.cooling.running
    }

    pub fn generation(&self) -> u64 {
        self.cooling.generation
    }

    pub fn last_report(&self) -> StepReport {
        self.last_report
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Swaps the tunables and nudges the layout so the change becomes visible.
    pub fn set_params(&mut self, params: LayoutParams) {
        self.params = params.sanitized();
        self.cooling.alpha = self.cooling.alpha.max(self.params.drag_alpha_target);
        self.cooling.running = true;
    }

    pub fn cluster_centers(&self) -> impl Iterator<Item = (&ClusterLabel, Vec2)> {
        self.arena.clusters.iter().map(|slot| (&slot.label, slot.center))
    }

    pub fn nearest_cluster(&self, position: Vec2) -> Option<&ClusterLabel> {
        self.arena
            .nearest_cluster(position)
            .map(|index| &self.arena.clusters[index].label)
    }

    pub fn cluster_of(&self, id: &str) -> Option<&ClusterLabel> {
        self.arena
            .node(id)
            .map(|node| &self.arena.clusters[node.cluster].label)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::{Cluster, Entity, EntityKind, Transaction};
    use crate::graph::transform;
    use crate::selection::{SelectionState, filter};

    fn sample() -> Graph {
        let clusters = [
            Cluster::new(
                "shop",
                vec![
                    Entity::new("a", EntityKind::BankAccount, "A"),
                    Entity::new("b", EntityKind::EWallet, "B"),
                ],
            ),
            Cluster::new("casino", vec![Entity::new("c", EntityKind::Qris, "C")]),
        ];
        let standalone = [Entity::new("d", EntityKind::PhoneNumber, "D")];
        let transactions = [
            Transaction::new("a", "b", 10.0),
            Transaction::new("b", "c", 20.0),
            Transaction::new("d", "a", 30.0),
        ];
        transform(&clusters, &standalone, &transactions).graph
    }

    fn loaded(selection: &SelectionState) -> (Graph, LayoutEngine) {
        let graph = sample();
        let mut engine = LayoutEngine::default();
        let visible = filter(&graph, selection);
        assert!(engine.load(&graph, &visible, selection.mode()));
        (graph, engine)
    }

    #[test]
    fn alpha_decays_by_one_percent_per_step() {
        let (_, mut engine) = loaded(&SelectionState::default());

        let report = engine.tick();
        assert_relative_eq!(report.alpha, 0.99, epsilon = 1e-6);
        engine.tick();
        assert_relative_eq!(engine.alpha(), 0.9801, epsilon = 1e-6);
        assert_eq!(report.node_count, 4);
        assert_eq!(report.link_count, 3);
    }

    #[test]
    fn cools_below_threshold_and_stops() {
        let (_, mut engine) = loaded(&SelectionState::default());

        let steps = engine.run_until_cool(1000);
        assert!(steps < 1000);
        assert!(!engine.is_running());
        assert!(engine.alpha() < 0.001);

        let before = engine.positions();
        let report = engine.tick();
        assert_eq!(report.kinetic_energy, 0.0);
        assert_eq!(engine.positions(), before);
    }

    #[test]
    fn same_identity_does_not_reset() {
        let (graph, mut engine) = loaded(&SelectionState::default());
        engine.run_until_cool(50);
        let generation = engine.generation();

        let visible = filter(&graph, &SelectionState::default());
        assert!(!engine.load(&graph, &visible, SelectionMode::Default));
        assert_eq!(engine.generation(), generation);

        assert!(engine.load(&graph, &visible, SelectionMode::Multi));
        assert_eq!(engine.generation(), generation + 1);
        assert_eq!(engine.alpha(), 1.0);
    }

    #[test]
    fn pinned_node_stays_put() {
        let (_, mut engine) = loaded(&SelectionState::default());
        let anchor = vec2(42.0, 24.0);

        assert!(engine.pin("a", anchor));
        for _ in 0..20 {
            engine.tick();
        }
        assert_eq!(engine.position_of("a"), Some(anchor));
        assert_eq!(engine.arena().node("a").map(|node| node.velocity), Some(Vec2::ZERO));

        assert!(engine.unpin("a"));
        engine.tick();
        assert_ne!(engine.position_of("a"), Some(anchor));
    }

    #[test]
    fn drag_reheats_a_stopped_run_and_release_cools_it() {
        let (_, mut engine) = loaded(&SelectionState::default());
        engine.stop();
        assert!(!engine.is_running());

        assert!(engine.begin_drag("c", vec2(10.0, 10.0)));
        assert!(engine.is_running());
        for _ in 0..400 {
            engine.tick();
        }
        assert!(engine.alpha() > 0.25);
        assert!(engine.drag_to("c", vec2(20.0, 30.0)));
        engine.tick();
        assert_eq!(engine.position_of("c"), Some(vec2(20.0, 30.0)));

        assert!(engine.end_drag("c"));
        assert!(!engine.end_drag("c"));
        engine.run_until_cool(1000);
        assert!(!engine.is_running());
    }

    #[test]
    fn slow_cooling_still_reheats_on_drag() {
        let graph = sample();
        let params = LayoutParams {
            alpha_decay: 0.999,
            ..Default::default()
        };
        let mut engine = LayoutEngine::new(Canvas::default(), params);
        engine.load(&graph, &filter(&graph, &SelectionState::default()), SelectionMode::Default);
        engine.stop();

        assert!(engine.begin_drag("a", vec2(40.0, 40.0)));
        for _ in 0..5 {
            let report = engine.tick();
            assert!(report.running);
        }
        assert!(engine.alpha() > 0.0);

        assert!(engine.end_drag("a"));
        let steps = engine.run_until_cool(20_000);
        assert!(steps < 20_000);
        assert!(!engine.is_running());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (_, mut engine) = loaded(&SelectionState::default());

        assert!(!engine.begin_drag("ghost", Vec2::ZERO));
        assert!(!engine.pin("ghost", Vec2::ZERO));
        assert!(!engine.unpin("a"));
        assert_eq!(engine.position_of("ghost"), None);
    }

    #[test]
    fn empty_engine_does_no_work() {
        let mut engine = LayoutEngine::default();
        let graph = Graph::default();
        let visible = filter(&graph, &SelectionState::default());
        engine.load(&graph, &visible, SelectionMode::Default);

        let report = engine.tick();
        assert_eq!(report.node_count, 0);
        assert_eq!(report.link_count, 0);
        assert!(!engine.is_running());
        assert!(engine.positions().is_empty());
    }

    #[test]
    fn stop_and_restart_control_the_run() {
        let (_, mut engine) = loaded(&SelectionState::default());
        let generation = engine.generation();

        engine.stop();
        assert_eq!(engine.alpha(), 0.0);
        assert!(!engine.tick().running);

        engine.restart();
        assert_eq!(engine.alpha(), 1.0);
        assert!(engine.is_running());
        assert_eq!(engine.generation(), generation + 1);
    }

    #[test]
    fn focus_pulls_focused_node_toward_center() {
        let (_, mut engine) = loaded(&SelectionState::focused("b"));
        let center = engine.canvas().center();

        engine.run_until_cool(1000);
        let focused = engine.position_of("b").expect("focused node");
        let neighbor = engine.position_of("a").expect("neighbor");
        assert!((focused - center).length() < (neighbor - center).length());
    }
}
