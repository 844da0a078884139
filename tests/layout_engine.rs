mod common;

use approx::assert_relative_eq;
use eframe::egui::vec2;
use jaring::data::{Cluster, EntityKind, GraphPayload};
use jaring::graph::ClusterLabel;
use jaring::selection::{SelectionMode, SelectionState, filter};
use jaring::{Canvas, Graph, LayoutEngine, LayoutParams};

use common::{entity, sample_payload};

fn loaded(graph: &Graph, selection: &SelectionState, params: LayoutParams) -> LayoutEngine {
    let mut engine = LayoutEngine::new(Canvas::default(), params);
    engine.load(graph, &filter(graph, selection), selection.mode());
    engine
}

#[test]
fn sample_layout_settles() {
    let graph = sample_payload().transform().graph;
    let mut engine = loaded(&graph, &SelectionState::default(), LayoutParams::default());

    let steps = engine.run_until_cool(1_000);
    assert!(steps < 1_000, "still running after {steps} steps");
    assert!(!engine.is_running());

    for node in engine.nodes() {
        assert!(node.position.x.is_finite() && node.position.y.is_finite());
        assert!(node.velocity.length() < 5.0, "{} still moving", node.id);
    }

    let before = engine.positions();
    let report = engine.tick();
    assert_eq!(report.kinetic_energy, 0.0);
    assert_eq!(engine.positions(), before);
}

#[test]
fn identical_inputs_give_identical_layouts() {
    let graph = sample_payload().transform().graph;
    let selection = SelectionState::focused("bca-1");

    let mut first = loaded(&graph, &selection, LayoutParams::default());
    let mut second = loaded(&graph, &selection, LayoutParams::default());
    first.run_until_cool(1_000);
    second.run_until_cool(1_000);
    assert_eq!(first.positions(), second.positions());

    for node in first.nodes() {
        assert_eq!(first.nearest_cluster(node.position), second.nearest_cluster(node.position));
        assert_eq!(first.cluster_of(&node.id), second.cluster_of(&node.id));
    }

    second.reset();
    second.run_until_cool(1_000);
    assert_eq!(first.positions(), second.positions());
}

#[test]
fn cluster_membership_follows_the_payload() {
    let graph = sample_payload().transform().graph;
    let engine = loaded(&graph, &SelectionState::default(), LayoutParams::default());

    assert_eq!(
        engine.cluster_of("dana-1"),
        Some(&ClusterLabel::Site("slot-gacor.example".to_owned()))
    );
    assert_eq!(engine.cluster_of("phone-7"), Some(&ClusterLabel::Standalone));
    assert_eq!(engine.cluster_of("missing"), None);

    let standalone_center = engine
        .cluster_centers()
        .find(|(label, _)| label.is_standalone())
        .map(|(_, center)| center);
    assert_eq!(standalone_center, Some(Canvas::default().center()));
    assert_eq!(
        engine.nearest_cluster(Canvas::default().center()),
        Some(&ClusterLabel::Standalone)
    );
}

#[test]
fn crowded_clusters_drift_apart() {
    let payload = GraphPayload {
        clusters: vec![
            Cluster::new(
                "left.example",
                vec![entity("l1", EntityKind::BankAccount), entity("l2", EntityKind::EWallet)],
            ),
            Cluster::new(
                "right.example",
                vec![entity("r1", EntityKind::Qris), entity("r2", EntityKind::PhoneNumber)],
            ),
        ],
        ..Default::default()
    };
    let graph = payload.transform().graph;
    let params = LayoutParams {
        repulsion_strength: 0.0,
        centering_strength: 0.0,
        cohesion_strength: 0.0,
        seed_spread: 10.0,
        ..Default::default()
    };
    let mut engine = LayoutEngine::new(Canvas::new(300.0, 300.0), params);
    engine.load(&graph, &filter(&graph, &SelectionState::default()), SelectionMode::Default);

    let gap = |engine: &LayoutEngine| {
        let arena = engine.arena();
        match (arena.centroid(0), arena.centroid(1)) {
            (Some(a), Some(b)) => (a - b).length(),
            _ => f32::NAN,
        }
    };

    let initial = gap(&engine);
    assert!(initial < params.cluster_min_separation);
    for _ in 0..60 {
        engine.tick();
    }
    assert!(gap(&engine) > initial);
}

fn closest_cluster_gap(separation: f32) -> f32 {
    let kinds = [EntityKind::BankAccount, EntityKind::EWallet, EntityKind::Qris];
    let payload = GraphPayload {
        clusters: (0..8)
            .map(|site| {
                let members = kinds
                    .iter()
                    .enumerate()
                    .map(|(slot, &kind)| entity(&format!("s{site}-{slot}"), kind))
                    .collect();
                Cluster::new(format!("site-{site}.example"), members)
            })
            .collect(),
        ..Default::default()
    };
    let graph = payload.transform().graph;
    let params = LayoutParams {
        cluster_separation_strength: separation,
        ..Default::default()
    };
    let mut engine = loaded(&graph, &SelectionState::default(), params);
    engine.run_until_cool(1_000);

    let arena = engine.arena();
    let centroids = (0..arena.clusters().len())
        .filter_map(|cluster| arena.centroid(cluster))
        .collect::<Vec<_>>();
    assert_eq!(centroids.len(), 8);

    let mut closest = f32::INFINITY;
    for (index, a) in centroids.iter().enumerate() {
        for b in &centroids[index + 1..] {
            closest = closest.min((*a - *b).length());
        }
    }
    closest
}

#[test]
fn separation_holds_against_cohesion_with_default_params() {
    let separated = closest_cluster_gap(LayoutParams::default().cluster_separation_strength);
    let merged = closest_cluster_gap(0.0);

    assert!(
        separated > merged + 30.0,
        "closest clusters at {separated} with separation, {merged} without"
    );
}

#[test]
fn dragging_reheats_until_released() {
    let graph = sample_payload().transform().graph;
    let mut engine = loaded(&graph, &SelectionState::default(), LayoutParams::default());
    engine.run_until_cool(1_000);
    assert!(!engine.is_running());

    let target = vec2(120.0, 80.0);
    assert!(engine.begin_drag("ovo-2", target));
    assert!(engine.is_running());
    for _ in 0..200 {
        engine.tick();
    }
    let dragged = engine.position_of("ovo-2").expect("ovo-2 is visible");
    assert_relative_eq!(dragged.x, target.x);
    assert_relative_eq!(dragged.y, target.y);
    assert!(engine.alpha() > 0.2);

    assert!(engine.end_drag("ovo-2"));
    let steps = engine.run_until_cool(2_000);
    assert!(steps < 2_000);
    assert!(engine.nodes().iter().all(|node| node.state.is_free()));
}

#[test]
fn same_view_keeps_the_running_layout() {
    let graph = sample_payload().transform().graph;
    let selection = SelectionState::focused("bri-2");
    let mut engine = loaded(&graph, &selection, LayoutParams::default());
    for _ in 0..30 {
        engine.tick();
    }
    let generation = engine.generation();
    let positions = engine.positions();

    assert!(!engine.load(&graph, &filter(&graph, &selection), selection.mode()));
    assert_eq!(engine.generation(), generation);
    assert_eq!(engine.positions(), positions);

    let other = SelectionState::focused("bca-1");
    assert!(engine.load(&graph, &filter(&graph, &other), other.mode()));
    assert!(engine.generation() > generation);
    assert!(engine.position_of("ovo-2").is_none());
}

#[test]
fn snapshot_lists_every_visible_node_once() {
    let graph = sample_payload().transform().graph;
    let selection = SelectionState::focused("bca-1");
    let engine = loaded(&graph, &selection, LayoutParams::default());

    let mut ids = engine
        .positions()
        .into_iter()
        .map(|position| position.id)
        .collect::<Vec<_>>();
    ids.sort();
    assert_eq!(ids, ["bca-1", "bri-2", "dana-1"]);
}

#[test]
fn empty_payload_reports_nothing() {
    let graph = GraphPayload::default().transform().graph;
    let mut engine = loaded(&graph, &SelectionState::default(), LayoutParams::default());

    let report = engine.tick();
    assert_eq!(report.node_count, 0);
    assert!(!report.running);
    assert!(engine.positions().is_empty());
    assert_eq!(engine.run_until_cool(10), 0);
}
