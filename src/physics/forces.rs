use eframe::egui::{Vec2, vec2};

use crate::graph::EdgeKind;

use super::arena::{ClusterSlot, LayoutNode, Link};
use super::params::LayoutParams;
use super::quadtree::Quadtree;

/// Read-only view of one step, shared by every force.
pub(super) struct ForceContext<'a> {
    pub(super) alpha: f32,
    pub(super) center: Vec2,
    pub(super) positions: &'a [Vec2],
    pub(super) links: &'a [Link],
    pub(super) adjacency: &'a [Vec<usize>],
    pub(super) clusters: &'a [ClusterSlot],
    pub(super) centroids: &'a [Option<Vec2>],
    pub(super) quadtree: Option<&'a Quadtree>,
    pub(super) focus: Option<usize>,
    pub(super) radial_slots: &'a [Option<usize>],
    pub(super) radial_count: usize,
}

impl ForceContext<'_> {
    fn focus_active(&self) -> bool {
        self.focus.is_some()
    }
}

pub(super) type ForceFn = fn(usize, &[LayoutNode], &ForceContext<'_>, &LayoutParams) -> Vec2;

pub(super) struct Force {
    pub(super) name: &'static str,
    pub(super) apply: ForceFn,
}

/// Evaluated in this order and summed into each node's velocity delta.
pub(super) const FORCES: [Force; 7] = [
    Force {
        name: "link",
        apply: link_force,
    },
    Force {
        name: "repulsion",
        apply: repulsion_force,
    },
    Force {
        name: "centering",
        apply: centering_force,
    },
    Force {
        name: "collision",
        apply: collision_force,
    },
    Force {
        name: "cohesion",
        apply: cohesion_force,
    },
    Force {
        name: "separation",
        apply: separation_force,
    },
    Force {
        name: "radial",
        apply: radial_force,
    },
];

pub(super) fn net_force(
    index: usize,
    nodes: &[LayoutNode],
    ctx: &ForceContext<'_>,
    params: &LayoutParams,
) -> Vec2 {
    FORCES
        .iter()
        .fold(Vec2::ZERO, |sum, force| sum + (force.apply)(index, nodes, ctx, params))
}

/// Unit vector from `to` toward `from` and the distance between them. Coincident
/// points get a fixed per-pair angle instead of a zero direction.
fn pair_direction(from: usize, to: usize, delta: Vec2) -> (Vec2, f32) {
    let distance = delta.length();
    if distance > 0.0001 {
        return (delta / distance, distance);
    }

    let (low, high) = (from.min(to), from.max(to));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let unit = vec2(angle.cos(), angle.sin());
    // Both sides of the pair share one axis and point away from each other.
    (if from < to { unit } else { -unit }, 0.0)
}

fn link_distance(link: &Link, ctx: &ForceContext<'_>, params: &LayoutParams) -> f32 {
    let mut distance = params.link_distance;
    if link.kind == EdgeKind::Transfer {
        distance += params.transfer_distance_bonus;
    }
    if ctx.focus_active() {
        distance += params.focus_distance_bonus;
    }
    distance
}

fn link_force(
    index: usize,
    _nodes: &[LayoutNode],
    ctx: &ForceContext<'_>,
    params: &LayoutParams,
) -> Vec2 {
    let mut force = Vec2::ZERO;

    for &link_index in &ctx.adjacency[index] {
        let link = &ctx.links[link_index];
        let (source, target) = (link.source, link.target);
        let delta = ctx.positions[target] - ctx.positions[source];
        let (direction, distance) = pair_direction(target, source, delta);
        let distance = distance.max(1.0);

        let stretch = (distance - link_distance(link, ctx, params))
            * link.strength
            * params.link_strength_scale
            * ctx.alpha;

        let source_degree = ctx.adjacency[source].len() as f32;
        let target_degree = ctx.adjacency[target].len() as f32;
        let bias = source_degree / (source_degree + target_degree);

        if index == target {
            force -= direction * stretch * bias;
        } else {
            force += direction * stretch * (1.0 - bias);
        }
    }

    force
}

fn repulsion_force(
    index: usize,
    _nodes: &[LayoutNode],
    ctx: &ForceContext<'_>,
    params: &LayoutParams,
) -> Vec2 {
    let Some(quadtree) = ctx.quadtree else {
        return Vec2::ZERO;
    };

    let point = ctx.positions[index];
    let scaled_strength = params.repulsion_strength * ctx.alpha;
    let mut force = Vec2::ZERO;
    quadtree.walk(|cell, members| {
        if cell.mass <= 0.0 {
            return false;
        }

        if cell.is_leaf() {
            for &other in members.iter().filter(|&&other| other != index) {
                force += repulsion_between(index, other, point - ctx.positions[other], scaled_strength);
            }
            return false;
        }

        let delta = point - cell.centroid;
        let distance = delta.length().max(1.0);
        if !cell.contains(point) && cell.side() / distance < params.barnes_hut_theta {
            force -= delta / distance * (scaled_strength * cell.mass / distance);
            return false;
        }
        true
    });
    force
}

fn repulsion_between(from: usize, to: usize, delta: Vec2, scaled_strength: f32) -> Vec2 {
    let (direction, distance) = pair_direction(from, to, delta);
    // Negative strength pushes `from` away from `to`.
    -direction * (scaled_strength / distance.max(1.0))
}

fn centering_force(
    index: usize,
    nodes: &[LayoutNode],
    ctx: &ForceContext<'_>,
    params: &LayoutParams,
) -> Vec2 {
    (ctx.center - nodes[index].position) * params.centering_strength * ctx.alpha
}

fn collision_force(
    index: usize,
    _nodes: &[LayoutNode],
    ctx: &ForceContext<'_>,
    params: &LayoutParams,
) -> Vec2 {
    let Some(quadtree) = ctx.quadtree else {
        return Vec2::ZERO;
    };

    let reach = params.collision_radius * 2.0;
    if reach <= 0.0 {
        return Vec2::ZERO;
    }

    let point = ctx.positions[index];
    let strength = params.collision_strength;
    let mut force = Vec2::ZERO;
    quadtree.walk(|cell, members| {
        if cell.distance_sq_to(point) > reach * reach {
            return false;
        }

        for &other in members.iter().filter(|&&other| other != index) {
            let (direction, distance) = pair_direction(index, other, point - ctx.positions[other]);
            if distance < reach {
                // Each side of the pair resolves half the overlap.
                force += direction * (reach - distance) * 0.5 * strength;
            }
        }
        true
    });
    force
}

fn cohesion_force(
    index: usize,
    nodes: &[LayoutNode],
    ctx: &ForceContext<'_>,
    params: &LayoutParams,
) -> Vec2 {
    let node = &nodes[index];
    let strength = if ctx.focus_active() {
        params.focus_cohesion_strength
    } else {
        params.cohesion_strength
    };

    (ctx.clusters[node.cluster].center - node.position) * strength * ctx.alpha
}

fn separation_force(
    index: usize,
    nodes: &[LayoutNode],
    ctx: &ForceContext<'_>,
    params: &LayoutParams,
) -> Vec2 {
    let own = nodes[index].cluster;
    if ctx.clusters[own].label.is_standalone() {
        return Vec2::ZERO;
    }
    let Some(own_centroid) = ctx.centroids[own] else {
        return Vec2::ZERO;
    };

    let mut force = Vec2::ZERO;
    for (other, slot) in ctx.clusters.iter().enumerate() {
        if other == own || slot.label.is_standalone() {
            continue;
        }
        let Some(other_centroid) = ctx.centroids[other] else {
            continue;
        };

        let (direction, distance) = pair_direction(own, other, own_centroid - other_centroid);
        if distance < params.cluster_min_separation {
            let overlap = params.cluster_min_separation - distance;
            force += direction * overlap * params.cluster_separation_strength * ctx.alpha;
        }
    }

    force
}

fn radial_force(
    index: usize,
    nodes: &[LayoutNode],
    ctx: &ForceContext<'_>,
    params: &LayoutParams,
) -> Vec2 {
    let Some(focus) = ctx.focus else {
        return Vec2::ZERO;
    };

    let target = if index == focus {
        ctx.center
    } else {
        let Some(slot) = ctx.radial_slots[index] else {
            return Vec2::ZERO;
        };
        let angle = std::f32::consts::TAU * slot as f32 / ctx.radial_count.max(1) as f32;
        ctx.center + Vec2::angled(angle) * params.radial_radius
    };

    (target - nodes[index].position) * params.radial_strength * ctx.alpha
}
