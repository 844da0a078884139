use std::ops::Range;

use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: u8 = 12;

/// Square region of the tree with the aggregate mass of everything under it.
#[derive(Clone, Debug)]
pub(super) struct Cell {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
    pub(super) mass: f32,
    pub(super) centroid: Vec2,
    members: Range<usize>,
    children: [Option<usize>; 4],
}

impl Cell {
    fn new(center: Vec2, half_extent: f32) -> Self {
        Self {
            center,
            half_extent,
            mass: 0.0,
            centroid: Vec2::ZERO,
            members: 0..0,
            children: [None; 4],
        }
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn contains(&self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half_extent && offset.y <= self.half_extent
    }

    pub(super) fn side(&self) -> f32 {
        self.half_extent * 2.0
    }

    /// Squared distance from `point` to the closest point of the cell; zero inside.
    pub(super) fn distance_sq_to(&self, point: Vec2) -> f32 {
        ((point - self.center).abs() - Vec2::splat(self.half_extent))
            .max(Vec2::ZERO)
            .length_sq()
    }

    fn quadrant_of(&self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant_center(&self, quadrant: usize) -> Vec2 {
        let quarter = self.half_extent * 0.5;
        let sign = |bit: bool| if bit { quarter } else { -quarter };
        self.center + vec2(sign(quadrant & 1 == 1), sign(quadrant & 2 == 2))
    }
}

/// Barnes-Hut tree over one position snapshot, stored flat. Leaves own a
/// contiguous run of `order`, which is a permutation of the snapshot indices.
#[derive(Clone, Debug)]
pub(super) struct Quadtree {
    cells: Vec<Cell>,
    order: Vec<usize>,
}

impl Quadtree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let (min, max) = positions.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );
        if positions.is_empty() || !min.is_finite() || !max.is_finite() {
            return None;
        }

        let half_extent = (max - min).max_elem() * 0.5 + 1.0;
        let mut tree = Self {
            cells: vec![Cell::new((min + max) * 0.5, half_extent)],
            order: (0..positions.len()).collect(),
        };

        let mut pending = vec![(0usize, 0..positions.len(), 0u8)];
        while let Some((cell, members, depth)) = pending.pop() {
            tree.summarize(cell, members.clone(), positions);
            if members.len() <= LEAF_CAPACITY || depth >= MAX_DEPTH {
                tree.cells[cell].members = members;
                continue;
            }

            let parent = tree.cells[cell].clone();
            tree.order[members.clone()].sort_by_key(|&index| parent.quadrant_of(positions[index]));

            let mut start = members.start;
            let mut split = Vec::with_capacity(4);
            for quadrant in 0..4 {
                let len = tree.order[start..members.end]
                    .iter()
                    .take_while(|&&index| parent.quadrant_of(positions[index]) == quadrant)
                    .count();
                if len > 0 {
                    split.push((quadrant, start..start + len));
                }
                start += len;
            }

            // All points share one quadrant at this scale; keep them together.
            if split.len() <= 1 {
                tree.cells[cell].members = members;
                continue;
            }

            for (quadrant, range) in split {
                let child = tree.cells.len();
                tree.cells.push(Cell::new(
                    parent.quadrant_center(quadrant),
                    parent.half_extent * 0.5,
                ));
                tree.cells[cell].children[quadrant] = Some(child);
                pending.push((child, range, depth + 1));
            }
        }

        Some(tree)
    }

    fn summarize(&mut self, cell: usize, members: Range<usize>, positions: &[Vec2]) {
        let indices = &self.order[members];
        let sum = indices
            .iter()
            .fold(Vec2::ZERO, |sum, &index| sum + positions[index]);
        let mass = indices.len() as f32;

        let target = &mut self.cells[cell];
        target.mass = mass;
        target.centroid = if mass > 0.0 { sum / mass } else { target.center };
    }

    /// Depth-first walk from the root. `visit` receives each cell with the
    /// indices it holds directly (empty for inner cells) and returns whether to
    /// descend into its children.
    pub(super) fn walk(&self, mut visit: impl FnMut(&Cell, &[usize]) -> bool) {
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let cell = &self.cells[index];
            if visit(cell, &self.order[cell.members.clone()]) {
                stack.extend(cell.children.iter().flatten().copied());
            }
        }
    }
}
