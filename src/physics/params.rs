use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Tunables for the layout simulation. Distances are in canvas units.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Fraction of alpha kept per step while cooling toward `alpha_target`.
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub drag_alpha_target: f32,
    /// Fraction of velocity lost per step.
    pub velocity_decay: f32,
    pub link_distance: f32,
    pub transfer_distance_bonus: f32,
    pub focus_distance_bonus: f32,
    pub link_strength_scale: f32,
    /// Many-body strength; negative repels.
    pub repulsion_strength: f32,
    pub barnes_hut_theta: f32,
    pub centering_strength: f32,
    pub collision_radius: f32,
    pub collision_strength: f32,
    pub cohesion_strength: f32,
    pub focus_cohesion_strength: f32,
    /// Cluster ring radius as a share of the smaller canvas side.
    pub cluster_ring_ratio: f32,
    pub cluster_min_separation: f32,
    pub cluster_separation_strength: f32,
    pub radial_radius: f32,
    pub radial_strength: f32,
    pub seed_spread: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            alpha_decay: 0.99,
            alpha_min: 0.001,
            drag_alpha_target: 0.3,
            velocity_decay: 0.4,
            link_distance: 100.0,
            transfer_distance_bonus: 50.0,
            focus_distance_bonus: 50.0,
            link_strength_scale: 0.2,
            repulsion_strength: -300.0,
            barnes_hut_theta: 0.72,
            centering_strength: 0.05,
            collision_radius: 50.0,
            collision_strength: 0.7,
            cohesion_strength: 0.8,
            focus_cohesion_strength: 0.3,
            cluster_ring_ratio: 0.3,
            cluster_min_separation: 250.0,
            cluster_separation_strength: 3.0,
            radial_radius: 200.0,
            radial_strength: 0.6,
            seed_spread: 60.0,
        }
    }
}

impl LayoutParams {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout params from {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(raw).context("invalid layout params JSON")?;
        Ok(params.sanitized())
    }

    /// Clamps values that would stop the simulation from converging.
    pub fn sanitized(mut self) -> Self {
        self.alpha_decay = self.alpha_decay.clamp(0.5, 0.9999);
        self.alpha_min = self.alpha_min.clamp(1e-6, 0.5);
        self.drag_alpha_target = self.drag_alpha_target.clamp(0.0, 1.0);
        self.velocity_decay = self.velocity_decay.clamp(0.05, 0.95);
        self.barnes_hut_theta = self.barnes_hut_theta.clamp(0.1, 2.0);
        self.collision_radius = self.collision_radius.max(0.0);
        self.collision_strength = self.collision_strength.clamp(0.0, 1.0);
        self.cluster_ring_ratio = self.cluster_ring_ratio.clamp(0.0, 0.5);
        self
    }
}
