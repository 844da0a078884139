use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use jaring::interaction::{on_mode_change, on_node_click};
use jaring::selection::{SelectionMode, SelectionState};
use jaring::util::short_id;

use super::super::ViewModel;

const SEARCH_RESULT_LIMIT: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Entities whose holder, identifier or id match the search box, best first.
    fn search_results(&self) -> Vec<(String, String)> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .graph
            .nodes()
            .iter()
            .filter_map(|node| {
                let entity = &node.entity;
                [&entity.holder, &entity.identifier, &entity.id]
                    .into_iter()
                    .filter_map(|text| fuzzy_match_score(&matcher, text, query))
                    .max()
                    .map(|score| (score, node))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

        scored
            .into_iter()
            .take(SEARCH_RESULT_LIMIT)
            .map(|(_, node)| {
                let label = format!(
                    "{}  ({}, {})",
                    node.entity.holder,
                    node.entity.kind,
                    short_id(&node.entity.identifier, 18)
                );
                (node.id.clone(), label)
            })
            .collect()
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label(RichText::new("Selection mode").strong());
        let mut mode = self.selection.mode();
        ui.horizontal(|ui| {
            for candidate in [SelectionMode::Default, SelectionMode::Multi] {
                ui.selectable_value(&mut mode, candidate, candidate.label())
                    .on_hover_text(match candidate {
                        SelectionMode::Default => "Click an entity to focus its direct counterparties.",
                        SelectionMode::Multi => "Click entities to collect them into a batch.",
                    });
            }
        });
        if mode != self.selection.mode() {
            let next = on_mode_change(mode, &self.selection);
            self.set_selection(next);
        }

        let summary = match &self.selection {
            SelectionState::Default { focus: Some(focus) } => {
                Some(format!("Focused: {}", short_id(focus, 24)))
            }
            SelectionState::Multi { selected } if !selected.is_empty() => {
                Some(format!("{} selected", selected.len()))
            }
            _ => None,
        };
        if let Some(summary) = summary {
            ui.horizontal(|ui| {
                ui.label(summary);
                if ui.small_button("Clear").clicked() {
                    self.set_selection(SelectionState::empty(self.selection.mode()));
                }
            });
        }

        ui.separator();
        ui.label("Search (holder, identifier or id)")
            .on_hover_text("Fuzzy match entities, then click a result to select it.");
        ui.text_edit_singleline(&mut self.search);

        let results = self.search_results();
        if !results.is_empty() {
            egui::ScrollArea::vertical()
                .id_salt("search_results_scroll")
                .max_height(220.0)
                .show(ui, |ui| {
                    for (id, label) in results {
                        let selected = self.selection.is_selected(&id);
                        if ui.selectable_label(selected, label).on_hover_text(id.as_str()).clicked() {
                            let next = on_node_click(&id, &self.selection);
                            self.set_selection(next);
                        }
                    }
                });
        } else if !self.search.trim().is_empty() {
            ui.small("No matching entities.");
        }

        ui.separator();
        ui.label(RichText::new("Simulation").strong());
        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Advance the layout once per frame while it is still cooling.");
        ui.horizontal(|ui| {
            if ui.button("Restart").on_hover_text("Reheat from the current positions.").clicked() {
                self.engine.restart();
            }
            if ui.button("Stop").on_hover_text("Freeze the layout where it is.").clicked() {
                self.engine.stop();
            }
            if ui.button("Reset layout").on_hover_text("Reseed positions and run again.").clicked() {
                self.engine.reset();
            }
            if ui.button("Recenter").clicked() {
                self.pan = egui::Vec2::ZERO;
                self.zoom = 1.0;
            }
        });

        ui.collapsing("Physics tuning", |ui| {
            let mut changed = false;
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.params.link_distance, 30.0..=300.0)
                        .text("Link distance"),
                )
                .on_hover_text("Base rest length of a transaction link.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.params.repulsion_strength, -1200.0..=0.0)
                        .text("Repulsion"),
                )
                .on_hover_text("Many-body strength; more negative pushes entities further apart.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.params.collision_radius, 0.0..=120.0)
                        .text("Collision radius"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.params.cohesion_strength, 0.0..=1.5)
                        .text("Cluster cohesion"),
                )
                .on_hover_text("Pull toward the site cluster center without a focus.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.params.cluster_separation_strength, 0.0..=10.0)
                        .text("Cluster separation"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.params.radial_radius, 80.0..=400.0)
                        .text("Focus ring radius"),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.params.velocity_decay, 0.05..=0.9)
                        .text("Velocity decay"),
                )
                .changed();

            if ui.button("Defaults").clicked() {
                self.params = Default::default();
                changed = true;
            }
            if changed {
                self.engine.set_params(self.params);
            }
        });

        ui.separator();
        ui.label(RichText::new("Payload diagnostics").strong());
        if self.diagnostics.is_clean() {
            ui.label("All records were usable.");
        } else {
            ui.label(format!(
                "Duplicate entities dropped: {}",
                self.diagnostics.duplicate_entities
            ));
            ui.label(format!(
                "Transactions with unknown endpoints: {}",
                self.diagnostics.dangling_transactions
            ));
        }
    }
}
