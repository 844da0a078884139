use eframe::egui::{self, RichText, Ui};

use jaring::data::PriorityLevel;
use jaring::graph::{Edge, NodeId};
use jaring::interaction::on_node_click;
use jaring::selection::{SelectionMode, SelectionState};
use jaring::util::{format_amount, short_id};

use super::super::ViewModel;
use super::super::render_utils::priority_color;

struct TransferRow {
    counterpart: String,
    label: String,
}

impl ViewModel {
    const TRANSFER_ROWS: usize = 40;

    fn transfer_rows<'a>(
        &self,
        edges: impl Iterator<Item = &'a Edge>,
        counterpart: impl Fn(&Edge) -> NodeId,
    ) -> Vec<TransferRow> {
        edges
            .take(Self::TRANSFER_ROWS)
            .map(|edge| {
                let other = &self.graph.node(counterpart(edge)).entity;
                let mut label = format!(
                    "{}  {}",
                    format_amount(edge.transaction.amount),
                    short_id(&other.holder, 22)
                );
                if !edge.transaction.timestamp.is_empty() {
                    label.push_str(&format!("  ({})", edge.transaction.timestamp));
                }
                TransferRow {
                    counterpart: other.id.clone(),
                    label,
                }
            })
            .collect()
    }

    fn draw_transfer_list(&mut self, ui: &mut Ui, salt: &str, rows: Vec<TransferRow>) {
        if rows.is_empty() {
            ui.small("None.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt(salt)
            .max_height(200.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for row in rows {
                    if ui.link(row.label).on_hover_text(row.counterpart.as_str()).clicked() {
                        self.set_selection(SelectionState::focused(row.counterpart));
                    }
                }
            });
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Entity Details");
        ui.add_space(6.0);

        match self.selection.clone() {
            SelectionState::Default { focus: Some(id) } => self.draw_entity(ui, &id),
            SelectionState::Default { focus: None } => {
                let hovered = self.interaction.hovered().map(str::to_owned);
                match hovered {
                    Some(id) => self.draw_entity(ui, &id),
                    None => {
                        ui.label("Click an entity to focus it and its counterparties.");
                    }
                }
            }
            SelectionState::Multi { selected } => self.draw_batch(ui, selected.iter()),
        }
    }

    fn draw_entity(&mut self, ui: &mut Ui, id: &str) {
        let Some(node_id) = self.graph.node_id(id) else {
            ui.label("This entity is no longer part of the graph.");
            return;
        };

        let node = self.graph.node(node_id);
        let entity = node.entity.clone();
        let cluster = node.cluster.to_string();
        let neighbor_count = self.graph.neighbors(node_id).len();

        ui.label(RichText::new(&entity.holder).strong().size(16.0));
        ui.small(entity.id.as_str());
        ui.add_space(6.0);

        egui::Grid::new("entity_fields")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Type");
                ui.label(entity.kind.label());
                ui.end_row();
                ui.label("Identifier");
                ui.label(entity.identifier.as_str());
                ui.end_row();
                if let Some(info) = &entity.specific_info {
                    ui.label("Provider");
                    ui.label(info.as_str());
                    ui.end_row();
                }
                ui.label("Cluster");
                ui.label(cluster);
                ui.end_row();
                ui.label("Priority");
                ui.label(
                    RichText::new(format!(
                        "{} ({})",
                        entity.priority_score,
                        entity.priority().label()
                    ))
                    .color(priority_color(entity.priority())),
                );
                ui.end_row();
                ui.label("Connections");
                ui.label(format!("{} ({neighbor_count} in graph)", entity.connection_count));
                ui.end_row();
                ui.label("Transactions");
                ui.label(entity.transaction_count.to_string());
                ui.end_row();
                ui.label("Total amount");
                ui.label(format_amount(entity.total_amount));
                ui.end_row();
            });

        ui.add_space(6.0);
        let layout_state = self.engine.arena().node(id).map(|layout| layout.state);
        match layout_state {
            Some(state) if state.is_free() => {
                if ui.button("Pin in place").clicked()
                    && let Some(position) = self.engine.position_of(id)
                {
                    self.engine.pin(id, position);
                }
            }
            Some(_) => {
                if ui.button("Unpin").clicked() {
                    self.engine.unpin(id);
                    self.engine.restart();
                }
            }
            None => {
                ui.small("Not in the current view.");
            }
        }

        if self.selection.mode() == SelectionMode::Default
            && self.selection.focus() != Some(id)
            && ui.button("Focus").clicked()
        {
            let next = on_node_click(id, &self.selection);
            self.set_selection(next);
        }

        ui.separator();
        let outgoing = self.transfer_rows(self.graph.outgoing(node_id), |edge| edge.target);
        let incoming = self.transfer_rows(self.graph.incoming(node_id), |edge| edge.source);

        ui.label(RichText::new(format!("Outgoing ({})", outgoing.len())).strong());
        self.draw_transfer_list(ui, "outgoing_scroll", outgoing);
        ui.add_space(6.0);
        ui.label(RichText::new(format!("Incoming ({})", incoming.len())).strong());
        self.draw_transfer_list(ui, "incoming_scroll", incoming);
    }

    fn draw_batch<'a>(&mut self, ui: &mut Ui, selected: impl Iterator<Item = &'a String>) {
        let entities = selected
            .filter_map(|id| self.graph.node_by_entity(id))
            .map(|node| node.entity.clone())
            .collect::<Vec<_>>();

        if entities.is_empty() {
            ui.label("Click entities to add them to the batch.");
            return;
        }

        let total = entities.iter().map(|entity| entity.total_amount).sum::<f64>();
        let high = entities
            .iter()
            .filter(|entity| entity.priority() == PriorityLevel::High)
            .count();
        ui.label(format!("{} entities selected", entities.len()));
        ui.label(format!("Combined amount: {}", format_amount(total)));
        ui.label(format!("High priority: {high}"));
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("batch_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entity in entities {
                    let label = format!(
                        "{}  ({}, {})",
                        entity.holder,
                        entity.kind,
                        entity.priority_score
                    );
                    if ui.link(label).on_hover_text("Remove from batch").clicked() {
                        let next = on_node_click(&entity.id, &self.selection);
                        self.set_selection(next);
                    }
                }
            });
    }
}
