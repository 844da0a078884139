use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2};

use jaring::data::PriorityLevel;
use jaring::selection::{EdgeFlow, node_render_radius};
use jaring::util::{format_amount, short_id};

use super::super::ViewModel;
use super::super::render_utils::{
    HOVER_COLOR, SELECTED_COLOR, blend_color, circle_visible, dim_color, draw_background,
    edge_visible, flow_color, kind_color, priority_color, world_to_screen,
};

fn draw_arrow_head(painter: &Painter, start: Pos2, end: Pos2, target_radius: f32, stroke: Stroke) {
    let direction = end - start;
    let length = direction.length();
    if length <= target_radius + 4.0 {
        return;
    }

    let unit = direction / length;
    let tip = end - unit * target_radius;
    let size = (stroke.width * 2.5).clamp(5.0, 12.0);
    let normal = vec2(-unit.y, unit.x);
    let back = tip - unit * size;
    painter.line_segment([tip, back + normal * size * 0.5], stroke);
    painter.line_segment([tip, back - normal * size * 0.5], stroke);
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let origin = self.engine.canvas().center();

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, origin, &response);
        self.handle_graph_pointer(ui, rect, origin, &response);

        if self.live_physics && self.engine.is_running() {
            self.engine.tick();
        }
        if self.engine.is_running() || response.dragged() {
            ui.ctx().request_repaint();
        }

        if self.node_hints.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No entities in this payload.",
                FontId::proportional(16.0),
                Color32::from_gray(200),
            );
            return;
        }

        let to_screen = |world: Vec2| world_to_screen(rect, self.pan, self.zoom, origin, world);
        let zoom_sqrt = self.zoom.sqrt();
        let hovered = self.interaction.hovered();
        let dimming = self
            .selection
            .selected()
            .is_some_and(|selected| !selected.is_empty());

        for hint in &self.edge_hints {
            let (Some(source), Some(target)) = (
                self.engine.position_of(&hint.source_id),
                self.engine.position_of(&hint.target_id),
            ) else {
                continue;
            };

            let start = to_screen(source);
            let end = to_screen(target);
            if !edge_visible(rect, start, end, 4.0) {
                continue;
            }

            let touches_hover = hovered
                .is_some_and(|id| id == hint.source_id.as_str() || id == hint.target_id.as_str());
            let mut color = flow_color(hint.flow, hint.emphasized);
            let mut width = hint.stroke_weight * zoom_sqrt;
            if touches_hover && hint.flow == EdgeFlow::Neutral {
                color = blend_color(color, HOVER_COLOR, 0.6);
                width = width.max(3.0 * zoom_sqrt);
            }

            let stroke = Stroke::new(width.clamp(0.5, 8.0), color);
            painter.line_segment([start, end], stroke);
            let connections = self.graph.node(hint.target).entity.connection_count;
            let target_radius = node_render_radius(connections) * self.zoom;
            draw_arrow_head(&painter, start, end, target_radius, stroke);
        }

        for hint in &self.node_hints {
            let node = self.graph.node(hint.node);
            let Some(world) = self.engine.position_of(&node.id) else {
                continue;
            };

            let position = to_screen(world);
            let radius = (hint.radius * self.zoom).clamp(3.0, 90.0);
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let is_hovered = hovered == Some(node.id.as_str());
            let highlighted = hint.focused || hint.selected;
            let base = priority_color(hint.priority);
            let fill = if is_hovered {
                blend_color(base, HOVER_COLOR, 0.45)
            } else if dimming && !hint.selected {
                dim_color(base, 0.45)
            } else {
                base
            };

            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(2.0, kind_color(node.entity.kind)),
            );
            if highlighted {
                painter.circle_stroke(position, radius + 5.0, Stroke::new(3.0, SELECTED_COLOR));
            }
            if !self
                .engine
                .arena()
                .node(&node.id)
                .is_some_and(|layout| layout.state.is_free())
            {
                painter.circle_filled(
                    position + vec2(radius * 0.7, -radius * 0.7),
                    4.0,
                    Color32::from_gray(235),
                );
            }

            if highlighted || is_hovered || self.zoom > 0.6 {
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    short_id(&node.entity.holder, 22),
                    FontId::proportional(12.0),
                    Color32::from_gray(232),
                );
            }
        }

        if let Some(id) = hovered
            && let Some(node) = self.graph.node_by_entity(id)
        {
            let entity = &node.entity;
            let panel_text = format!(
                "{}  |  {}  |  {}  |  priority {}  |  {}",
                entity.holder,
                entity.kind,
                short_id(&entity.identifier, 24),
                entity.priority_score,
                format_amount(entity.total_amount)
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        Self::draw_legend(&painter, rect);
    }

    fn draw_legend(painter: &Painter, rect: Rect) {
        let mut cursor = rect.left_bottom() + vec2(14.0, -96.0);
        let font = FontId::proportional(12.0);
        let text_color = Color32::from_gray(220);

        for level in [PriorityLevel::High, PriorityLevel::Medium, PriorityLevel::Low] {
            painter.circle_filled(cursor, 6.0, priority_color(level));
            painter.text(
                cursor + vec2(12.0, 0.0),
                Align2::LEFT_CENTER,
                format!("{} priority", level.label()),
                font.clone(),
                text_color,
            );
            cursor.y += 18.0;
        }

        for (flow, label) in [(EdgeFlow::Outgoing, "Outgoing"), (EdgeFlow::Incoming, "Incoming")] {
            painter.line_segment(
                [cursor - vec2(6.0, 0.0), cursor + vec2(6.0, 0.0)],
                Stroke::new(3.0, flow_color(flow, true)),
            );
            painter.text(
                cursor + vec2(12.0, 0.0),
                Align2::LEFT_CENTER,
                label,
                font.clone(),
                text_color,
            );
            cursor.y += 18.0;
        }
    }
}
