use eframe::egui::{self, PointerButton, Rect, Ui, Vec2};

use jaring::interaction::{hit_test, on_node_click};

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;

/// World-space pick radius; covers the largest rendered node.
const PICK_RADIUS: f32 = 45.0;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        origin: Vec2,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, origin, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.1, 5.0);
        self.pan = pointer - rect.center() - ((world_before - origin) * self.zoom);
    }

    /// Hover, drag-to-pin and click-to-select on the layout canvas. Dragging
    /// empty space pans instead.
    pub(in crate::app) fn handle_graph_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        origin: Vec2,
        response: &egui::Response,
    ) {
        let pointer_world = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .map(|pointer| screen_to_world(rect, self.pan, self.zoom, origin, pointer));

        let hovered = pointer_world
            .and_then(|point| hit_test(&self.engine, point, PICK_RADIUS))
            .map(str::to_owned);
        self.interaction.on_hover(hovered.as_deref());

        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        if response.drag_started_by(PointerButton::Primary)
            && let (Some(id), Some(point)) = (hovered.as_deref(), pointer_world)
        {
            self.interaction.on_drag_start(&mut self.engine, id, point);
        }

        if response.dragged_by(PointerButton::Primary) {
            match (self.interaction.dragging().is_some(), pointer_world) {
                (true, Some(point)) => {
                    self.interaction.on_drag_move(&mut self.engine, point);
                }
                (false, _) => self.pan += response.drag_delta(),
                _ => {}
            }
        }

        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }

        if response.drag_stopped() {
            self.interaction.on_drag_end(&mut self.engine);
        }

        if response.clicked_by(PointerButton::Primary)
            && let Some(id) = hovered
        {
            let next = on_node_click(&id, &self.selection);
            self.set_selection(next);
        }
    }
}
