use eframe::egui::Vec2;
use tracing::trace;

use crate::physics::LayoutEngine;
use crate::selection::{SelectionMode, SelectionState};

/// Click on an entity. Batch mode toggles membership; inspect mode focuses the
/// entity, or clears the focus when it is already focused.
pub fn on_node_click(id: &str, selection: &SelectionState) -> SelectionState {
    match selection {
        SelectionState::Default { focus } => {
            if focus.as_deref() == Some(id) {
                SelectionState::Default { focus: None }
            } else {
                SelectionState::focused(id)
            }
        }
        SelectionState::Multi { selected } => {
            let mut selected = selected.clone();
            if !selected.remove(id) {
                selected.insert(id.to_owned());
            }
            SelectionState::Multi { selected }
        }
    }
}

/// Switching modes drops whatever the previous mode was holding.
pub fn on_mode_change(mode: SelectionMode, selection: &SelectionState) -> SelectionState {
    if selection.mode() == mode {
        selection.clone()
    } else {
        SelectionState::empty(mode)
    }
}

/// Entity under `point`, preferring the closest center within `radius`.
pub fn hit_test(engine: &LayoutEngine, point: Vec2, radius: f32) -> Option<&str> {
    let radius_sq = radius * radius;
    engine
        .nodes()
        .iter()
        .filter_map(|node| {
            let distance_sq = (node.position - point).length_sq();
            (distance_sq <= radius_sq).then_some((node.id.as_str(), distance_sq))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
    pub id: String,
    /// Node position minus pointer position at grab time.
    pub grab_offset: Vec2,
}

/// Transient pointer state. Nothing here feeds back into `SelectionState`.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    hovered: Option<String>,
    drag: Option<DragState>,
}

impl InteractionController {
    /// Returns `true` when the hovered entity changed.
    pub fn on_hover(&mut self, id: Option<&str>) -> bool {
        if self.hovered.as_deref() == id {
            return false;
        }

        self.hovered = id.map(str::to_owned);
        true
    }

    pub fn on_drag_start(&mut self, engine: &mut LayoutEngine, id: &str, pointer: Vec2) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(position) = engine.position_of(id) else {
            return false;
        };
        if !engine.begin_drag(id, position) {
            return false;
        }

        trace!(id, "drag started");
        self.drag = Some(DragState {
            id: id.to_owned(),
            grab_offset: position - pointer,
        });
        true
    }

    pub fn on_drag_move(&mut self, engine: &mut LayoutEngine, pointer: Vec2) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };

        engine.drag_to(&drag.id, pointer + drag.grab_offset)
    }

    /// Releases the dragged node back to the simulation and returns its id.
    pub fn on_drag_end(&mut self, engine: &mut LayoutEngine) -> Option<String> {
        let drag = self.drag.take()?;
        engine.end_drag(&drag.id);
        trace!(id = %drag.id, "drag ended");
        Some(drag.id)
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn dragging(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn reset(&mut self) {
        self.hovered = None;
        self.drag = None;
    }
}
