use std::collections::BTreeSet;

use crate::graph::Graph;

mod filter;
mod hints;

pub use filter::{VisibleGraph, filter};
pub use hints::{EdgeFlow, EdgeHint, NodeHint, edge_hints, node_hints, node_render_radius};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    Default,
    Multi,
}

impl SelectionMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Inspect",
            Self::Multi => "Batch select",
        }
    }
}

/// Which entities the analyst is looking at. Each mode carries only its own
/// state, so a focus can never coexist with a batch selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Default { focus: Option<String> },
    Multi { selected: BTreeSet<String> },
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::empty(SelectionMode::Default)
    }
}

impl SelectionState {
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Default => Self::Default { focus: None },
            SelectionMode::Multi => Self::Multi {
                selected: BTreeSet::new(),
            },
        }
    }

    pub fn focused(id: impl Into<String>) -> Self {
        Self::Default {
            focus: Some(id.into()),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Default { .. } => SelectionMode::Default,
            Self::Multi { .. } => SelectionMode::Multi,
        }
    }

    pub fn focus(&self) -> Option<&str> {
        match self {
            Self::Default { focus } => focus.as_deref(),
            Self::Multi { .. } => None,
        }
    }

    pub fn selected(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Default { .. } => None,
            Self::Multi { selected } => Some(selected),
        }
    }

    pub fn is_selected(&self, entity_id: &str) -> bool {
        match self {
            Self::Default { focus } => focus.as_deref() == Some(entity_id),
            Self::Multi { selected } => selected.contains(entity_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Default { focus } => focus.is_none(),
            Self::Multi { selected } => selected.is_empty(),
        }
    }

    /// Drops references to entities that are no longer part of `graph`, e.g.
    /// after a reload. Returns how many ids were removed.
    pub fn retain_known(&mut self, graph: &Graph) -> usize {
        match self {
            Self::Default { focus } => {
                if focus.as_deref().is_some_and(|id| !graph.contains(id)) {
                    *focus = None;
                    1
                } else {
                    0
                }
            }
            Self::Multi { selected } => {
                let before = selected.len();
                selected.retain(|id| graph.contains(id));
                before - selected.len()
            }
        }
    }
}
