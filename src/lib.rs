pub mod data;
pub mod graph;
pub mod interaction;
pub mod physics;
pub mod selection;
pub mod util;

pub use data::{GraphPayload, load_payload, parse_payload};
pub use graph::{Graph, TransformDiagnostics, transform};
pub use interaction::{InteractionController, hit_test, on_mode_change, on_node_click};
pub use physics::{Canvas, LayoutEngine, LayoutParams, NodePosition, StepReport};
pub use selection::{SelectionMode, SelectionState, VisibleGraph, filter};
