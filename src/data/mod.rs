mod model;
mod parse;

pub use model::{Cluster, Entity, EntityKind, GraphPayload, PriorityLevel, Transaction};
pub use parse::{load_payload, parse_payload};
