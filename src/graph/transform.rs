use crate::data::{Cluster, Entity, GraphPayload, Transaction};

use super::{ClusterLabel, Edge, EdgeKind, Graph};

pub const TRANSFER_STRENGTH: f32 = 0.8;

/// Records dropped while normalizing one payload. Never fatal; the host decides
/// whether to surface them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformDiagnostics {
    pub duplicate_entities: usize,
    pub dangling_transactions: usize,
}

impl TransformDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.duplicate_entities == 0 && self.dangling_transactions == 0
    }
}

#[derive(Clone, Debug)]
pub struct Transformed {
    pub graph: Graph,
    pub diagnostics: TransformDiagnostics,
}

pub fn transform(
    clusters: &[Cluster],
    standalone: &[Entity],
    transactions: &[Transaction],
) -> Transformed {
    let mut graph = Graph::default();
    let mut diagnostics = TransformDiagnostics::default();

    let clustered = clusters.iter().flat_map(|cluster| {
        let label = ClusterLabel::Site(cluster.label.clone());
        cluster
            .entities
            .iter()
            .map(move |entity| (entity, label.clone()))
    });
    let unclustered = standalone
        .iter()
        .map(|entity| (entity, ClusterLabel::Standalone));

    for (entity, label) in clustered.chain(unclustered) {
        if graph.push_node(entity, label).is_none() {
            diagnostics.duplicate_entities += 1;
        }
    }

    for transaction in transactions {
        let (Some(source), Some(target)) = (
            graph.node_id(&transaction.from_id),
            graph.node_id(&transaction.to_id),
        ) else {
            diagnostics.dangling_transactions += 1;
            continue;
        };

        graph.push_edge(Edge {
            source,
            target,
            strength: TRANSFER_STRENGTH,
            kind: EdgeKind::Transfer,
            transaction: transaction.clone(),
        });
    }

    Transformed { graph, diagnostics }
}

impl GraphPayload {
    pub fn transform(&self) -> Transformed {
        transform(&self.clusters, &self.standalone, &self.transactions)
    }
}
