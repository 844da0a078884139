mod common;

use std::collections::HashSet;

use jaring::graph::ClusterLabel;
use jaring::parse_payload;
use proptest::prelude::*;

use common::{arb_payload, sample_payload};

#[test]
fn sample_payload_keeps_every_record() {
    let transformed = sample_payload().transform();
    let graph = &transformed.graph;

    assert!(transformed.diagnostics.is_clean());
    assert_eq!(graph.node_count(), 7);
    assert_eq!(graph.edge_count(), 6);
    assert_eq!(
        graph.cluster_labels(),
        [
            &ClusterLabel::Site("slot-gacor.example".to_owned()),
            &ClusterLabel::Site("togel-88.example".to_owned()),
            &ClusterLabel::Standalone,
        ]
    );
}

#[test]
fn parsed_backend_payload_matches_hand_built_graph() {
    let raw = r#"{
        "clusters": [{
            "website_url": "https://slot-gacor.example",
            "website_name": "slot-gacor.example",
            "entities": [
                {"id": "bca-1", "identifier": "0123456789", "entity_type": "bank_account",
                 "account_holder": "Holder bca-1", "priority_score": 92.4, "connections": 3,
                 "transactions": 3, "total_amount": 11200000, "bank_name": "BCA"},
                {"id": "dana-1", "identifier": "0812000111", "entity_type": "e_wallet",
                 "account_holder": "Holder dana-1", "priority_score": 65, "wallet_type": "DANA"}
            ]
        }],
        "standalone_entities": [
            {"id": "usdt-9", "identifier": "TQ9...", "entity_type": "crypto_wallet",
             "account_holder": "Holder usdt-9", "cryptocurrency": "USDT"}
        ],
        "transactions": [
            {"from_node": "bca-1", "to_node": "dana-1", "amount": 1500000, "timestamp": "2024-03-01T10:00:00Z"},
            {"from_node": "dana-1", "to_node": "ghost", "amount": 10}
        ]
    }"#;

    let payload = parse_payload(raw).expect("payload parses");
    let transformed = payload.transform();
    let graph = &transformed.graph;

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(transformed.diagnostics.dangling_transactions, 1);

    let bank = graph.node_by_entity("bca-1").expect("bank node");
    assert_eq!(bank.entity.priority_score, 92);
    assert_eq!(bank.entity.specific_info.as_deref(), Some("BCA"));
    assert_eq!(bank.cluster, ClusterLabel::Site("slot-gacor.example".to_owned()));

    let wallet = graph.node_by_entity("usdt-9").expect("crypto node");
    assert!(wallet.cluster.is_standalone());
}

proptest! {
    #[test]
    fn every_edge_references_existing_nodes(payload in arb_payload()) {
        let transformed = payload.transform();
        let graph = &transformed.graph;

        for edge in graph.edges() {
            prop_assert!(edge.source.0 < graph.node_count());
            prop_assert!(edge.target.0 < graph.node_count());
            prop_assert!(graph.contains(&edge.transaction.from_id));
            prop_assert!(graph.contains(&edge.transaction.to_id));
        }
    }

    #[test]
    fn node_ids_are_unique_and_counts_add_up(payload in arb_payload()) {
        let transformed = payload.transform();
        let graph = &transformed.graph;

        let ids = graph.nodes().iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
        prop_assert_eq!(ids.len(), graph.node_count());
        prop_assert_eq!(
            graph.node_count() + transformed.diagnostics.duplicate_entities,
            payload.entity_count()
        );
        prop_assert_eq!(
            graph.edge_count() + transformed.diagnostics.dangling_transactions,
            payload.transactions.len()
        );
    }

    #[test]
    fn first_occurrence_decides_cluster(payload in arb_payload()) {
        let transformed = payload.transform();
        let graph = &transformed.graph;

        let first_seen = payload
            .clusters
            .iter()
            .flat_map(|cluster| {
                cluster
                    .entities
                    .iter()
                    .map(move |entity| (entity.id.as_str(), ClusterLabel::Site(cluster.label.clone())))
            })
            .chain(payload.standalone.iter().map(|entity| (entity.id.as_str(), ClusterLabel::Standalone)));

        let mut checked = HashSet::new();
        for (id, label) in first_seen {
            if checked.insert(id) {
                let node = graph.node_by_entity(id).expect("entity kept");
                prop_assert_eq!(&node.cluster, &label);
            }
        }
    }
}
