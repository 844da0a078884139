#![allow(dead_code)]

use jaring::data::{Cluster, Entity, EntityKind, GraphPayload, Transaction};
use proptest::prelude::*;

pub fn entity(id: &str, kind: EntityKind) -> Entity {
    Entity::new(id, kind, format!("Holder {id}"))
}

/// Two gambling sites, one standalone mule and a handful of transfers between
/// them. Small enough to reason about by hand.
pub fn sample_payload() -> GraphPayload {
    GraphPayload {
        clusters: vec![
            Cluster::new(
                "slot-gacor.example",
                vec![
                    entity("bca-1", EntityKind::BankAccount)
                        .with_priority(92)
                        .with_specific_info("BCA"),
                    entity("dana-1", EntityKind::EWallet).with_priority(65),
                    entity("qris-1", EntityKind::Qris),
                ],
            ),
            Cluster::new(
                "togel-88.example",
                vec![
                    entity("bri-2", EntityKind::BankAccount),
                    entity("ovo-2", EntityKind::EWallet).with_priority(81),
                ],
            ),
        ],
        standalone: vec![
            entity("usdt-9", EntityKind::CryptoWallet),
            entity("phone-7", EntityKind::PhoneNumber),
        ],
        transactions: vec![
            Transaction::new("bca-1", "dana-1", 1_500_000.0),
            Transaction::new("dana-1", "qris-1", 250_000.0),
            Transaction::new("bca-1", "bri-2", 9_000_000.0),
            Transaction::new("ovo-2", "bri-2", 400_000.0),
            Transaction::new("bri-2", "usdt-9", 12_000_000.0),
            Transaction::new("bca-1", "dana-1", 700_000.0),
        ],
    }
}

fn kind() -> impl Strategy<Value = EntityKind> + Clone {
    prop_oneof![
        Just(EntityKind::BankAccount),
        Just(EntityKind::EWallet),
        Just(EntityKind::CryptoWallet),
        Just(EntityKind::PhoneNumber),
        Just(EntityKind::Qris),
    ]
}

/// Payloads drawn from a small id space so duplicates, dangling endpoints and
/// self-transfers all show up regularly.
pub fn arb_payload() -> impl Strategy<Value = GraphPayload> {
    let id = (0u8..24).prop_map(|n| format!("e{n}"));
    let arb_entity = (id.clone(), kind()).prop_map(|(id, kind)| entity(&id, kind));
    let cluster = ("[a-d]", prop::collection::vec(arb_entity.clone(), 0..6))
        .prop_map(|(site, entities)| Cluster::new(format!("{site}.example"), entities));
    let transaction = (id.clone(), id, 1.0f64..1e7)
        .prop_map(|(from, to, amount)| Transaction::new(from, to, amount));

    (
        prop::collection::vec(cluster, 0..4),
        prop::collection::vec(arb_entity, 0..8),
        prop::collection::vec(transaction, 0..40),
    )
        .prop_map(|(clusters, standalone, transactions)| GraphPayload {
            clusters,
            standalone,
            transactions,
        })
}
