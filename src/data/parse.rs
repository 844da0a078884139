use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::model::{Cluster, Entity, EntityKind, GraphPayload, Transaction};

#[derive(Clone, Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    clusters: Vec<RawCluster>,
    #[serde(default)]
    standalone_entities: Vec<RawEntity>,
    #[serde(default)]
    transactions: Vec<RawTransaction>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawCluster {
    #[serde(default)]
    website_url: String,
    #[serde(default)]
    website_name: String,
    #[serde(default)]
    entities: Vec<RawEntity>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawEntity {
    id: String,
    #[serde(default)]
    identifier: String,
    entity_type: EntityKind,
    #[serde(default)]
    account_holder: String,
    #[serde(default)]
    priority_score: f64,
    #[serde(default)]
    connections: u32,
    #[serde(default)]
    transactions: u32,
    #[serde(default)]
    total_amount: f64,
    #[serde(default)]
    bank_name: Option<String>,
    #[serde(default)]
    cryptocurrency: Option<String>,
    #[serde(default)]
    wallet_type: Option<String>,
    #[serde(default)]
    phone_provider: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawTransaction {
    from_node: String,
    to_node: String,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    reference: Option<String>,
}

impl RawEntity {
    fn into_entity(self) -> Entity {
        let specific_info = match self.entity_type {
            EntityKind::BankAccount => self.bank_name,
            EntityKind::EWallet => self.wallet_type,
            EntityKind::PhoneNumber => self.phone_provider,
            EntityKind::CryptoWallet => self.cryptocurrency,
            EntityKind::Qris => Some("QRIS".to_owned()),
        }
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "Unknown".to_owned());

        let identifier = if self.identifier.is_empty() {
            self.id.clone()
        } else {
            self.identifier
        };

        Entity {
            id: self.id,
            identifier,
            kind: self.entity_type,
            holder: self.account_holder,
            priority_score: self.priority_score.round().clamp(0.0, 100.0) as u8,
            connection_count: self.connections,
            transaction_count: self.transactions,
            total_amount: self.total_amount,
            specific_info: Some(specific_info),
        }
    }
}

fn cluster_label(raw: &RawCluster, index: usize) -> String {
    let name = raw.website_name.trim();
    if !name.is_empty() {
        return name.to_owned();
    }

    let url = raw.website_url.trim();
    if !url.is_empty() {
        return url.to_owned();
    }

    format!("site #{}", index + 1)
}

pub fn parse_payload(raw: &str) -> Result<GraphPayload> {
    let parsed: RawPayload =
        serde_json::from_str(raw).context("invalid graph payload JSON")?;

    let clusters = parsed
        .clusters
        .into_iter()
        .enumerate()
        .map(|(index, raw_cluster)| {
            let label = cluster_label(&raw_cluster, index);
            Cluster {
                label,
                entities: raw_cluster
                    .entities
                    .into_iter()
                    .map(RawEntity::into_entity)
                    .collect(),
            }
        })
        .collect();

    let standalone = parsed
        .standalone_entities
        .into_iter()
        .map(RawEntity::into_entity)
        .collect();

    let transactions = parsed
        .transactions
        .into_iter()
        .map(|raw| Transaction {
            from_id: raw.from_node,
            to_id: raw.to_node,
            amount: raw.amount,
            timestamp: raw.timestamp,
            reference: raw.reference.filter(|value| !value.is_empty()),
        })
        .collect();

    Ok(GraphPayload {
        clusters,
        standalone,
        transactions,
    })
}

pub fn load_payload(path: &Path) -> Result<GraphPayload> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph payload from {}", path.display()))?;
    parse_payload(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
