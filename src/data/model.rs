use std::fmt;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    BankAccount,
    EWallet,
    CryptoWallet,
    PhoneNumber,
    Qris,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::BankAccount => "bank account",
            Self::EWallet => "e-wallet",
            Self::CryptoWallet => "crypto wallet",
            Self::PhoneNumber => "phone number",
            Self::Qris => "QRIS",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::High,
            60..=79 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High Priority",
            Self::Medium => "Medium Priority",
            Self::Low => "Low Priority",
        }
    }
}

/// A single account, wallet, phone number or merchant code under investigation.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: String,
    pub identifier: String,
    pub kind: EntityKind,
    pub holder: String,
    pub priority_score: u8,
    pub connection_count: u32,
    pub transaction_count: u32,
    pub total_amount: f64,
    /// Provider detail: bank name, wallet brand, carrier or coin.
    pub specific_info: Option<String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, kind: EntityKind, holder: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            identifier: id.clone(),
            id,
            kind,
            holder: holder.into(),
            priority_score: 0,
            connection_count: 0,
            transaction_count: 0,
            total_amount: 0.0,
            specific_info: None,
        }
    }

    pub fn with_priority(mut self, score: u8) -> Self {
        self.priority_score = score.min(100);
        self
    }

    pub fn with_connections(mut self, connections: u32) -> Self {
        self.connection_count = connections;
        self
    }

    pub fn with_specific_info(mut self, info: impl Into<String>) -> Self {
        self.specific_info = Some(info.into());
        self
    }

    pub fn priority(&self) -> PriorityLevel {
        PriorityLevel::from_score(self.priority_score)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cluster {
    pub label: String,
    pub entities: Vec<Entity>,
}

impl Cluster {
    pub fn new(label: impl Into<String>, entities: Vec<Entity>) -> Self {
        Self {
            label: label.into(),
            entities,
        }
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|entity| entity.id.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub from_id: String,
    pub to_id: String,
    pub amount: f64,
    pub timestamp: String,
    pub reference: Option<String>,
}

impl Transaction {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>, amount: f64) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            amount,
            timestamp: String::new(),
            reference: None,
        }
    }
}

/// Everything one fetch cycle delivers: site clusters, unclustered entities and
/// the transactions between them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphPayload {
    pub clusters: Vec<Cluster>,
    pub standalone: Vec<Entity>,
    pub transactions: Vec<Transaction>,
}

impl GraphPayload {
    pub fn entity_count(&self) -> usize {
        self.clusters
            .iter()
            .map(|cluster| cluster.entities.len())
            .sum::<usize>()
            + self.standalone.len()
    }
}
