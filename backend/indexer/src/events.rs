//! Canonical event types emitted by the crowdfund escrow contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund_escrow/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the escrow contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new campaign was created (`created` topic).
    ProjectCreated,
    /// A funder deposited into a campaign (`funded` topic).
    ProjectFunded,
    /// A funder withdrew part or all of their stake pre-deadline (`reduced` topic).
    FundingReduced,
    /// The creator withdrew a funded campaign's pool (`claimed` topic).
    FundsClaimed,
    /// A funder reclaimed their stake from a failed campaign (`refunded` topic).
    FundsRefunded,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::ProjectCreated,
            "funded" => Self::ProjectFunded,
            "reduced" => Self::FundingReduced,
            "claimed" => Self::FundsClaimed,
            "refunded" => Self::FundsRefunded,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::ProjectFunded => "project_funded",
            Self::FundingReduced => "funding_reduced",
            Self::FundsClaimed => "funds_claimed",
            Self::FundsRefunded => "funds_refunded",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded escrow event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowEvent {
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    /// The campaign's live total after the operation, when the contract
    /// includes it in the event data.
    pub current_amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// Per-campaign audit summary derived from the indexed events.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectSummary {
    pub project_id: String,
    /// Number of indexed events for this campaign.
    pub event_count: i64,
    /// The live escrow total after the most recent balance-bearing event.
    pub last_current_amount: Option<String>,
    /// Ledger of the most recent indexed event.
    pub last_ledger: Option<i64>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub current_amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
