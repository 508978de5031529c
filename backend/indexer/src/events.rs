//! Canonical event types emitted by the crowdfunding contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfunding contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new project was created (`created` topic).
    ProjectCreated,
    /// A contribution was escrowed (`funded` topic).
    ContributionReceived,
    /// An unfunded project passed its deadline (`expired` topic).
    ProjectExpired,
    /// The creator raised a withdrawal request (`req_new` topic).
    WithdrawRequestCreated,
    /// A contributor voted for a withdrawal request (`voted` topic).
    WithdrawVote,
    /// An approved request was paid out (`withdrawn` topic).
    AmountWithdrawn,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::ProjectCreated,
            "funded" => Self::ContributionReceived,
            "expired" => Self::ProjectExpired,
            "req_new" => Self::WithdrawRequestCreated,
            "voted" => Self::WithdrawVote,
            "withdrawn" => Self::AmountWithdrawn,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::ContributionReceived => "contribution_received",
            Self::ProjectExpired => "project_expired",
            Self::WithdrawRequestCreated => "withdraw_request_created",
            Self::WithdrawVote => "withdraw_vote",
            Self::AmountWithdrawn => "amount_withdrawn",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded crowdfunding event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdfundEvent {
    /// RPC-assigned event id, unique per emitted event.
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    /// Withdrawal request index, for request and vote events.
    pub request_id: Option<String>,
    /// Creator, contributor, voter or payout recipient depending on the kind.
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub request_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
