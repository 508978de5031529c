//! # Types
//!
//! Shared data structures used across all modules of the crowdfunding contract.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A project is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`]: written once at creation; never mutated.
//! - [`ProjectState`]: written on every contribution, deadline check and
//!   withdrawal.
//!
//! The public API exposes the reconstructed [`Project`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`ProjectStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Ongoing ──► Successful
//!     └─────► Failed
//! ```
//!
//! Both `Successful` and `Failed` are terminal. The discriminants are part of
//! the public encoding and must not be reordered.

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle status of a project.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ProjectStatus {
    /// Accepting contributions.
    Ongoing = 0,
    /// Deadline passed before the goal was reached.
    Failed = 1,
    /// Goal reached; withdrawal requests may be raised.
    Successful = 2,
}

/// Immutable project configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub creator: Address,
    pub min_contribution: i128,
    pub deadline: u64,
    pub goal: i128,
    pub title: String,
    pub description: String,
}

/// Mutable project state, updated on contributions, deadline checks and
/// withdrawals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    /// Lifetime total of accepted contributions.
    pub current_amount: i128,
    /// Funds still held in escrow for this project.
    pub balance: i128,
    pub contributor_count: u32,
    pub status: ProjectStatus,
    pub complete_at: Option<u64>,
    pub request_count: u32,
}

impl ProjectState {
    pub fn initial() -> Self {
        Self {
            current_amount: 0,
            balance: 0,
            contributor_count: 0,
            status: ProjectStatus::Ongoing,
            complete_at: None,
            request_count: 0,
        }
    }
}

/// Full on-chain representation of a crowdfunding project.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Handle assigned by the registry (auto-incremented).
    pub id: u64,
    /// Address allowed to raise and execute withdrawal requests.
    pub creator: Address,
    /// Smallest amount accepted by a single contribution.
    pub min_contribution: i128,
    /// Ledger timestamp after which an unfunded project stops accepting funds.
    pub deadline: u64,
    /// Target funding amount.
    pub goal: i128,
    /// Lifetime total contributed.
    pub current_amount: i128,
    /// Amount still held in escrow.
    pub balance: i128,
    pub title: String,
    pub description: String,
    /// Number of distinct contributing addresses.
    pub contributor_count: u32,
    /// Current lifecycle status.
    pub status: ProjectStatus,
    /// Ledger timestamp at which the project left `Ongoing`.
    pub complete_at: Option<u64>,
    /// Number of withdrawal requests raised so far.
    pub request_count: u32,
}

impl Project {
    pub fn from_parts(config: ProjectConfig, state: ProjectState) -> Self {
        Project {
            id: config.id,
            creator: config.creator,
            min_contribution: config.min_contribution,
            deadline: config.deadline,
            goal: config.goal,
            current_amount: state.current_amount,
            balance: state.balance,
            title: config.title,
            description: config.description,
            contributor_count: state.contributor_count,
            status: state.status,
            complete_at: state.complete_at,
            request_count: state.request_count,
        }
    }
}

/// A creator's request to release escrowed funds, approved by contributor vote.
///
/// Individual votes are stored as separate markers; `vote_count` mirrors the
/// size of that set.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawRequest {
    pub description: String,
    pub amount: i128,
    pub recipient: Address,
    pub vote_count: u32,
    pub completed: bool,
}
