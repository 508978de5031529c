//! # Events
//!
//! Every state-changing entry point publishes exactly one event. Topics are
//! `(symbol, project_id)` so indexers can filter per project; payloads are the
//! `#[contracttype]` structs below.
//!
//! | Topic       | Payload                    |
//! |-------------|----------------------------|
//! | `created`   | [`ProjectCreated`]         |
//! | `funded`    | [`ContributionReceived`]   |
//! | `expired`   | [`ProjectExpired`]         |
//! | `req_new`   | [`WithdrawRequestCreated`] |
//! | `voted`     | [`WithdrawVote`]           |
//! | `withdrawn` | [`AmountWithdrawn`]        |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::{Project, ProjectStatus, WithdrawRequest};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub creator: Address,
    pub min_contribution: i128,
    pub deadline: u64,
    pub goal: i128,
    pub current_amount: i128,
    pub contributor_count: u32,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionReceived {
    pub project_id: u64,
    pub contributor: Address,
    pub amount: i128,
    /// Running total after this contribution.
    pub current_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectExpired {
    pub project_id: u64,
    pub complete_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawRequestCreated {
    pub project_id: u64,
    pub request_id: u32,
    pub description: String,
    pub amount: i128,
    pub vote_count: u32,
    pub completed: bool,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawVote {
    pub project_id: u64,
    pub request_id: u32,
    pub voter: Address,
    pub vote_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AmountWithdrawn {
    pub project_id: u64,
    pub request_id: u32,
    pub description: String,
    pub amount: i128,
    pub vote_count: u32,
    pub completed: bool,
    pub recipient: Address,
}

pub fn emit_project_created(env: &Env, project: &Project) {
    let payload = ProjectCreated {
        project_id: project.id,
        creator: project.creator.clone(),
        min_contribution: project.min_contribution,
        deadline: project.deadline,
        goal: project.goal,
        current_amount: project.current_amount,
        contributor_count: project.contributor_count,
        title: project.title.clone(),
        description: project.description.clone(),
        status: project.status,
    };
    env.events()
        .publish((symbol_short!("created"), project.id), payload);
}

pub fn emit_contribution_received(
    env: &Env,
    project_id: u64,
    contributor: Address,
    amount: i128,
    current_amount: i128,
) {
    let payload = ContributionReceived {
        project_id,
        contributor,
        amount,
        current_amount,
    };
    env.events()
        .publish((symbol_short!("funded"), project_id), payload);
}

pub fn emit_project_expired(env: &Env, project_id: u64, complete_at: u64) {
    let payload = ProjectExpired {
        project_id,
        complete_at,
    };
    env.events()
        .publish((symbol_short!("expired"), project_id), payload);
}

pub fn emit_withdraw_request_created(
    env: &Env,
    project_id: u64,
    request_id: u32,
    request: &WithdrawRequest,
) {
    let payload = WithdrawRequestCreated {
        project_id,
        request_id,
        description: request.description.clone(),
        amount: request.amount,
        vote_count: request.vote_count,
        completed: request.completed,
        recipient: request.recipient.clone(),
    };
    env.events()
        .publish((symbol_short!("req_new"), project_id), payload);
}

pub fn emit_withdraw_vote(
    env: &Env,
    project_id: u64,
    request_id: u32,
    voter: Address,
    vote_count: u32,
) {
    let payload = WithdrawVote {
        project_id,
        request_id,
        voter,
        vote_count,
    };
    env.events()
        .publish((symbol_short!("voted"), project_id), payload);
}

pub fn emit_amount_withdrawn(
    env: &Env,
    project_id: u64,
    request_id: u32,
    request: &WithdrawRequest,
) {
    let payload = AmountWithdrawn {
        project_id,
        request_id,
        description: request.description.clone(),
        amount: request.amount,
        vote_count: request.vote_count,
        completed: request.completed,
        recipient: request.recipient.clone(),
    };
    env.events()
        .publish((symbol_short!("withdrawn"), project_id), payload);
}
