//! # Crowdfunding Escrow Contract
//!
//! A single Soroban contract, `Crowdfunding`, that acts both as the project
//! registry and as the escrow ledger of every project it creates. Each project
//! raises funds for one round; once the goal is reached the creator may ask to
//! release escrowed funds, and each release needs at least half of all
//! contributors to vote for it.
//!
//! | Phase     | Entry Point(s)                                                      |
//! |-----------|---------------------------------------------------------------------|
//! | Bootstrap | [`Crowdfunding::init`]                                              |
//! | Registry  | [`Crowdfunding::create_project`], `return_all_projects`, `project_count` |
//! | Funding   | [`Crowdfunding::contribute`], [`Crowdfunding::check_deadline`]      |
//! | Requests  | `create_withdraw_request`, `vote_withdraw_request`, `withdraw_requested_amount` |
//! | Queries   | `admin`, `get_project`, `get_contribution`, `get_contract_balance`, `get_request`, `get_requests`, `get_request_count`, `has_voted`, `token` |
//!
//! ## Architecture
//!
//! Project creation lives in [`registry`], the state machine in [`ledger`],
//! storage access in [`storage`] and event payloads in [`events`]. This file
//! contains **only** the public entry points and caller authentication.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

pub mod events;
mod ledger;
mod registry;
mod storage;
mod types;

#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_withdraw;

pub use ledger::quorum_met;
pub use types::{Project, ProjectStatus, WithdrawRequest};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    ProjectNotFound = 3,
    Unauthorized = 4,
    InvalidState = 5,
    InsufficientAmount = 6,
    NotFound = 7,
    AlreadyVoted = 8,
    AlreadyCompleted = 9,
    QuorumNotMet = 10,
    InsufficientEscrowBalance = 11,
    InvalidAmount = 12,
    Overflow = 13,
}

impl Error {
    /// Human-readable reason, suitable for surfacing to users.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::AlreadyInitialized => "contract is already initialized",
            Error::NotInitialized => "contract has not been initialized with a token",
            Error::ProjectNotFound => "no project exists with this handle",
            Error::Unauthorized => "caller is not allowed to perform this operation",
            Error::InvalidState => "operation is not valid in the project's current state",
            Error::InsufficientAmount => "contribution is below the project's minimum",
            Error::NotFound => "no withdrawal request exists at this index",
            Error::AlreadyVoted => "caller has already voted for this request",
            Error::AlreadyCompleted => "withdrawal request has already been completed",
            Error::QuorumNotMet => "at least 50% of contributors must vote for this request",
            Error::InsufficientEscrowBalance => "requested amount exceeds the escrowed balance",
            Error::InvalidAmount => "amount must be positive",
            Error::Overflow => "arithmetic overflow",
        }
    }
}

#[contract]
pub struct Crowdfunding;

#[contractimpl]
impl Crowdfunding {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Bind the contract to the token used for contributions and payouts.
    ///
    /// `admin` must sign. Must be called exactly once after deployment; later
    /// calls fail with `Error::AlreadyInitialized`.
    pub fn init(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        admin.require_auth();
        registry::init(&env, &admin, &token)
    }

    /// The address that initialised the contract.
    pub fn admin(env: Env) -> Result<Address, Error> {
        storage::get_admin(&env)
    }

    /// The token contract holding escrowed funds.
    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────

    /// Create a new fundraising project and return its handle.
    ///
    /// `creator` must sign and becomes the only address allowed to raise and
    /// execute withdrawal requests.
    pub fn create_project(
        env: Env,
        creator: Address,
        min_contribution: i128,
        deadline: u64,
        goal: i128,
        title: String,
        description: String,
    ) -> Result<u64, Error> {
        creator.require_auth();
        registry::create_project(
            &env,
            creator,
            min_contribution,
            deadline,
            goal,
            title,
            description,
        )
    }

    /// Every project handle, in creation order.
    pub fn return_all_projects(env: Env) -> Vec<u64> {
        registry::all_projects(&env)
    }

    pub fn project_count(env: Env) -> u64 {
        storage::project_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` of the bound token to a project.
    ///
    /// Reaching the goal moves the project to `Successful`.
    pub fn contribute(
        env: Env,
        project_id: u64,
        contributor: Address,
        amount: i128,
    ) -> Result<(), Error> {
        contributor.require_auth();
        ledger::contribute(&env, project_id, contributor, amount)
    }

    /// Expire an `Ongoing` project whose deadline has passed without reaching
    /// its goal. Anyone may call this; it returns the resulting status.
    pub fn check_deadline(env: Env, project_id: u64) -> Result<ProjectStatus, Error> {
        ledger::check_deadline(&env, project_id)
    }

    // ─────────────────────────────────────────────────────────
    // Withdrawal requests
    // ─────────────────────────────────────────────────────────

    /// Raise a request to pay `amount` to `recipient`. Creator only, and only
    /// once the project is `Successful`. Returns the request index.
    pub fn create_withdraw_request(
        env: Env,
        project_id: u64,
        caller: Address,
        description: String,
        amount: i128,
        recipient: Address,
    ) -> Result<u32, Error> {
        caller.require_auth();
        ledger::create_withdraw_request(&env, project_id, &caller, description, amount, recipient)
    }

    /// Vote for a withdrawal request. Only contributors may vote, once each.
    /// Returns the new vote count.
    pub fn vote_withdraw_request(
        env: Env,
        project_id: u64,
        voter: Address,
        request_id: u32,
    ) -> Result<u32, Error> {
        voter.require_auth();
        ledger::vote_withdraw_request(&env, project_id, voter, request_id)
    }

    /// Execute a withdrawal request that reached quorum. Creator only.
    pub fn withdraw_requested_amount(
        env: Env,
        project_id: u64,
        caller: Address,
        request_id: u32,
    ) -> Result<(), Error> {
        caller.require_auth();
        ledger::withdraw_requested_amount(&env, project_id, &caller, request_id)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        storage::load_project(&env, project_id)
    }

    /// Cumulative amount `contributor` has put into the project (0 if none).
    pub fn get_contribution(env: Env, project_id: u64, contributor: Address) -> Result<i128, Error> {
        storage::load_project_config(&env, project_id)?;
        Ok(storage::get_contribution(&env, project_id, &contributor).unwrap_or(0))
    }

    /// Funds currently held in escrow for the project.
    pub fn get_contract_balance(env: Env, project_id: u64) -> Result<i128, Error> {
        Ok(storage::load_project_state(&env, project_id)?.balance)
    }

    pub fn get_request_count(env: Env, project_id: u64) -> Result<u32, Error> {
        Ok(storage::load_project_state(&env, project_id)?.request_count)
    }

    pub fn get_request(env: Env, project_id: u64, request_id: u32) -> Result<WithdrawRequest, Error> {
        storage::load_project_state(&env, project_id)?;
        storage::load_request(&env, project_id, request_id)
    }

    /// All withdrawal requests of the project, ordered by index.
    pub fn get_requests(env: Env, project_id: u64) -> Result<Vec<WithdrawRequest>, Error> {
        let state = storage::load_project_state(&env, project_id)?;
        let mut requests = Vec::new(&env);
        for request_id in 0..state.request_count {
            requests.push_back(storage::load_request(&env, project_id, request_id)?);
        }
        Ok(requests)
    }

    pub fn has_voted(env: Env, project_id: u64, request_id: u32, voter: Address) -> Result<bool, Error> {
        storage::load_project_state(&env, project_id)?;
        storage::load_request(&env, project_id, request_id)?;
        Ok(storage::has_vote(&env, project_id, request_id, &voter))
    }
}
