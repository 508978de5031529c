//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the
//! crowdfunding contract:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type      | Description                          |
//! |----------------|-----------|--------------------------------------|
//! | `Admin`        | `Address` | Address that initialised the contract |
//! | `Token`        | `Address` | Token contract holding escrowed funds |
//! | `ProjectCount` | `u64`     | Auto-increment project handle counter |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                          | Type              | Description                   |
//! |------------------------------|-------------------|-------------------------------|
//! | `ProjConfig(id)`             | `ProjectConfig`   | Immutable project config      |
//! | `ProjState(id)`              | `ProjectState`    | Mutable project state         |
//! | `Contribution(id, addr)`     | `i128`            | Cumulative amount per address |
//! | `Request(id, idx)`           | `WithdrawRequest` | Withdrawal request            |
//! | `Vote(id, idx, addr)`        | `bool`            | Vote marker                   |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Project, ProjectConfig, ProjectState, WithdrawRequest};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Address that initialised the contract (Instance).
    Admin,
    /// Token used for contributions and payouts (Instance).
    Token,
    /// Global auto-increment counter for project handles (Instance).
    ProjectCount,
    /// Immutable project configuration keyed by handle (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by handle (Persistent).
    ProjState(u64),
    /// Cumulative contribution of an address to a project (Persistent).
    Contribution(u64, Address),
    /// Withdrawal request keyed by project handle and index (Persistent).
    Request(u64, u32),
    /// Presence marks that an address voted for a request (Persistent).
    Vote(u64, u32, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn has_token(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Token)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

/// Number of projects created so far; also the next handle to assign.
pub fn project_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

/// Atomically reads, increments, and stores the project counter.
/// Returns the handle to use for the *current* project (pre-increment value).
pub fn get_and_increment_project_id(env: &Env) -> u64 {
    bump_instance(env);
    let current = project_count(env);
    env.storage()
        .instance()
        .set(&DataKey::ProjectCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save the immutable config and the initial mutable state of a new project.
pub fn save_project(env: &Env, config: &ProjectConfig, state: &ProjectState) {
    let config_key = DataKey::ProjConfig(config.id);
    env.storage().persistent().set(&config_key, config);
    bump_persistent(env, &config_key);
    save_project_state(env, config.id, state);
}

/// Load the full `Project` by combining config and state.
pub fn load_project(env: &Env, id: u64) -> Result<Project, Error> {
    let (config, state) = load_project_pair(env, id)?;
    Ok(Project::from_parts(config, state))
}

pub fn load_project_pair(env: &Env, id: u64) -> Result<(ProjectConfig, ProjectState), Error> {
    Ok((load_project_config(env, id)?, load_project_state(env, id)?))
}

/// Load only the immutable project configuration.
pub fn load_project_config(env: &Env, id: u64) -> Result<ProjectConfig, Error> {
    let key = DataKey::ProjConfig(id);
    let config: ProjectConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

/// Load only the mutable project state.
pub fn load_project_state(env: &Env, id: u64) -> Result<ProjectState, Error> {
    let key = DataKey::ProjState(id);
    let state: ProjectState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Cumulative contribution of `contributor`, or `None` if they never contributed.
pub fn get_contribution(env: &Env, id: u64, contributor: &Address) -> Option<i128> {
    let key = DataKey::Contribution(id, contributor.clone());
    let amount = env.storage().persistent().get(&key);
    if amount.is_some() {
        bump_persistent(env, &key);
    }
    amount
}

pub fn set_contribution(env: &Env, id: u64, contributor: &Address, amount: i128) {
    let key = DataKey::Contribution(id, contributor.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn load_request(env: &Env, id: u64, index: u32) -> Result<WithdrawRequest, Error> {
    let key = DataKey::Request(id, index);
    let request: WithdrawRequest = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFound)?;
    bump_persistent(env, &key);
    Ok(request)
}

pub fn save_request(env: &Env, id: u64, index: u32, request: &WithdrawRequest) {
    let key = DataKey::Request(id, index);
    env.storage().persistent().set(&key, request);
    bump_persistent(env, &key);
}

pub fn has_vote(env: &Env, id: u64, index: u32, voter: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Vote(id, index, voter.clone()))
}

pub fn record_vote(env: &Env, id: u64, index: u32, voter: &Address) {
    let key = DataKey::Vote(id, index, voter.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}
