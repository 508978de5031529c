//! # Registry
//!
//! Creates project ledgers and keeps the discovery list. Handles are assigned
//! sequentially from zero, so the list of all projects is simply `0..count`
//! in creation order.

use soroban_sdk::{Address, Env, String, Vec};

use crate::events::emit_project_created;
use crate::storage::{
    get_and_increment_project_id, get_token, has_token, project_count, save_project, set_admin,
    set_token,
};
use crate::types::{Project, ProjectConfig, ProjectState};
use crate::Error;

/// Bind the contract to the token that contributions and payouts use.
pub fn init(env: &Env, admin: &Address, token: &Address) -> Result<(), Error> {
    if has_token(env) {
        return Err(Error::AlreadyInitialized);
    }
    set_admin(env, admin);
    set_token(env, token);
    Ok(())
}

/// Create a new project ledger and return its handle.
///
/// The deadline is taken as given; a deadline already in the past yields a
/// project that can only be expired.
pub fn create_project(
    env: &Env,
    creator: Address,
    min_contribution: i128,
    deadline: u64,
    goal: i128,
    title: String,
    description: String,
) -> Result<u64, Error> {
    // Projects cannot be funded until a token is bound.
    get_token(env)?;

    // A zero goal is met at creation and could never expire.
    if min_contribution < 0 || goal <= 0 {
        return Err(Error::InvalidAmount);
    }

    let id = get_and_increment_project_id(env);
    let config = ProjectConfig {
        id,
        creator,
        min_contribution,
        deadline,
        goal,
        title,
        description,
    };
    let state = ProjectState::initial();
    save_project(env, &config, &state);

    emit_project_created(env, &Project::from_parts(config, state));
    Ok(id)
}

/// All project handles in creation order.
pub fn all_projects(env: &Env) -> Vec<u64> {
    let mut handles = Vec::new(env);
    for id in 0..project_count(env) {
        handles.push_back(id);
    }
    handles
}
