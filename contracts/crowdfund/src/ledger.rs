//! # Ledger
//!
//! The per-project escrow state machine: contribution accounting, status
//! transitions, withdrawal requests, voting and quorum-gated payouts.
//!
//! Every function validates fully before it writes. The host additionally
//! rolls back all writes, transfers and events of an invocation that returns
//! `Err`, so a failed call never leaves partial state behind.

use soroban_sdk::{token, Address, Env, String};

use crate::events::{
    emit_amount_withdrawn, emit_contribution_received, emit_project_expired,
    emit_withdraw_request_created, emit_withdraw_vote,
};
use crate::storage::{
    get_contribution, get_token, has_vote, load_project_config, load_project_pair,
    load_project_state, load_request, record_vote, save_project_state, save_request,
    set_contribution,
};
use crate::types::{ProjectStatus, WithdrawRequest};
use crate::Error;

/// A request passes once at least half of all contributors voted for it.
pub fn quorum_met(vote_count: u32, contributor_count: u32) -> bool {
    u64::from(vote_count) * 2 >= u64::from(contributor_count)
}

/// Accept `amount` from `contributor` into the project's escrow.
pub fn contribute(env: &Env, project_id: u64, contributor: Address, amount: i128) -> Result<(), Error> {
    let (config, mut state) = load_project_pair(env, project_id)?;

    if amount <= 0 || amount < config.min_contribution {
        return Err(Error::InsufficientAmount);
    }
    if state.status != ProjectStatus::Ongoing {
        return Err(Error::InvalidState);
    }
    let now = env.ledger().timestamp();
    if now > config.deadline {
        return Err(Error::InvalidState);
    }

    let previous = get_contribution(env, project_id, &contributor);
    let total = previous
        .unwrap_or(0)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    state.current_amount = state
        .current_amount
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    state.balance = state.balance.checked_add(amount).ok_or(Error::Overflow)?;
    if previous.is_none() {
        state.contributor_count = state
            .contributor_count
            .checked_add(1)
            .ok_or(Error::Overflow)?;
    }

    if state.current_amount >= config.goal {
        state.status = ProjectStatus::Successful;
        if state.complete_at.is_none() {
            state.complete_at = Some(now);
        }
    }

    let token_client = token::Client::new(env, &get_token(env)?);
    token_client.transfer(&contributor, &env.current_contract_address(), &amount);

    set_contribution(env, project_id, &contributor, total);
    save_project_state(env, project_id, &state);

    emit_contribution_received(env, project_id, contributor, amount, state.current_amount);
    Ok(())
}

/// Move an unfunded project past its deadline to `Failed`.
///
/// Idempotent: projects that already left `Ongoing`, or whose deadline has not
/// passed, are returned unchanged and no event is published.
pub fn check_deadline(env: &Env, project_id: u64) -> Result<ProjectStatus, Error> {
    let (config, mut state) = load_project_pair(env, project_id)?;
    let now = env.ledger().timestamp();

    if state.status == ProjectStatus::Ongoing
        && now > config.deadline
        && state.current_amount < config.goal
    {
        state.status = ProjectStatus::Failed;
        state.complete_at = Some(now);
        save_project_state(env, project_id, &state);
        emit_project_expired(env, project_id, now);
    }

    Ok(state.status)
}

pub fn create_withdraw_request(
    env: &Env,
    project_id: u64,
    caller: &Address,
    description: String,
    amount: i128,
    recipient: Address,
) -> Result<u32, Error> {
    let (config, mut state) = load_project_pair(env, project_id)?;

    if *caller != config.creator {
        return Err(Error::Unauthorized);
    }
    if state.status != ProjectStatus::Successful {
        return Err(Error::InvalidState);
    }
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let request_id = state.request_count;
    let request = WithdrawRequest {
        description,
        amount,
        recipient,
        vote_count: 0,
        completed: false,
    };
    state.request_count = request_id.checked_add(1).ok_or(Error::Overflow)?;

    save_request(env, project_id, request_id, &request);
    save_project_state(env, project_id, &state);

    emit_withdraw_request_created(env, project_id, request_id, &request);
    Ok(request_id)
}

pub fn vote_withdraw_request(
    env: &Env,
    project_id: u64,
    voter: Address,
    request_id: u32,
) -> Result<u32, Error> {
    // Fail with ProjectNotFound before NotFound for an unknown handle.
    load_project_state(env, project_id)?;
    let mut request = load_request(env, project_id, request_id)?;

    if get_contribution(env, project_id, &voter).is_none() {
        return Err(Error::Unauthorized);
    }
    if request.completed {
        return Err(Error::AlreadyCompleted);
    }
    if has_vote(env, project_id, request_id, &voter) {
        return Err(Error::AlreadyVoted);
    }

    request.vote_count = request.vote_count.checked_add(1).ok_or(Error::Overflow)?;
    record_vote(env, project_id, request_id, &voter);
    save_request(env, project_id, request_id, &request);

    emit_withdraw_vote(env, project_id, request_id, voter, request.vote_count);
    Ok(request.vote_count)
}

/// Pay out an approved request from the project's escrow.
pub fn withdraw_requested_amount(
    env: &Env,
    project_id: u64,
    caller: &Address,
    request_id: u32,
) -> Result<(), Error> {
    let config = load_project_config(env, project_id)?;
    if *caller != config.creator {
        return Err(Error::Unauthorized);
    }
    let mut state = load_project_state(env, project_id)?;
    let mut request = load_request(env, project_id, request_id)?;

    if request.completed {
        return Err(Error::AlreadyCompleted);
    }
    if !quorum_met(request.vote_count, state.contributor_count) {
        return Err(Error::QuorumNotMet);
    }
    if request.amount > state.balance {
        return Err(Error::InsufficientEscrowBalance);
    }

    state.balance -= request.amount;
    request.completed = true;

    let token_client = token::Client::new(env, &get_token(env)?);
    token_client.transfer(
        &env.current_contract_address(),
        &request.recipient,
        &request.amount,
    );

    save_request(env, project_id, request_id, &request);
    save_project_state(env, project_id, &state);

    emit_amount_withdrawn(env, project_id, request_id, &request);
    Ok(())
}
