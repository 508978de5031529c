extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{
    AmountWithdrawn, ContributionReceived, ProjectCreated, ProjectExpired,
    WithdrawRequestCreated, WithdrawVote,
};
use crate::{Crowdfunding, CrowdfundingClient, ProjectStatus};

const NOW: u64 = 1_700_000_000;

fn setup() -> (Env, CrowdfundingClient<'static>, token::Client<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = NOW);
    let contract_id = env.register(Crowdfunding, ());
    let client = CrowdfundingClient::new(&env, &contract_id);
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);
    client.init(&Address::generate(&env), &token.address);
    (env, client, token)
}

fn create_token<'a>(env: &Env, admin: &Address) -> token::Client<'a> {
    let addr = env.register_stellar_asset_contract_v2(admin.clone());
    token::Client::new(env, &addr.address())
}

fn mint(env: &Env, token: &token::Client, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, &token.address).mint(to, &amount);
}

/// A project with two contributors (60 + 70) that reached its goal of 100.
fn successful_project(
    env: &Env,
    client: &CrowdfundingClient,
    token: &token::Client,
) -> (u64, Address, Address, Address) {
    let creator = Address::generate(env);
    let alice = Address::generate(env);
    let bob = Address::generate(env);
    mint(env, token, &alice, 60);
    mint(env, token, &bob, 70);

    let id = client.create_project(
        &creator,
        &10,
        &(NOW + 86_400),
        &100,
        &String::from_str(env, "Testing title"),
        &String::from_str(env, "Testing description"),
    );
    client.contribute(&id, &alice, &60);
    client.contribute(&id, &bob, &70);
    (id, creator, alice, bob)
}

#[test]
fn test_project_created_event() {
    let (env, client, _token) = setup();
    let creator = Address::generate(&env);
    let deadline = NOW + 86_400;

    let id = client.create_project(
        &creator,
        &10,
        &deadline,
        &100_000,
        &String::from_str(&env, "Testing title"),
        &String::from_str(&env, "Testing description"),
    );

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("created"), project_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProjectCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectCreated {
            project_id: id,
            creator: creator.clone(),
            min_contribution: 10,
            deadline,
            goal: 100_000,
            current_amount: 0,
            contributor_count: 0,
            title: String::from_str(&env, "Testing title"),
            description: String::from_str(&env, "Testing description"),
            status: ProjectStatus::Ongoing,
        }
    );
    assert_eq!(client.return_all_projects().get(0), Some(event_data.project_id));
}

#[test]
fn test_contribution_received_event() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let contributor = Address::generate(&env);
    mint(&env, &token, &contributor, 100);

    let id = client.create_project(
        &creator,
        &10,
        &(NOW + 86_400),
        &100_000,
        &String::from_str(&env, "t"),
        &String::from_str(&env, "d"),
    );
    client.contribute(&id, &contributor, &20);
    client.contribute(&id, &contributor, &30);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("funded").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ContributionReceived = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ContributionReceived {
            project_id: id,
            contributor: contributor.clone(),
            amount: 30,
            current_amount: 50,
        }
    );
}

#[test]
fn test_project_expired_event() {
    let (env, client, _token) = setup();
    let creator = Address::generate(&env);
    let id = client.create_project(
        &creator,
        &10,
        &(NOW + 10),
        &100,
        &String::from_str(&env, "t"),
        &String::from_str(&env, "d"),
    );

    env.ledger().with_mut(|li| li.timestamp = NOW + 11);
    client.check_deadline(&id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("expired").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProjectExpired = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectExpired {
            project_id: id,
            complete_at: NOW + 11,
        }
    );
}

#[test]
fn test_withdraw_request_created_event() {
    let (env, client, token) = setup();
    let (id, creator, _alice, _bob) = successful_project(&env, &client, &token);

    let request_id = client.create_withdraw_request(
        &id,
        &creator,
        &String::from_str(&env, "Testing description"),
        &20,
        &creator,
    );

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("req_new").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: WithdrawRequestCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        WithdrawRequestCreated {
            project_id: id,
            request_id,
            description: String::from_str(&env, "Testing description"),
            amount: 20,
            vote_count: 0,
            completed: false,
            recipient: creator.clone(),
        }
    );
}

#[test]
fn test_withdraw_vote_event() {
    let (env, client, token) = setup();
    let (id, creator, _alice, bob) = successful_project(&env, &client, &token);
    let request_id = client.create_withdraw_request(
        &id,
        &creator,
        &String::from_str(&env, "Testing description"),
        &20,
        &creator,
    );

    client.vote_withdraw_request(&id, &bob, &request_id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("voted").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: WithdrawVote = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        WithdrawVote {
            project_id: id,
            request_id,
            voter: bob.clone(),
            vote_count: 1,
        }
    );
}

#[test]
fn test_amount_withdrawn_event() {
    let (env, client, token) = setup();
    let (id, creator, alice, bob) = successful_project(&env, &client, &token);
    let request_id = client.create_withdraw_request(
        &id,
        &creator,
        &String::from_str(&env, "Testing description"),
        &20,
        &creator,
    );
    client.vote_withdraw_request(&id, &alice, &request_id);
    client.vote_withdraw_request(&id, &bob, &request_id);

    client.withdraw_requested_amount(&id, &creator, &request_id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("withdrawn").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: AmountWithdrawn = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        AmountWithdrawn {
            project_id: id,
            request_id,
            description: String::from_str(&env, "Testing description"),
            amount: 20,
            vote_count: 2,
            completed: true,
            recipient: creator.clone(),
        }
    );
}
