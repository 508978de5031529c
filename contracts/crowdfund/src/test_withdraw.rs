extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::invariants::assert_all_project_invariants;
use crate::{Crowdfunding, CrowdfundingClient, Error, ProjectStatus};

const NOW: u64 = 1_700_000_000;

struct Fixture {
    env: Env,
    client: CrowdfundingClient<'static>,
    token: token::Client<'static>,
    project: u64,
    creator: Address,
}

impl Fixture {
    /// An initialised contract with one ongoing project (min 10, goal 100).
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().with_mut(|li| li.timestamp = NOW);
        let contract_id = env.register(Crowdfunding, ());
        let client = CrowdfundingClient::new(&env, &contract_id);
        let token_admin = Address::generate(&env);
        let addr = env.register_stellar_asset_contract_v2(token_admin);
        let token = token::Client::new(&env, &addr.address());
        client.init(&Address::generate(&env), &token.address);

        let creator = Address::generate(&env);
        let project = client.create_project(
            &creator,
            &10,
            &(NOW + 86_400),
            &100,
            &String::from_str(&env, "Testing project"),
            &String::from_str(&env, "Testing project description"),
        );

        Fixture {
            env,
            client,
            token,
            project,
            creator,
        }
    }

    fn contribute(&self, amount: i128) -> Address {
        let contributor = Address::generate(&self.env);
        token::StellarAssetClient::new(&self.env, &self.token.address).mint(&contributor, &amount);
        self.client.contribute(&self.project, &contributor, &amount);
        contributor
    }

    fn request(&self, amount: i128, recipient: &Address) -> u32 {
        self.client.create_withdraw_request(
            &self.project,
            &self.creator,
            &String::from_str(&self.env, "Testing description"),
            &amount,
            recipient,
        )
    }
}

// ─────────────────────────────────────────────────────────
// Request creation
// ─────────────────────────────────────────────────────────

#[test]
fn test_only_creator_can_request() {
    let f = Fixture::new();
    f.contribute(150);
    let stranger = Address::generate(&f.env);

    let result = f.client.try_create_withdraw_request(
        &f.project,
        &stranger,
        &String::from_str(&f.env, "Testing description"),
        &20,
        &stranger,
    );
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    assert_eq!(f.client.get_request_count(&f.project), 0);
}

#[test]
fn test_request_requires_successful_project() {
    let f = Fixture::new();
    f.contribute(20);

    let result = f.client.try_create_withdraw_request(
        &f.project,
        &f.creator,
        &String::from_str(&f.env, "Testing description"),
        &20,
        &f.creator,
    );
    assert_eq!(result, Err(Ok(Error::InvalidState)));
}

#[test]
fn test_request_amount_must_be_positive() {
    let f = Fixture::new();
    f.contribute(150);

    let result = f.client.try_create_withdraw_request(
        &f.project,
        &f.creator,
        &String::from_str(&f.env, "nothing"),
        &0,
        &f.creator,
    );
    assert_eq!(result, Err(Ok(Error::InvalidAmount)));
}

#[test]
fn test_requests_are_indexed_in_order() {
    let f = Fixture::new();
    f.contribute(150);
    let recipient = Address::generate(&f.env);

    assert_eq!(f.request(10, &f.creator), 0);
    assert_eq!(f.request(500, &recipient), 1);
    assert_eq!(f.client.get_request_count(&f.project), 2);

    let requests = f.client.get_requests(&f.project);
    assert_eq!(requests.len(), 2);
    let second = requests.get(1).unwrap();
    assert_eq!(second.amount, 500);
    assert_eq!(second.recipient, recipient);
    assert_eq!(second.vote_count, 0);
    assert!(!second.completed);
    // Amounts above the escrow are only checked at withdrawal time.
    assert_eq!(f.client.get_request(&f.project, &1), second);
}

// ─────────────────────────────────────────────────────────
// Voting
// ─────────────────────────────────────────────────────────

#[test]
fn test_only_contributor_can_vote() {
    let f = Fixture::new();
    f.contribute(150);
    let request_id = f.request(20, &f.creator);
    let stranger = Address::generate(&f.env);

    assert_eq!(
        f.client.try_vote_withdraw_request(&f.project, &stranger, &request_id),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        f.client.try_vote_withdraw_request(&f.project, &f.creator, &request_id),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(f.client.get_request(&f.project, &request_id).vote_count, 0);
}

#[test]
fn test_vote_unknown_request() {
    let f = Fixture::new();
    let alice = f.contribute(150);

    assert_eq!(
        f.client.try_vote_withdraw_request(&f.project, &alice, &0),
        Err(Ok(Error::NotFound))
    );
    f.request(20, &f.creator);
    assert_eq!(
        f.client.try_vote_withdraw_request(&f.project, &alice, &1),
        Err(Ok(Error::NotFound))
    );
    assert_eq!(f.client.try_get_request(&f.project, &1), Err(Ok(Error::NotFound)));
}

#[test]
fn test_double_vote_rejected() {
    let f = Fixture::new();
    let alice = f.contribute(60);
    let bob = f.contribute(70);
    let request_id = f.request(20, &f.creator);

    assert!(!f.client.has_voted(&f.project, &request_id, &bob));
    assert_eq!(f.client.vote_withdraw_request(&f.project, &bob, &request_id), 1);
    assert!(f.client.has_voted(&f.project, &request_id, &bob));
    assert!(!f.client.has_voted(&f.project, &request_id, &alice));

    assert_eq!(
        f.client.try_vote_withdraw_request(&f.project, &bob, &request_id),
        Err(Ok(Error::AlreadyVoted))
    );
    assert_eq!(f.client.get_request(&f.project, &request_id).vote_count, 1);

    assert_eq!(f.client.vote_withdraw_request(&f.project, &alice, &request_id), 2);
}

#[test]
fn test_votes_are_per_request() {
    let f = Fixture::new();
    let alice = f.contribute(150);
    let first = f.request(20, &f.creator);
    let second = f.request(30, &f.creator);

    f.client.vote_withdraw_request(&f.project, &alice, &first);
    assert_eq!(f.client.vote_withdraw_request(&f.project, &alice, &second), 1);
    assert_eq!(f.client.get_request(&f.project, &first).vote_count, 1);
}

// ─────────────────────────────────────────────────────────
// Withdrawal
// ─────────────────────────────────────────────────────────

#[test]
fn test_withdraw_fails_without_quorum() {
    let f = Fixture::new();
    let alice = f.contribute(30);
    f.contribute(30);
    f.contribute(80);
    let request_id = f.request(20, &f.creator);

    assert_eq!(
        f.client.try_withdraw_requested_amount(&f.project, &f.creator, &request_id),
        Err(Ok(Error::QuorumNotMet))
    );

    // 1 of 3 votes is still below half.
    f.client.vote_withdraw_request(&f.project, &alice, &request_id);
    assert_eq!(
        f.client.try_withdraw_requested_amount(&f.project, &f.creator, &request_id),
        Err(Ok(Error::QuorumNotMet))
    );
    assert!(!f.client.get_request(&f.project, &request_id).completed);
    assert_eq!(f.client.get_contract_balance(&f.project), 140);
}

#[test]
fn test_withdraw_at_half_quorum_boundary() {
    let f = Fixture::new();
    f.contribute(60);
    let bob = f.contribute(70);
    let request_id = f.request(20, &f.creator);

    // 1 vote * 2 >= 2 contributors
    f.client.vote_withdraw_request(&f.project, &bob, &request_id);
    f.client.withdraw_requested_amount(&f.project, &f.creator, &request_id);

    let request = f.client.get_request(&f.project, &request_id);
    assert!(request.completed);
    assert_eq!(request.vote_count, 1);
    assert_eq!(f.token.balance(&f.creator), 20);
}

#[test]
fn test_withdraw_pays_recipient() {
    let f = Fixture::new();
    let alice = f.contribute(60);
    let bob = f.contribute(70);
    let supplier = Address::generate(&f.env);
    let request_id = f.request(100, &supplier);

    f.client.vote_withdraw_request(&f.project, &alice, &request_id);
    f.client.vote_withdraw_request(&f.project, &bob, &request_id);
    f.client.withdraw_requested_amount(&f.project, &f.creator, &request_id);

    assert_eq!(f.token.balance(&supplier), 100);
    assert_eq!(f.token.balance(&f.creator), 0);
    assert_eq!(f.client.get_contract_balance(&f.project), 30);
    assert_eq!(f.token.balance(&f.client.address), 30);

    let project = f.client.get_project(&f.project);
    assert_eq!(project.current_amount, 130);
    assert_eq!(project.status, ProjectStatus::Successful);
    assert_all_project_invariants(&project);
}

#[test]
fn test_withdraw_twice_rejected() {
    let f = Fixture::new();
    let alice = f.contribute(60);
    let bob = f.contribute(70);
    let request_id = f.request(20, &f.creator);
    f.client.vote_withdraw_request(&f.project, &alice, &request_id);
    f.client.vote_withdraw_request(&f.project, &bob, &request_id);
    f.client.withdraw_requested_amount(&f.project, &f.creator, &request_id);

    assert_eq!(
        f.client.try_withdraw_requested_amount(&f.project, &f.creator, &request_id),
        Err(Ok(Error::AlreadyCompleted))
    );
    assert_eq!(f.token.balance(&f.creator), 20);
    assert_eq!(f.client.get_contract_balance(&f.project), 110);
}

#[test]
fn test_completed_request_rejects_votes() {
    let f = Fixture::new();
    let alice = f.contribute(60);
    let bob = f.contribute(70);
    let request_id = f.request(20, &f.creator);
    f.client.vote_withdraw_request(&f.project, &alice, &request_id);
    f.client.withdraw_requested_amount(&f.project, &f.creator, &request_id);

    assert_eq!(
        f.client.try_vote_withdraw_request(&f.project, &bob, &request_id),
        Err(Ok(Error::AlreadyCompleted))
    );
    assert_eq!(f.client.get_request(&f.project, &request_id).vote_count, 1);
}

#[test]
fn test_withdraw_exceeding_escrow_rejected() {
    let f = Fixture::new();
    let alice = f.contribute(130);
    let first = f.request(100, &f.creator);
    let second = f.request(100, &f.creator);
    f.client.vote_withdraw_request(&f.project, &alice, &first);
    f.client.vote_withdraw_request(&f.project, &alice, &second);

    f.client.withdraw_requested_amount(&f.project, &f.creator, &first);
    assert_eq!(
        f.client.try_withdraw_requested_amount(&f.project, &f.creator, &second),
        Err(Ok(Error::InsufficientEscrowBalance))
    );

    assert!(!f.client.get_request(&f.project, &second).completed);
    assert_eq!(f.client.get_contract_balance(&f.project), 30);
    assert_eq!(f.token.balance(&f.creator), 100);
}

#[test]
fn test_only_creator_can_withdraw() {
    let f = Fixture::new();
    let alice = f.contribute(150);
    let request_id = f.request(20, &alice);
    f.client.vote_withdraw_request(&f.project, &alice, &request_id);

    assert_eq!(
        f.client.try_withdraw_requested_amount(&f.project, &alice, &request_id),
        Err(Ok(Error::Unauthorized))
    );
    assert!(!f.client.get_request(&f.project, &request_id).completed);
}

#[test]
fn test_withdraw_unknown_request() {
    let f = Fixture::new();
    f.contribute(150);

    assert_eq!(
        f.client.try_withdraw_requested_amount(&f.project, &f.creator, &3),
        Err(Ok(Error::NotFound))
    );
}
