extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env,
};

use crate::invariants;
use crate::{CrowdfundEscrow, CrowdfundEscrowClient, Error, ProjectStatus};

const DAY: u64 = 86_400;

fn setup_uninitialized() -> (Env, CrowdfundEscrowClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CrowdfundEscrow, ());
    let client = CrowdfundEscrowClient::new(&env, &contract_id);
    (env, client)
}

fn setup() -> (
    Env,
    CrowdfundEscrowClient<'static>,
    token::Client<'static>,
    token::StellarAssetClient<'static>,
) {
    let (env, client) = setup_uninitialized();
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let token = token::Client::new(&env, &sac.address());
    let token_sac = token::StellarAssetClient::new(&env, &sac.address());
    client.init(&sac.address());
    (env, client, token, token_sac)
}

fn advance_days(env: &Env, days: u64) {
    env.ledger().with_mut(|li| li.timestamp += days * DAY);
}

// ─────────────────────────────────────────────────────────────
// Initialisation
// ─────────────────────────────────────────────────────────────

#[test]
fn init_twice_fails() {
    let (env, client, _token, _sac) = setup();
    let other = Address::generate(&env);
    assert_eq!(client.try_init(&other), Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn create_before_init_fails() {
    let (env, client) = setup_uninitialized();
    let creator = Address::generate(&env);
    assert_eq!(
        client.try_create_project(&creator, &500, &10),
        Err(Ok(Error::NotInitialized))
    );
}

// ─────────────────────────────────────────────────────────────
// Project creation
// ─────────────────────────────────────────────────────────────

#[test]
fn create_project_records_config() {
    let (env, client, _token, _sac) = setup();
    let creator = Address::generate(&env);
    let created_at = env.ledger().timestamp();

    let id = client.create_project(&creator, &3_500, &200);
    assert_eq!(id, 0);

    let project = client.get_project(&id);
    assert_eq!(project.creator, creator);
    assert_eq!(project.goal, 3_500);
    assert_eq!(project.deadline, created_at + 200 * DAY);
    assert_eq!(project.current_amount, 0);
    assert_eq!(project.claimed, 0);
    assert_eq!(project.funders_count, 0);
    assert_eq!(client.get_status(&id), ProjectStatus::Open);
}

#[test]
fn create_project_assigns_sequential_ids() {
    let (env, client, _token, _sac) = setup();
    let creator = Address::generate(&env);

    let a = client.create_project(&creator, &100, &5);
    let b = client.create_project(&creator, &200, &5);
    let c = client.create_project(&creator, &300, &5);
    assert_eq!((a, b, c), (0, 1, 2));

    let projects = std::vec![
        client.get_project(&a),
        client.get_project(&b),
        client.get_project(&c),
    ];
    invariants::assert_sequential_ids(&projects);
}

#[test]
fn create_project_rejects_bad_inputs() {
    let (env, client, _token, _sac) = setup();
    let creator = Address::generate(&env);

    assert_eq!(
        client.try_create_project(&creator, &0, &10),
        Err(Ok(Error::InvalidGoal))
    );
    assert_eq!(
        client.try_create_project(&creator, &-5, &10),
        Err(Ok(Error::InvalidGoal))
    );
    assert_eq!(
        client.try_create_project(&creator, &500, &0),
        Err(Ok(Error::InvalidDuration))
    );
    // A duration whose deadline overflows u64 is rejected, not trapped.
    assert_eq!(
        client.try_create_project(&creator, &500, &u64::MAX),
        Err(Ok(Error::InvalidDuration))
    );
}

#[test]
fn get_project_unknown_id_fails() {
    let (env, client, _token, _sac) = setup();
    let anyone = Address::generate(&env);
    assert_eq!(client.try_get_project(&42), Err(Ok(Error::NotFound)));
    assert_eq!(
        client.try_get_funded_amount(&42, &anyone),
        Err(Ok(Error::NotFound))
    );
}

// ─────────────────────────────────────────────────────────────
// Funding
// ─────────────────────────────────────────────────────────────

#[test]
fn fund_project_credits_contribution() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &2_500, &30);
    sac.mint(&funder, &500);
    client.fund_project(&id, &funder, &500);

    let project = client.get_project(&id);
    assert_eq!(project.current_amount, 500);
    assert_eq!(project.funders_count, 1);
    assert_eq!(client.get_funded_amount(&id, &funder), 500);
    assert_eq!(token.balance(&client.address), 500);
    assert_eq!(token.balance(&funder), 0);
}

#[test]
fn fund_project_repeat_funder_counts_once() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &2_500, &30);
    sac.mint(&funder, &800);
    client.fund_project(&id, &funder, &500);
    client.fund_project(&id, &funder, &300);

    let project = client.get_project(&id);
    assert_eq!(project.current_amount, 800);
    assert_eq!(project.funders_count, 1);
    assert_eq!(client.get_funded_amount(&id, &funder), 800);
}

#[test]
fn fund_project_counts_distinct_funders() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder1 = Address::generate(&env);
    let funder2 = Address::generate(&env);

    let id = client.create_project(&creator, &2_500, &30);
    sac.mint(&funder1, &500);
    sac.mint(&funder2, &700);
    client.fund_project(&id, &funder1, &500);
    client.fund_project(&id, &funder2, &700);

    let project = client.get_project(&id);
    assert_eq!(project.funders_count, 2);
    invariants::assert_all_project_invariants(
        &project,
        &[
            client.get_funded_amount(&id, &funder1),
            client.get_funded_amount(&id, &funder2),
        ],
    );
}

#[test]
fn fund_project_rejects_bad_amounts() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &2_500, &30);
    sac.mint(&funder, &100);
    assert_eq!(
        client.try_fund_project(&id, &funder, &0),
        Err(Ok(Error::InvalidAmount))
    );
    assert_eq!(
        client.try_fund_project(&id, &funder, &-10),
        Err(Ok(Error::InvalidAmount))
    );
}

#[test]
fn fund_project_after_deadline_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &2_500, &10);
    sac.mint(&funder, &100);
    advance_days(&env, 11);

    assert_eq!(
        client.try_fund_project(&id, &funder, &100),
        Err(Ok(Error::CampaignClosed))
    );
}

#[test]
fn fund_project_unknown_id_fails() {
    let (env, client, _token, sac) = setup();
    let funder = Address::generate(&env);
    sac.mint(&funder, &100);
    assert_eq!(
        client.try_fund_project(&7, &funder, &100),
        Err(Ok(Error::NotFound))
    );
}

#[test]
fn fund_project_without_balance_leaves_state_untouched() {
    let (env, client, _token, _sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &2_500, &30);
    // No mint: the token contract declines the pull.
    assert_eq!(
        client.try_fund_project(&id, &funder, &100),
        Err(Ok(Error::TransferFailed))
    );

    let project = client.get_project(&id);
    assert_eq!(project.current_amount, 0);
    assert_eq!(project.funders_count, 0);
    assert_eq!(client.get_funded_amount(&id, &funder), 0);
}

// ─────────────────────────────────────────────────────────────
// Reduction
// ─────────────────────────────────────────────────────────────

#[test]
fn reduce_funding_partial_then_overdraw_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);

    client.reduce_funding(&id, &funder, &100);
    assert_eq!(client.get_project(&id).current_amount, 300);
    assert_eq!(client.get_funded_amount(&id, &funder), 300);

    // Only 300 remains.
    assert_eq!(
        client.try_reduce_funding(&id, &funder, &400),
        Err(Ok(Error::InsufficientContribution))
    );
}

#[test]
fn reduce_funding_partial_keeps_funder_counted() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);
    client.reduce_funding(&id, &funder, &150);

    let project = client.get_project(&id);
    assert_eq!(project.funders_count, 1);
    assert_eq!(token.balance(&funder), 150);
    invariants::assert_all_project_invariants(&project, &[client.get_funded_amount(&id, &funder)]);
}

#[test]
fn withdraw_funding_round_trips() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);
    client.withdraw_funding(&id, &funder);

    let project = client.get_project(&id);
    assert_eq!(project.current_amount, 0);
    assert_eq!(project.funders_count, 0);
    assert_eq!(client.get_funded_amount(&id, &funder), 0);
    assert_eq!(token.balance(&funder), 400);
    assert_eq!(token.balance(&client.address), 0);
}

#[test]
fn withdraw_funding_without_stake_fails() {
    let (env, client, _token, _sac) = setup();
    let creator = Address::generate(&env);
    let stranger = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    assert_eq!(
        client.try_withdraw_funding(&id, &stranger),
        Err(Ok(Error::InsufficientContribution))
    );
}

#[test]
fn reduce_funding_rejects_bad_amounts() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);
    assert_eq!(
        client.try_reduce_funding(&id, &funder, &0),
        Err(Ok(Error::InvalidAmount))
    );
}

#[test]
fn reduce_funding_after_deadline_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);
    advance_days(&env, 11);

    assert_eq!(
        client.try_reduce_funding(&id, &funder, &100),
        Err(Ok(Error::CampaignClosed))
    );
    assert_eq!(
        client.try_withdraw_funding(&id, &funder),
        Err(Ok(Error::CampaignClosed))
    );
}

// ─────────────────────────────────────────────────────────────
// Claiming
// ─────────────────────────────────────────────────────────────

#[test]
fn claim_funds_after_successful_funding() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &600);
    client.fund_project(&id, &funder, &600);

    advance_days(&env, 11);
    client.claim_funds(&id, &creator);

    let project = client.get_project(&id);
    assert_eq!(project.claimed, 600);
    assert_eq!(project.current_amount, 0);
    assert_eq!(token.balance(&creator), 600);
    assert_eq!(token.balance(&client.address), 0);
    assert_eq!(client.get_status(&id), ProjectStatus::Claimed);
    // The contribution entry survives as a historical record.
    assert_eq!(client.get_funded_amount(&id, &funder), 600);
}

#[test]
fn claim_funds_requires_creator() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &600);
    client.fund_project(&id, &funder, &600);
    advance_days(&env, 11);

    assert_eq!(
        client.try_claim_funds(&id, &funder),
        Err(Ok(Error::Unauthorized))
    );
}

#[test]
fn claim_funds_before_deadline_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &600);
    client.fund_project(&id, &funder, &600);

    assert_eq!(
        client.try_claim_funds(&id, &creator),
        Err(Ok(Error::CampaignOpen))
    );
}

#[test]
fn claim_funds_below_goal_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);
    advance_days(&env, 11);

    assert_eq!(
        client.try_claim_funds(&id, &creator),
        Err(Ok(Error::GoalNotReached))
    );
}

#[test]
fn claim_funds_twice_fails_without_double_transfer() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &600);
    client.fund_project(&id, &funder, &600);
    advance_days(&env, 11);

    client.claim_funds(&id, &creator);
    assert_eq!(
        client.try_claim_funds(&id, &creator),
        Err(Ok(Error::AlreadyClaimed))
    );

    let project = client.get_project(&id);
    assert_eq!(project.claimed, 600);
    assert_eq!(token.balance(&creator), 600);
}

#[test]
fn claim_funds_goal_boundary() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    // Exactly at goal: claimable.
    let exact = client.create_project(&creator, &500, &10);
    // One unit below goal: not claimable.
    let short = client.create_project(&creator, &500, &10);

    sac.mint(&funder, &999);
    client.fund_project(&exact, &funder, &500);
    client.fund_project(&short, &funder, &499);
    advance_days(&env, 11);

    client.claim_funds(&exact, &creator);
    assert_eq!(client.get_project(&exact).claimed, 500);

    assert_eq!(
        client.try_claim_funds(&short, &creator),
        Err(Ok(Error::GoalNotReached))
    );
}

// ─────────────────────────────────────────────────────────────
// Refunds
// ─────────────────────────────────────────────────────────────

#[test]
fn claim_refund_after_failed_funding() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);

    advance_days(&env, 11);
    assert_eq!(client.get_status(&id), ProjectStatus::Failed);
    client.claim_refund(&id, &funder);

    let project = client.get_project(&id);
    assert_eq!(project.current_amount, 0);
    assert_eq!(project.funders_count, 0);
    assert_eq!(client.get_funded_amount(&id, &funder), 0);
    assert_eq!(token.balance(&funder), 400);
    assert_eq!(token.balance(&client.address), 0);
}

#[test]
fn claim_refund_before_deadline_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);

    assert_eq!(
        client.try_claim_refund(&id, &funder),
        Err(Ok(Error::CampaignOpen))
    );
}

#[test]
fn claim_refund_on_funded_campaign_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &600);
    client.fund_project(&id, &funder, &600);
    advance_days(&env, 11);

    assert_eq!(
        client.try_claim_refund(&id, &funder),
        Err(Ok(Error::GoalReached))
    );
    // Refund attempt must not block the creator's claim.
    client.claim_funds(&id, &creator);
}

#[test]
fn claim_refund_without_stake_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);
    let stranger = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);
    advance_days(&env, 11);

    assert_eq!(
        client.try_claim_refund(&id, &stranger),
        Err(Ok(Error::NothingToRefund))
    );
}

#[test]
fn claim_refund_twice_fails() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);
    advance_days(&env, 11);

    client.claim_refund(&id, &funder);
    assert_eq!(
        client.try_claim_refund(&id, &funder),
        Err(Ok(Error::NothingToRefund))
    );
}

#[test]
fn claim_refund_per_funder_on_failed_campaign() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder1 = Address::generate(&env);
    let funder2 = Address::generate(&env);

    let id = client.create_project(&creator, &1_000, &10);
    sac.mint(&funder1, &300);
    sac.mint(&funder2, &200);
    client.fund_project(&id, &funder1, &300);
    client.fund_project(&id, &funder2, &200);
    advance_days(&env, 11);

    client.claim_refund(&id, &funder1);

    // funder1's refund drains the total below any threshold, but the
    // frozen Failed outcome still lets funder2 refund.
    let project = client.get_project(&id);
    assert_eq!(project.current_amount, 200);
    assert_eq!(project.funders_count, 1);

    client.claim_refund(&id, &funder2);
    assert_eq!(client.get_project(&id).current_amount, 0);
    assert_eq!(token.balance(&funder1), 300);
    assert_eq!(token.balance(&funder2), 200);
}

// ─────────────────────────────────────────────────────────────
// Outcome freezing
// ─────────────────────────────────────────────────────────────

/// The funded/failed determination is captured at the first settlement,
/// so a claim that zeroes `current_amount` does not spuriously unblock
/// refunds afterwards.
#[test]
fn refund_stays_blocked_after_claim_zeroes_balance() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &600);
    client.fund_project(&id, &funder, &600);
    advance_days(&env, 11);

    client.claim_funds(&id, &creator);
    assert_eq!(client.get_project(&id).current_amount, 0);

    // Live balance is now below goal, but the campaign was funded.
    assert_eq!(
        client.try_claim_refund(&id, &funder),
        Err(Ok(Error::GoalReached))
    );
    assert_eq!(token.balance(&funder), 0);
}

#[test]
fn failed_outcome_stays_frozen_across_refunds() {
    let (env, client, _token, sac) = setup();
    let creator = Address::generate(&env);
    let funder = Address::generate(&env);

    let id = client.create_project(&creator, &500, &10);
    sac.mint(&funder, &400);
    client.fund_project(&id, &funder, &400);
    advance_days(&env, 11);

    // First settlement freezes Failed; the creator can never claim after.
    client.claim_refund(&id, &funder);
    assert_eq!(
        client.try_claim_funds(&id, &creator),
        Err(Ok(Error::GoalNotReached))
    );
    assert_eq!(client.get_status(&id), ProjectStatus::Failed);
}

// ─────────────────────────────────────────────────────────────
// Cross-operation invariants
// ─────────────────────────────────────────────────────────────

#[test]
fn escrow_invariants_hold_across_mixed_operations() {
    let (env, client, token, sac) = setup();
    let creator = Address::generate(&env);
    let funder1 = Address::generate(&env);
    let funder2 = Address::generate(&env);
    let funder3 = Address::generate(&env);

    let id = client.create_project(&creator, &1_000, &10);
    let original = client.get_project(&id);

    sac.mint(&funder1, &500);
    sac.mint(&funder2, &500);
    sac.mint(&funder3, &500);

    let contributions = || {
        std::vec![
            client.get_funded_amount(&id, &funder1),
            client.get_funded_amount(&id, &funder2),
            client.get_funded_amount(&id, &funder3),
        ]
    };

    client.fund_project(&id, &funder1, &400);
    invariants::assert_all_project_invariants(&client.get_project(&id), &contributions());

    client.fund_project(&id, &funder2, &300);
    client.fund_project(&id, &funder3, &250);
    invariants::assert_all_project_invariants(&client.get_project(&id), &contributions());

    client.reduce_funding(&id, &funder2, &100);
    client.withdraw_funding(&id, &funder3);
    let project = client.get_project(&id);
    invariants::assert_all_project_invariants(&project, &contributions());
    invariants::assert_project_immutable_fields(&original, &project);
    assert_eq!(project.funders_count, 2);

    // 400 + 200 = 600 live in escrow, matching the token balance.
    assert_eq!(project.current_amount, 600);
    assert_eq!(token.balance(&client.address), 600);

    advance_days(&env, 11);
    assert_eq!(
        client.try_claim_funds(&id, &creator),
        Err(Ok(Error::GoalNotReached))
    );
    client.claim_refund(&id, &funder1);
    client.claim_refund(&id, &funder2);
    let project = client.get_project(&id);
    invariants::assert_all_project_invariants(&project, &contributions());
    assert_eq!(project.current_amount, 0);
    assert_eq!(token.balance(&client.address), 0);
}
