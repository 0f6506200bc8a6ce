//! # Crowdfund Escrow Contract
//!
//! This is the root crate of a **token-denominated crowdfunding escrow**.
//! It exposes the single Soroban contract `CrowdfundEscrow` whose entry
//! points cover the full campaign lifecycle:
//!
//! | Phase      | Entry Point(s)                                       |
//! |------------|------------------------------------------------------|
//! | Bootstrap  | [`CrowdfundEscrow::init`]                            |
//! | Creation   | [`CrowdfundEscrow::create_project`]                  |
//! | Funding    | [`CrowdfundEscrow::fund_project`]                    |
//! | Reduction  | [`CrowdfundEscrow::reduce_funding`], [`CrowdfundEscrow::withdraw_funding`] |
//! | Settlement | [`CrowdfundEscrow::claim_funds`], [`CrowdfundEscrow::claim_refund`] |
//! | Queries    | `get_project`, `get_funded_amount`, `get_status`    |
//!
//! ## Architecture
//!
//! Storage access is fully delegated to [`storage`]; event shapes live in
//! [`events`]; shared data types in [`types`]. This file contains the
//! public entry points and the escrow accounting they guard.
//!
//! ## Custody rules
//!
//! Every precondition is checked before any state mutation, and token
//! movement happens before the matching state write, so the contract
//! never records a transfer that did not occur. The funded/failed
//! determination is frozen the first time a settlement operation runs
//! after the deadline (see [`types::Outcome`]); a creator claim that
//! zeroes the pooled balance therefore cannot unblock refunds.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env};

mod events;
mod storage;
mod types;

#[cfg(test)]
mod test_lifecycle;

use events::{
    emit_funding_reduced, emit_funds_claimed, emit_funds_refunded, emit_project_created,
    emit_project_funded, FundingReduced, FundsClaimed, FundsRefunded, ProjectCreated,
    ProjectFunded,
};
use storage::{
    get_and_increment_project_id, get_token, is_initialized, load_contribution,
    load_project, load_project_config, load_project_state, save_contribution, save_project,
    save_project_state, set_token,
};
pub use types::{Outcome, Project, ProjectConfig, ProjectState, ProjectStatus};

const SECONDS_PER_DAY: u64 = 86_400;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized       = 1,
    NotInitialized           = 2,
    InvalidGoal              = 3,
    InvalidDuration          = 4,
    InvalidAmount            = 5,
    NotFound                 = 6,
    CampaignClosed           = 7,
    CampaignOpen             = 8,
    InsufficientContribution = 9,
    Unauthorized             = 10,
    GoalNotReached           = 11,
    GoalReached              = 12,
    AlreadyClaimed           = 13,
    NothingToRefund          = 14,
    TransferFailed           = 15,
}

#[contract]
pub struct CrowdfundEscrow;

#[contractimpl]
impl CrowdfundEscrow {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the contract with the escrow token address.
    ///
    /// Must be called exactly once after deployment; subsequent calls
    /// fail with `AlreadyInitialized`.
    pub fn init(env: Env, token: Address) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        set_token(&env, &token);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Project registry
    // ─────────────────────────────────────────────────────────

    /// Create a new campaign with a funding `goal` and a deadline of
    /// `duration_days` from now. No token movement occurs.
    ///
    /// Returns the newly assigned sequential project ID.
    pub fn create_project(
        env: Env,
        creator: Address,
        goal: i128,
        duration_days: u64,
    ) -> Result<u64, Error> {
        creator.require_auth();

        if !is_initialized(&env) {
            return Err(Error::NotInitialized);
        }
        if goal <= 0 {
            return Err(Error::InvalidGoal);
        }
        if duration_days == 0 {
            return Err(Error::InvalidDuration);
        }

        // A duration that overflows the timestamp arithmetic is as
        // invalid as a zero one; reject it instead of trapping.
        let deadline = duration_days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|d| env.ledger().timestamp().checked_add(d))
            .ok_or(Error::InvalidDuration)?;

        let id = get_and_increment_project_id(&env);

        let config = ProjectConfig {
            id,
            creator: creator.clone(),
            goal,
            deadline,
        };
        let state = ProjectState {
            current_amount: 0,
            claimed: 0,
            funders_count: 0,
            outcome: Outcome::Pending,
        };
        save_project(&env, &config, &state);

        emit_project_created(
            &env,
            ProjectCreated {
                project_id: id,
                creator,
                goal,
                deadline,
            },
        );
        Ok(id)
    }

    /// Retrieve a campaign by its ID.
    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        load_project(&env, project_id).ok_or(Error::NotFound)
    }

    /// Return `funder`'s live contribution to a campaign (zero if they
    /// never funded or already withdrew).
    pub fn get_funded_amount(env: Env, project_id: u64, funder: Address) -> Result<i128, Error> {
        if load_project_config(&env, project_id).is_none() {
            return Err(Error::NotFound);
        }
        Ok(load_contribution(&env, project_id, &funder))
    }

    /// Return the derived lifecycle status of a campaign.
    ///
    /// Pure read: does not freeze the outcome, so a pre-settlement query
    /// after the deadline derives Funded/Failed from the live balance.
    pub fn get_status(env: Env, project_id: u64) -> Result<ProjectStatus, Error> {
        let config = load_project_config(&env, project_id).ok_or(Error::NotFound)?;
        let state = load_project_state(&env, project_id).ok_or(Error::NotFound)?;
        Ok(derive_status(&config, &state, env.ledger().timestamp()))
    }

    // ─────────────────────────────────────────────────────────
    // Escrow ledger
    // ─────────────────────────────────────────────────────────

    /// Deposit `amount` of the escrow token into a campaign.
    ///
    /// Pulls the tokens from `funder` into the contract, then credits
    /// the funder's live contribution and the campaign total. A first
    /// nonzero deposit increments `funders_count`.
    pub fn fund_project(
        env: Env,
        project_id: u64,
        funder: Address,
        amount: i128,
    ) -> Result<(), Error> {
        funder.require_auth();

        let token = get_token(&env).ok_or(Error::NotInitialized)?;
        let config = load_project_config(&env, project_id).ok_or(Error::NotFound)?;
        let mut state = load_project_state(&env, project_id).ok_or(Error::NotFound)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if env.ledger().timestamp() >= config.deadline {
            return Err(Error::CampaignClosed);
        }

        transfer_or_fail(&env, &token, &funder, &env.current_contract_address(), amount)?;

        let prior = load_contribution(&env, project_id, &funder);
        if prior == 0 {
            state.funders_count += 1;
        }
        save_contribution(&env, project_id, &funder, prior + amount);
        state.current_amount += amount;
        save_project_state(&env, project_id, &state);

        emit_project_funded(
            &env,
            ProjectFunded {
                project_id,
                funder,
                amount,
                current_amount: state.current_amount,
            },
        );
        Ok(())
    }

    /// Withdraw `amount` of the caller's live contribution while the
    /// campaign is still open.
    pub fn reduce_funding(
        env: Env,
        project_id: u64,
        funder: Address,
        amount: i128,
    ) -> Result<(), Error> {
        funder.require_auth();

        let token = get_token(&env).ok_or(Error::NotInitialized)?;
        let config = load_project_config(&env, project_id).ok_or(Error::NotFound)?;
        let mut state = load_project_state(&env, project_id).ok_or(Error::NotFound)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if env.ledger().timestamp() >= config.deadline {
            return Err(Error::CampaignClosed);
        }
        let held = load_contribution(&env, project_id, &funder);
        if amount > held {
            return Err(Error::InsufficientContribution);
        }

        release_contribution(&env, &token, project_id, &funder, held, amount, &mut state)?;

        emit_funding_reduced(
            &env,
            FundingReduced {
                project_id,
                funder,
                amount,
                current_amount: state.current_amount,
            },
        );
        Ok(())
    }

    /// Withdraw the caller's entire live contribution while the campaign
    /// is still open.
    pub fn withdraw_funding(env: Env, project_id: u64, funder: Address) -> Result<(), Error> {
        funder.require_auth();

        let token = get_token(&env).ok_or(Error::NotInitialized)?;
        let config = load_project_config(&env, project_id).ok_or(Error::NotFound)?;
        let mut state = load_project_state(&env, project_id).ok_or(Error::NotFound)?;

        if env.ledger().timestamp() >= config.deadline {
            return Err(Error::CampaignClosed);
        }
        let held = load_contribution(&env, project_id, &funder);
        if held == 0 {
            return Err(Error::InsufficientContribution);
        }

        release_contribution(&env, &token, project_id, &funder, held, held, &mut state)?;

        emit_funding_reduced(
            &env,
            FundingReduced {
                project_id,
                funder,
                amount: held,
                current_amount: state.current_amount,
            },
        );
        Ok(())
    }

    /// Release the pooled funds of a funded campaign to its creator.
    ///
    /// Only the creator may call this, only after the deadline, only if
    /// the frozen outcome is Funded, and at most once. The token
    /// transfer is attempted before the state write, so a failed
    /// transfer leaves the campaign claimable again.
    pub fn claim_funds(env: Env, project_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();

        let token = get_token(&env).ok_or(Error::NotInitialized)?;
        let config = load_project_config(&env, project_id).ok_or(Error::NotFound)?;
        let mut state = load_project_state(&env, project_id).ok_or(Error::NotFound)?;

        if caller != config.creator {
            return Err(Error::Unauthorized);
        }
        if env.ledger().timestamp() < config.deadline {
            return Err(Error::CampaignOpen);
        }
        if settle_outcome(&env, &config, &mut state) == Outcome::Failed {
            return Err(Error::GoalNotReached);
        }
        if state.claimed != 0 {
            return Err(Error::AlreadyClaimed);
        }

        let amount = state.current_amount;
        transfer_or_fail(&env, &token, &env.current_contract_address(), &caller, amount)?;

        state.claimed = amount;
        state.current_amount = 0;
        save_project_state(&env, project_id, &state);

        emit_funds_claimed(
            &env,
            FundsClaimed {
                project_id,
                creator: caller,
                amount,
                current_amount: 0,
            },
        );
        Ok(())
    }

    /// Return the caller's entire stake from a failed campaign.
    ///
    /// Gated on the frozen outcome, not the live balance: on a funded
    /// campaign this fails with `GoalReached` even after the creator's
    /// claim has zeroed `current_amount`.
    pub fn claim_refund(env: Env, project_id: u64, funder: Address) -> Result<(), Error> {
        funder.require_auth();

        let token = get_token(&env).ok_or(Error::NotInitialized)?;
        let config = load_project_config(&env, project_id).ok_or(Error::NotFound)?;
        let mut state = load_project_state(&env, project_id).ok_or(Error::NotFound)?;

        if env.ledger().timestamp() < config.deadline {
            return Err(Error::CampaignOpen);
        }
        if settle_outcome(&env, &config, &mut state) == Outcome::Funded {
            return Err(Error::GoalReached);
        }
        let held = load_contribution(&env, project_id, &funder);
        if held == 0 {
            return Err(Error::NothingToRefund);
        }

        release_contribution(&env, &token, project_id, &funder, held, held, &mut state)?;

        emit_funds_refunded(
            &env,
            FundsRefunded {
                project_id,
                funder,
                amount: held,
                current_amount: state.current_amount,
            },
        );
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────

/// Move tokens all-or-nothing; any declined or trapped transfer maps to
/// `TransferFailed` and the caller propagates it before mutating state.
fn transfer_or_fail(
    env: &Env,
    token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), Error> {
    let client = token::Client::new(env, token);
    match client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

/// Freeze the funded/failed determination on first post-deadline
/// evaluation and return it. Callers must have checked the deadline.
fn settle_outcome(env: &Env, config: &ProjectConfig, state: &mut ProjectState) -> Outcome {
    if state.outcome == Outcome::Pending {
        state.outcome = if state.current_amount >= config.goal {
            Outcome::Funded
        } else {
            Outcome::Failed
        };
        save_project_state(env, config.id, state);
    }
    state.outcome
}

/// Push `amount` of a funder's `held` stake back to them, then debit the
/// contribution entry and the campaign total. A contribution that
/// returns to zero removes its entry and decrements `funders_count`.
fn release_contribution(
    env: &Env,
    token: &Address,
    project_id: u64,
    funder: &Address,
    held: i128,
    amount: i128,
    state: &mut ProjectState,
) -> Result<(), Error> {
    transfer_or_fail(env, token, &env.current_contract_address(), funder, amount)?;

    let remaining = held - amount;
    save_contribution(env, project_id, funder, remaining);
    state.current_amount -= amount;
    if remaining == 0 {
        state.funders_count -= 1;
    }
    save_project_state(env, project_id, state);
    Ok(())
}

/// Derive the lifecycle status without mutating anything.
fn derive_status(config: &ProjectConfig, state: &ProjectState, now: u64) -> ProjectStatus {
    if state.claimed != 0 {
        return ProjectStatus::Claimed;
    }
    if now < config.deadline {
        return ProjectStatus::Open;
    }
    match state.outcome {
        Outcome::Funded => ProjectStatus::Funded,
        Outcome::Failed => ProjectStatus::Failed,
        Outcome::Pending => {
            if state.current_amount >= config.goal {
                ProjectStatus::Funded
            } else {
                ProjectStatus::Failed
            }
        }
    }
}
