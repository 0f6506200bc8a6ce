//! Contract events.
//!
//! Every committed state change publishes an event with topics
//! `(symbol, project_id)` and a `#[contracttype]` struct as data. Events
//! carrying an escrow movement include the resulting `current_amount` so
//! off-chain observers can audit the running balance without replaying
//! all prior events.
//!
//! | Topic      | Struct            |
//! |------------|-------------------|
//! | `created`  | [`ProjectCreated`]|
//! | `funded`   | [`ProjectFunded`] |
//! | `reduced`  | [`FundingReduced`]|
//! | `claimed`  | [`FundsClaimed`]  |
//! | `refunded` | [`FundsRefunded`] |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// A new campaign was created. No token movement.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub creator: Address,
    pub goal: i128,
    pub deadline: u64,
}

/// A funder deposited tokens into escrow.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectFunded {
    pub project_id: u64,
    pub funder: Address,
    pub amount: i128,
    pub current_amount: i128,
}

/// A funder withdrew part or all of their contribution before the deadline.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingReduced {
    pub project_id: u64,
    pub funder: Address,
    pub amount: i128,
    pub current_amount: i128,
}

/// The creator withdrew the pooled funds of a funded campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsClaimed {
    pub project_id: u64,
    pub creator: Address,
    pub amount: i128,
    pub current_amount: i128,
}

/// A funder reclaimed their stake from a failed campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsRefunded {
    pub project_id: u64,
    pub funder: Address,
    pub amount: i128,
    pub current_amount: i128,
}

pub fn emit_project_created(env: &Env, event: ProjectCreated) {
    env.events()
        .publish((symbol_short!("created"), event.project_id), event);
}

pub fn emit_project_funded(env: &Env, event: ProjectFunded) {
    env.events()
        .publish((symbol_short!("funded"), event.project_id), event);
}

pub fn emit_funding_reduced(env: &Env, event: FundingReduced) {
    env.events()
        .publish((symbol_short!("reduced"), event.project_id), event);
}

pub fn emit_funds_claimed(env: &Env, event: FundsClaimed) {
    env.events()
        .publish((symbol_short!("claimed"), event.project_id), event);
}

pub fn emit_funds_refunded(env: &Env, event: FundsRefunded) {
    env.events()
        .publish((symbol_short!("refunded"), event.project_id), event);
}
