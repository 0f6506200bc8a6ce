//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the
//! escrow contract:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type      | Description                        |
//! |----------------|-----------|------------------------------------|
//! | `ProjectCount` | `u64`     | Auto-increment project ID counter  |
//! | `Token`        | `Address` | Escrow token contract address      |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                     | Type            | Description                       |
//! |-------------------------|-----------------|-----------------------------------|
//! | `ProjConfig(id)`        | `ProjectConfig` | Immutable campaign configuration  |
//! | `ProjState(id)`         | `ProjectState`  | Mutable campaign state            |
//! | `Contribution(id, who)` | `i128`          | A funder's live contribution      |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! ## Why split Config and State?
//!
//! Funding and reductions are the high-frequency writes. Writing the full
//! `Project` struct on every deposit is wasteful; `ProjectState` is a few
//! dozen bytes, so splitting it out keeps per-operation write costs small
//! while the public API stays clean via the reconstructed [`Project`]
//! return type.
//!
//! Contribution entries are removed (not zeroed) when a funder's live
//! amount returns to zero, so `Contribution(id, who)` existing implies a
//! nonzero amount.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Project, ProjectConfig, ProjectState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys (`ProjectCount`, `Token`) live as long as the
/// contract and are extended together. Persistent-tier keys hold
/// per-campaign data with independent TTLs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Global auto-increment counter for project IDs (Instance).
    ProjectCount,
    /// Escrow token contract address (Instance).
    Token,
    /// Immutable campaign configuration keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable campaign state keyed by ID (Persistent).
    ProjState(u64),
    /// A funder's live contribution, keyed by ID and address (Persistent).
    Contribution(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Atomically reads, increments, and stores the project counter.
/// Returns the ID to use for the *current* project (pre-increment value).
pub fn get_and_increment_project_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::ProjectCount, &(current + 1));
    current
}

/// Store the escrow token address in instance storage.
pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

/// Retrieve the escrow token address, or `None` before `init`.
pub fn get_token(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Token)
}

/// Return `true` once `init` has stored a token address.
pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Token)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable config and the initial mutable state for a
/// new campaign.
pub fn save_project(env: &Env, config: &ProjectConfig, state: &ProjectState) {
    let config_key = DataKey::ProjConfig(config.id);
    let state_key = DataKey::ProjState(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Project` by combining config and state.
/// Returns `None` if the campaign does not exist.
pub fn load_project(env: &Env, id: u64) -> Option<Project> {
    let config = load_project_config(env, id)?;
    let state = load_project_state(env, id)?;
    Some(Project {
        id: config.id,
        creator: config.creator,
        goal: config.goal,
        deadline: config.deadline,
        current_amount: state.current_amount,
        claimed: state.claimed,
        funders_count: state.funders_count,
    })
}

/// Load only the immutable campaign configuration.
pub fn load_project_config(env: &Env, id: u64) -> Option<ProjectConfig> {
    let key = DataKey::ProjConfig(id);
    let config: Option<ProjectConfig> = env.storage().persistent().get(&key);
    if config.is_some() {
        bump_persistent(env, &key);
    }
    config
}

/// Load only the mutable campaign state.
pub fn load_project_state(env: &Env, id: u64) -> Option<ProjectState> {
    let key = DataKey::ProjState(id);
    let state: Option<ProjectState> = env.storage().persistent().get(&key);
    if state.is_some() {
        bump_persistent(env, &key);
    }
    state
}

/// Save only the mutable campaign state (optimized for the frequent writes).
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Load a funder's live contribution; zero when no entry exists.
pub fn load_contribution(env: &Env, id: u64, funder: &Address) -> i128 {
    let key = DataKey::Contribution(id, funder.clone());
    match env.storage().persistent().get(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Save a funder's live contribution; a zero amount removes the entry.
pub fn save_contribution(env: &Env, id: u64, funder: &Address, amount: i128) {
    let key = DataKey::Contribution(id, funder.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        bump_persistent(env, &key);
    }
}
