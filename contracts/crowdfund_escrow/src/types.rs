//! # Types
//!
//! Shared data structures used across all modules of the escrow contract.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Project` is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`] — written once at creation; never mutated.
//! - [`ProjectState`] — written on every fund, reduction, claim, and refund.
//!
//! The public API exposes the reconstructed [`Project`] struct for convenience.
//!
//! ### Lifecycle as a derived Finite-State Machine
//!
//! [`ProjectStatus`] is never stored. It is derived per call from
//! `(now, deadline, outcome, claimed)`:
//!
//! ```text
//! Open ──deadline──► Funded ──claim──► Claimed
//!   └───deadline──► Failed  (contributors refund individually)
//! ```
//!
//! The funded/failed determination itself is stored once, in
//! [`Outcome`]: it starts as `Pending` and is frozen to `Funded` or
//! `Failed` the first time a settlement operation (`claim_funds` or
//! `claim_refund`) is evaluated after the deadline. Gating on the frozen
//! outcome instead of the live balance means a claim that zeroes
//! `current_amount` can never unblock refunds on a funded campaign.

use soroban_sdk::{contracttype, Address};

/// Frozen funded/failed determination for a campaign.
///
/// `Pending` until the first post-deadline settlement evaluation; after
/// that it never changes again.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Deadline not yet settled; no claim or refund has been evaluated.
    Pending,
    /// Final funded total met the goal; only the creator's claim may move funds.
    Funded,
    /// Final funded total fell short; contributors refund individually.
    Failed,
}

/// Derived lifecycle status of a campaign, exposed through `get_status`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProjectStatus {
    /// Accepting contributions and reductions.
    Open,
    /// Deadline passed with the goal met; awaiting the creator's claim.
    Funded,
    /// Deadline passed below goal; contributions are refundable.
    Failed,
    /// Creator has withdrawn the pooled funds. Terminal.
    Claimed,
}

/// Immutable campaign configuration, written once at creation.
///
/// Stored separately from mutable state so the frequent writes
/// (funding, reductions) touch only the small [`ProjectState`] entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub creator: Address,
    pub goal: i128,
    pub deadline: u64,
}

/// Mutable campaign state, updated on every escrow movement.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    /// Sum of all live (non-withdrawn) contributions.
    pub current_amount: i128,
    /// Amount the creator has withdrawn; zero until a successful claim.
    pub claimed: i128,
    /// Number of distinct addresses with a nonzero live contribution.
    pub funders_count: u32,
    /// Frozen funded/failed determination.
    pub outcome: Outcome,
}

/// Full representation of a campaign.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Unique identifier (auto-incremented).
    pub id: u64,
    /// Address that created the campaign and may claim the pooled funds.
    pub creator: Address,
    /// Target funding amount.
    pub goal: i128,
    /// Ledger timestamp at which the campaign closes.
    pub deadline: u64,
    /// Sum of all live contributions held in escrow.
    pub current_amount: i128,
    /// Amount withdrawn by the creator (set at most once).
    pub claimed: i128,
    /// Number of distinct funders with a nonzero live contribution.
    pub funders_count: u32,
}
