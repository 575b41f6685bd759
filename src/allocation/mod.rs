//! History-aware group allocation and allocation metrics.
//!
//! # Algorithm
//!
//! [`GroupAllocator`] is a greedy, randomized, novelty-first heuristic.
//! Levels are processed independently in plan order. Within a level the
//! students are shuffled, then each one goes to a uniformly random group
//! among the eligible ones (see [`eligible_groups`]): groups with room the
//! student has never been in, or, failing that, any group with room.
//!
//! It is not an optimizer. Group sizes are fixed by the quota plan, but
//! when quotas are tight a student can still land in a group they have
//! already visited even though a global reshuffle would have avoided it.
//!
//! # Summary
//!
//! [`AllocationSummary`] computes the recap table: group sizes, per-level
//! and per-class breakdowns, repeat placements and balance warnings.

mod engine;
mod request;
mod selector;
mod summary;

pub use engine::{assign, GroupAllocator};
pub use request::{AllocationOutcome, AllocationRequest};
pub use selector::eligible_groups;
pub use summary::{AllocationSummary, BalanceWarning};
