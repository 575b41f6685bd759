//! Quota planning.
//!
//! Turns level populations into a [`QuotaPlan`](crate::models::QuotaPlan):
//! how many students of each level every group should receive.
//!
//! # Algorithm
//!
//! Each level is split evenly across the groups; the `count mod groups`
//! surplus students go one each to consecutive groups starting at a
//! rotating offset. The offset is the level's position in natural level
//! order, so consecutive levels start their surplus one group further on
//! and no group habitually absorbs every level's extra student. This is a
//! fairness heuristic, not a guarantee of cross-level balance.
//!
//! Plans can also be entered by hand ([`ManualQuotas`]); blank cells are
//! completed from the remaining population.

mod auto;
mod manual;

pub use auto::{auto_plan, plan_from_counts, split};
pub use manual::ManualQuotas;
