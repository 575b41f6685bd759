//! Novelty-first randomized group assignment.
//!
//! # Algorithm
//!
//! For each level present in the roster, in natural level order:
//! 1. Collect the level's students and shuffle them.
//! 2. Copy the level's quota row as the remaining capacity. A level with
//!    no row in the plan has no capacity at all.
//! 3. For each student, compute the eligible groups from their history and
//!    the remaining capacity, pick one uniformly at random, place the
//!    student there and decrement that group's capacity.
//! 4. A student with no eligible group is recorded as a placement gap and
//!    skipped; the rest of the level carries on.
//!
//! Randomness drives both the processing order and the choice among ties,
//! so no name or class systematically goes first. Group sizes are fully
//! determined by the plan; membership is not, unless the random source is
//! seeded.
//!
//! # Complexity
//! O(n * g) where n = students, g = groups.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::selector::eligible_groups;
use crate::history::{extract_history, History};
use crate::models::{Allocation, PlacementGap, QuotaPlan, Roster, Student};

/// Randomized, history-aware group allocator.
///
/// Trusts its plan: pass it through
/// [`validate_plan`](crate::validation::validate_plan) first. Each run owns
/// its capacity counters, so separate runs never share mutable state.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_groups::allocation::GroupAllocator;
/// use u_groups::models::{Roster, Student};
/// use u_groups::quota::auto_plan;
///
/// let roster = Roster::from_students(
///     (0..10).map(|i| Student::new(format!("N{i}"), "P", "601", "A")).collect(),
/// );
/// let plan = auto_plan(&roster, 3).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let allocation = GroupAllocator::new(3).assign(&roster, &plan, &mut rng);
/// assert_eq!(allocation.sizes(), vec![4, 3, 3]);
/// assert!(allocation.is_complete());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupAllocator {
    group_count: usize,
}

impl GroupAllocator {
    /// Creates an allocator for `group_count` groups.
    pub fn new(group_count: usize) -> Self {
        Self { group_count }
    }

    /// Number of groups produced.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Assigns the roster's students to groups, reading history from the
    /// roster's period columns.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        plan: &QuotaPlan,
        rng: &mut R,
    ) -> Allocation {
        let history = extract_history(roster);
        self.assign_with_history(roster, plan, &history, rng)
    }

    /// Assigns the roster's students to groups using an explicit history.
    ///
    /// Students missing from `history` are treated as having none.
    pub fn assign_with_history<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        plan: &QuotaPlan,
        history: &History,
        rng: &mut R,
    ) -> Allocation {
        let mut allocation = Allocation::empty(self.group_count);
        let no_history = BTreeSet::new();
        for key in roster.duplicate_keys() {
            warn!(student = %key, "duplicate student key; each row is allocated separately");
        }

        for level in roster.level_counts().keys() {
            let quotas = match plan.row(level) {
                Some(row) => row.to_vec(),
                None => {
                    warn!(level = %level, "level has no quota row; its students are left unplaced");
                    vec![0; self.group_count]
                }
            };
            let mut students: Vec<&Student> = roster.students_at(level).collect();
            students.shuffle(rng);
            let mut remaining = quotas.clone();

            for student in students {
                let visited = history.get(&student.key).unwrap_or(&no_history);
                let eligible = eligible_groups(visited, &remaining, self.group_count);

                match eligible.choose(rng) {
                    Some(&group) => {
                        allocation.groups[group - 1].members.push(student.clone());
                        remaining[group - 1] -= 1;
                    }
                    None => {
                        warn!(
                            student = %student.key,
                            level = %level,
                            "no group has room; student left unplaced"
                        );
                        allocation.gaps.push(PlacementGap {
                            student: student.key.clone(),
                            level: level.clone(),
                        });
                    }
                }
            }

            debug!(level = %level, ?quotas, ?remaining, "level allocated");
        }

        info!(
            groups = self.group_count,
            placed = allocation.placed_count(),
            gaps = allocation.gaps.len(),
            "allocation complete"
        );
        allocation
    }
}

/// Assigns students with a fresh random source.
///
/// Re-running on the same inputs generally yields a different, equally
/// valid grouping. Use [`GroupAllocator::assign`] with a seeded generator
/// for reproducible output.
pub fn assign(roster: &Roster, group_count: usize, plan: &QuotaPlan) -> Allocation {
    GroupAllocator::new(group_count).assign(roster, plan, &mut rand::rng())
}
