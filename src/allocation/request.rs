//! End-to-end allocation run: plan, validate, assign.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GroupAllocator;
use crate::error::{GroupingError, GroupingResult};
use crate::models::{Allocation, QuotaPlan, Roster};
use crate::quota::ManualQuotas;

/// Input container for an allocation run.
///
/// Defaults: one group per class plus one, an automatic quota plan, and a
/// fresh random source.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    /// Students to allocate.
    pub roster: Roster,
    /// Number of groups. `None` = [`Roster::default_group_count`].
    pub group_count: Option<usize>,
    /// Hand-entered quotas. Blank = automatic plan.
    pub quotas: ManualQuotas,
    /// Seed for a reproducible run.
    pub seed: Option<u64>,
}

/// Result of an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// The validated plan that drove the assignment.
    pub plan: QuotaPlan,
    /// The groups produced.
    pub allocation: Allocation,
}

impl AllocationRequest {
    /// Creates a request with default settings.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            group_count: None,
            quotas: ManualQuotas::new(),
            seed: None,
        }
    }

    /// Sets the number of groups.
    pub fn with_group_count(mut self, group_count: usize) -> Self {
        self.group_count = Some(group_count);
        self
    }

    /// Sets hand-entered quotas.
    pub fn with_quotas(mut self, quotas: ManualQuotas) -> Self {
        self.quotas = quotas;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Effective number of groups.
    pub fn group_count(&self) -> usize {
        self.group_count
            .unwrap_or_else(|| self.roster.default_group_count())
    }

    /// Builds and validates the quota plan.
    ///
    /// Fails fast: no partial plan is ever returned.
    pub fn plan(&self) -> GroupingResult<QuotaPlan> {
        let group_count = self.group_count();
        if group_count == 0 {
            return Err(GroupingError::InvalidGroupCount);
        }
        let plan = self.quotas.resolve(&self.roster.level_counts(), group_count)?;
        debug!(group_count, levels = plan.len(), "quota plan ready");
        Ok(plan)
    }

    /// Runs the allocation with the configured random source.
    ///
    /// # Example
    ///
    /// ```
    /// use u_groups::allocation::AllocationRequest;
    /// use u_groups::models::{Roster, Student};
    ///
    /// let roster = Roster::from_students(vec![
    ///     Student::new("Dupont", "Alice", "601", "1"),
    ///     Student::new("Martin", "Bob", "602", "1"),
    ///     Student::new("Petit", "Emma", "601", "2"),
    /// ]);
    /// let outcome = AllocationRequest::new(roster).with_seed(1).run().unwrap();
    /// assert_eq!(outcome.allocation.group_count(), 3);
    /// assert_eq!(outcome.allocation.placed_count(), 3);
    /// ```
    pub fn run(&self) -> GroupingResult<AllocationOutcome> {
        match self.seed {
            Some(seed) => self.run_with_rng(&mut StdRng::seed_from_u64(seed)),
            None => self.run_with_rng(&mut rand::rng()),
        }
    }

    /// Runs the allocation with an explicit random source.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> GroupingResult<AllocationOutcome> {
        let plan = self.plan()?;
        let allocation = GroupAllocator::new(self.group_count()).assign(&self.roster, &plan, rng);
        Ok(AllocationOutcome { plan, allocation })
    }
}
