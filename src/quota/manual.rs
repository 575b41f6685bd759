//! Hand-entered quotas.

use std::collections::BTreeMap;
use tracing::debug;

use super::auto::{plan_from_counts, split};
use crate::error::{GroupingError, GroupingResult};
use crate::models::{Level, QuotaPlan};
use crate::validation::validate_plan;

/// Partially filled quota table, one row of optional cells per level.
///
/// # Completion rules
/// - A cell that is `Some(n)` fixes group `i`'s quota. `n` must lie in
///   `0..=population`.
/// - Blank cells (and cells missing at the end of a row) share what is
///   left: `base = rest / blanks`, and the first `rest % blanks` blanks get
///   one more.
/// - A level with no row is split automatically, with the same rotation it
///   would get from [`auto_plan`](super::auto_plan).
/// - A table with no filled cell at all is exactly the automatic plan.
///
/// The completed plan is always run through
/// [`validate_plan`](crate::validation::validate_plan).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualQuotas {
    rows: BTreeMap<Level, Vec<Option<i64>>>,
}

impl ManualQuotas {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cells for a level.
    pub fn with_row(mut self, level: impl Into<Level>, cells: Vec<Option<i64>>) -> Self {
        self.insert(level, cells);
        self
    }

    /// Sets the cells for a level.
    pub fn insert(&mut self, level: impl Into<Level>, cells: Vec<Option<i64>>) {
        self.rows.insert(level.into(), cells);
    }

    /// Whether no cell holds a value.
    pub fn is_blank(&self) -> bool {
        self.rows.values().flatten().all(Option::is_none)
    }

    /// Completes the table into a validated plan.
    ///
    /// # Errors
    /// - [`GroupingError::InvalidGroupCount`] if `group_count` is zero
    /// - [`GroupingError::UnknownLevel`] for a row whose level has no students
    /// - [`GroupingError::InvalidQuotaValue`] for an out-of-range cell, or
    ///   when the filled cells of a row exceed its population
    /// - [`GroupingError::PlanMismatch`] if the completed plan fails validation
    pub fn resolve(
        &self,
        level_counts: &BTreeMap<Level, usize>,
        group_count: usize,
    ) -> GroupingResult<QuotaPlan> {
        if group_count == 0 {
            return Err(GroupingError::InvalidGroupCount);
        }
        if let Some(level) = self.rows.keys().find(|l| !level_counts.contains_key(*l)) {
            return Err(GroupingError::UnknownLevel(level.to_string()));
        }

        let plan = if self.is_blank() {
            plan_from_counts(level_counts, group_count)?
        } else {
            let mut plan = QuotaPlan::new();
            for (index, (level, &population)) in level_counts.iter().enumerate() {
                let row = match self.rows.get(level) {
                    Some(cells) => complete_row(level, population, cells, group_count)?,
                    None => split(population, group_count, index),
                };
                debug!(level = %level, population, ?row, "manual quota");
                plan.insert(level.clone(), row);
            }
            plan
        };

        validate_plan(&plan, level_counts, group_count)?;
        Ok(plan)
    }
}

fn complete_row(
    level: &Level,
    population: usize,
    cells: &[Option<i64>],
    group_count: usize,
) -> GroupingResult<Vec<usize>> {
    let invalid = |value: i64| GroupingError::InvalidQuotaValue {
        level: level.to_string(),
        value,
        population,
    };

    let width = cells.len().max(group_count);
    let mut fixed: Vec<Option<usize>> = Vec::with_capacity(width);
    let mut given: usize = 0;

    for cell in cells.iter().copied().chain(std::iter::repeat(None)).take(width) {
        match cell {
            Some(value) => {
                let quota = usize::try_from(value)
                    .ok()
                    .filter(|&q| q <= population)
                    .ok_or_else(|| invalid(value))?;
                given += quota;
                fixed.push(Some(quota));
            }
            None => fixed.push(None),
        }
    }

    if given > population {
        return Err(invalid(i64::try_from(given).unwrap_or(i64::MAX)));
    }

    let blanks = fixed.iter().filter(|c| c.is_none()).count();
    let rest = population - given;
    let (base, surplus) = if blanks == 0 {
        (0, 0)
    } else {
        (rest / blanks, rest % blanks)
    };

    let mut blank_index = 0;
    let row = fixed
        .into_iter()
        .map(|cell| {
            cell.unwrap_or_else(|| {
                let extra = usize::from(blank_index < surplus);
                blank_index += 1;
                base + extra
            })
        })
        .collect();
    Ok(row)
}
