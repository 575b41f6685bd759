//! Quota plan validation.
//!
//! The single gate between a quota plan (generated or hand-edited) and the
//! allocation engine. The engine itself performs no bounds checking and
//! trusts a validated plan. Detects:
//! - Rows whose length differs from the group count
//! - Rows whose sum differs from the level's population
//! - Roster levels with no row at all
//!
//! All mismatches are collected; validation does not stop at the first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{GroupingError, GroupingResult};
use crate::models::{Level, QuotaPlan};

/// A single plan inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMismatch {
    /// Mismatch category.
    pub kind: MismatchKind,
    /// Offending level.
    pub level: String,
    /// Expected value (group count or population).
    pub expected: usize,
    /// Actual value found in the plan.
    pub actual: usize,
    /// Human-readable description.
    pub message: String,
}

/// Categories of plan mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MismatchKind {
    /// Row length differs from the group count.
    LengthMismatch,
    /// Row sum differs from the level's population.
    SumMismatch,
    /// A level present in the roster has no row.
    MissingLevel,
}

impl PlanMismatch {
    /// Creates a mismatch with a message derived from its fields.
    pub fn new(
        kind: MismatchKind,
        level: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        let level = level.into();
        let message = match kind {
            MismatchKind::LengthMismatch => {
                format!("level '{level}' must have {expected} groups, found {actual}")
            }
            MismatchKind::SumMismatch => {
                format!("level '{level}' quotas sum to {actual}, expected {expected}")
            }
            MismatchKind::MissingLevel => {
                format!("level '{level}' ({expected} students) has no quota row")
            }
        };
        Self {
            kind,
            level,
            expected,
            actual,
            message,
        }
    }
}

/// Validates a quota plan against level populations and the group count.
///
/// Checks, for every row of `plan`:
/// 1. Row length equals `group_count`
/// 2. Row sum equals `level_counts[level]` (0 for levels not in the roster)
///
/// and, for every level of `level_counts` with at least one student, that
/// the plan has a row for it.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(GroupingError::PlanMismatch)` with
/// every detected issue otherwise. A `group_count` of zero is
/// `Err(GroupingError::InvalidGroupCount)`.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use u_groups::models::{Level, QuotaPlan};
/// use u_groups::validation::validate_plan;
///
/// let counts = BTreeMap::from([(Level::new("A"), 10)]);
/// let plan = QuotaPlan::new().with_row("A", vec![4, 3, 3]);
/// assert!(validate_plan(&plan, &counts, 3).is_ok());
/// assert!(validate_plan(&plan, &counts, 4).is_err());
/// ```
pub fn validate_plan(
    plan: &QuotaPlan,
    level_counts: &BTreeMap<Level, usize>,
    group_count: usize,
) -> GroupingResult<()> {
    if group_count == 0 {
        return Err(GroupingError::InvalidGroupCount);
    }

    let mut errors = Vec::new();

    for (level, row) in plan.rows() {
        if row.len() != group_count {
            errors.push(PlanMismatch::new(
                MismatchKind::LengthMismatch,
                level.as_str(),
                group_count,
                row.len(),
            ));
        }

        let expected = level_counts.get(level).copied().unwrap_or(0);
        let actual: usize = row.iter().sum();
        if actual != expected {
            errors.push(PlanMismatch::new(
                MismatchKind::SumMismatch,
                level.as_str(),
                expected,
                actual,
            ));
        }
    }

    for (level, &count) in level_counts {
        if count > 0 && plan.row(level).is_none() {
            errors.push(PlanMismatch::new(
                MismatchKind::MissingLevel,
                level.as_str(),
                count,
                0,
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(GroupingError::PlanMismatch(errors))
    }
}
