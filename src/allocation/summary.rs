//! Allocation quality metrics (recap table).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Group size | Members per group |
//! | Level breakdown | Members per group and level |
//! | Class breakdown | Members per group and class |
//! | Repeat placements | Students placed in a group already in their history |
//! | Gaps | Students left unplaced |
//!
//! Balance warnings flag empty groups and, when no group is empty, a
//! spread of more than two students between the largest and smallest
//! group.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::history::History;
use crate::models::{Allocation, Level};

/// Largest size spread tolerated before flagging imbalance.
const MAX_SIZE_SPREAD: usize = 2;

/// A balance problem in an allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceWarning {
    /// Group (1-based) has no members.
    EmptyGroup(usize),
    /// Largest and smallest group differ by more than two.
    Imbalanced {
        /// Smallest group size.
        min: usize,
        /// Largest group size.
        max: usize,
    },
}

/// Allocation recap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Members per group, in group order.
    pub group_sizes: Vec<usize>,
    /// Members per level, per group.
    pub by_level: Vec<BTreeMap<Level, usize>>,
    /// Members per class label, per group.
    pub by_class: Vec<BTreeMap<String, usize>>,
    /// Students placed in a group they had already been in.
    pub repeat_placements: usize,
    /// Students left unplaced.
    pub gap_count: usize,
    /// Balance warnings.
    pub warnings: Vec<BalanceWarning>,
}

impl AllocationSummary {
    /// Computes the recap of an allocation.
    ///
    /// # Arguments
    /// * `allocation` - The groups produced.
    /// * `history` - History the allocation was computed from (before the
    ///   new period was recorded).
    pub fn calculate(allocation: &Allocation, history: &History) -> Self {
        let group_sizes = allocation.sizes();
        let mut by_level = Vec::with_capacity(allocation.group_count());
        let mut by_class = Vec::with_capacity(allocation.group_count());
        let mut repeat_placements = 0;

        for group in &allocation.groups {
            let mut levels: BTreeMap<Level, usize> = BTreeMap::new();
            let mut classes: BTreeMap<String, usize> = BTreeMap::new();
            for member in &group.members {
                *levels.entry(member.level.clone()).or_insert(0) += 1;
                *classes.entry(member.key.class_label.clone()).or_insert(0) += 1;
                if history
                    .get(&member.key)
                    .is_some_and(|visited| visited.contains(&group.number))
                {
                    repeat_placements += 1;
                }
            }
            by_level.push(levels);
            by_class.push(classes);
        }

        let mut warnings: Vec<BalanceWarning> = allocation
            .groups
            .iter()
            .filter(|g| g.is_empty())
            .map(|g| BalanceWarning::EmptyGroup(g.number))
            .collect();
        if warnings.is_empty() {
            let min = group_sizes.iter().copied().min().unwrap_or(0);
            let max = group_sizes.iter().copied().max().unwrap_or(0);
            if max - min > MAX_SIZE_SPREAD {
                warnings.push(BalanceWarning::Imbalanced { min, max });
            }
        }
        for warning in &warnings {
            warn!(?warning, "allocation balance");
        }

        Self {
            group_sizes,
            by_level,
            by_class,
            repeat_placements,
            gap_count: allocation.gaps.len(),
            warnings,
        }
    }

    /// Whether the allocation raised no balance warning and placed everyone.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.gap_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, PlacementGap, Student, StudentKey};
    use std::collections::BTreeSet;

    fn student(name: &str, class: &str, level: &str) -> Student {
        Student::new(name, "P", class, level)
    }

    #[test]
    fn test_summary_breakdowns() {
        let allocation = Allocation::new(vec![
            Group::new(1)
                .with_member(student("a", "601", "1"))
                .with_member(student("b", "602", "1")),
            Group::new(2)
                .with_member(student("c", "601", "2"))
                .with_member(student("d", "601", "1")),
        ]);
        let summary = AllocationSummary::calculate(&allocation, &History::new());

        assert_eq!(summary.group_sizes, vec![2, 2]);
        assert_eq!(summary.by_level[0][&Level::new("1")], 2);
        assert_eq!(summary.by_level[1][&Level::new("2")], 1);
        assert_eq!(summary.by_class[1]["601"], 2);
        assert_eq!(summary.repeat_placements, 0);
        assert!(summary.is_clean());
    }

    #[test]
    fn test_repeat_placements() {
        let allocation = Allocation::new(vec![
            Group::new(1).with_member(student("a", "601", "1")),
            Group::new(2).with_member(student("b", "601", "1")),
        ]);
        let mut history = History::new();
        history.insert(StudentKey::new("a", "P", "601"), BTreeSet::from([1]));
        history.insert(StudentKey::new("b", "P", "601"), BTreeSet::from([1]));

        let summary = AllocationSummary::calculate(&allocation, &history);
        assert_eq!(summary.repeat_placements, 1);
    }

    #[test]
    fn test_empty_group_warning() {
        let allocation = Allocation::new(vec![
            Group::new(1).with_member(student("a", "601", "1")),
            Group::new(2),
        ]);
        let summary = AllocationSummary::calculate(&allocation, &History::new());
        assert_eq!(summary.warnings, vec![BalanceWarning::EmptyGroup(2)]);
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_imbalance_warning() {
        let mut big = Group::new(1);
        for i in 0..5 {
            big = big.with_member(student(&format!("x{i}"), "601", "1"));
        }
        let allocation = Allocation::new(vec![
            big,
            Group::new(2).with_member(student("y", "601", "1")),
        ]);
        let summary = AllocationSummary::calculate(&allocation, &History::new());
        assert_eq!(
            summary.warnings,
            vec![BalanceWarning::Imbalanced { min: 1, max: 5 }]
        );
    }

    #[test]
    fn test_spread_of_two_tolerated() {
        let allocation = Allocation::new(vec![
            Group::new(1)
                .with_member(student("a", "601", "1"))
                .with_member(student("b", "601", "1"))
                .with_member(student("c", "601", "1")),
            Group::new(2).with_member(student("d", "601", "1")),
        ]);
        let summary = AllocationSummary::calculate(&allocation, &History::new());
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_gaps_counted() {
        let mut allocation =
            Allocation::new(vec![Group::new(1).with_member(student("a", "601", "1"))]);
        allocation.gaps.push(PlacementGap {
            student: StudentKey::new("b", "P", "601"),
            level: Level::new("1"),
        });
        let summary = AllocationSummary::calculate(&allocation, &History::new());
        assert_eq!(summary.gap_count, 1);
        assert!(!summary.is_clean());
    }
}
