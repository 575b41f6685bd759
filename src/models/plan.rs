//! Quota plan model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Level;

/// Target group sizes per level.
///
/// Row `plan[L][g - 1]` is the number of level-`L` students group `g`
/// should receive. Rows are kept in natural level order, which is also the
/// order the engine processes levels in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaPlan {
    rows: BTreeMap<Level, Vec<usize>>,
}

impl QuotaPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the row for a level.
    pub fn with_row(mut self, level: impl Into<Level>, quotas: Vec<usize>) -> Self {
        self.insert(level, quotas);
        self
    }

    /// Adds or replaces the row for a level.
    pub fn insert(&mut self, level: impl Into<Level>, quotas: Vec<usize>) {
        self.rows.insert(level.into(), quotas);
    }

    /// Row for a level.
    pub fn row(&self, level: &Level) -> Option<&[usize]> {
        self.rows.get(level).map(Vec::as_slice)
    }

    /// Rows in level order.
    pub fn rows(&self) -> impl Iterator<Item = (&Level, &[usize])> {
        self.rows.iter().map(|(l, q)| (l, q.as_slice()))
    }

    /// Levels in order.
    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.rows.keys()
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the plan has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all quotas.
    pub fn total(&self) -> usize {
        self.rows.values().flatten().sum()
    }

    /// Planned size of each group across all levels.
    ///
    /// Length is the longest row; shorter rows contribute zeros.
    pub fn group_totals(&self) -> Vec<usize> {
        let width = self.rows.values().map(Vec::len).max().unwrap_or(0);
        let mut totals = vec![0; width];
        for row in self.rows.values() {
            for (total, quota) in totals.iter_mut().zip(row) {
                *total += quota;
            }
        }
        totals
    }
}
