//! Group and allocation (solution) models.
//!
//! An allocation is the output of one run: `group_count` groups that
//! partition the placed students, plus the students that could not be
//! placed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Level, Student, StudentKey};

/// A working group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Group label, 1-based.
    pub number: usize,
    /// Members in placement order.
    pub members: Vec<Student>,
}

impl Group {
    /// Creates an empty group.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            members: Vec::new(),
        }
    }

    /// Adds a member.
    pub fn with_member(mut self, student: Student) -> Self {
        self.members.push(student);
        self
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of members at a level.
    pub fn count_at(&self, level: &Level) -> usize {
        self.members.iter().filter(|s| &s.level == level).count()
    }

    /// Whether a student with this key is a member.
    pub fn contains(&self, key: &StudentKey) -> bool {
        self.members.iter().any(|s| &s.key == key)
    }

    /// Members sorted by last name, then first name, for display and export.
    pub fn sorted_by_name(&self) -> Vec<&Student> {
        let mut members: Vec<&Student> = self.members.iter().collect();
        members.sort_by(|a, b| {
            a.key
                .last_name
                .cmp(&b.key.last_name)
                .then_with(|| a.key.first_name.cmp(&b.key.first_name))
        });
        members
    }
}

/// A student the engine could not place.
///
/// Only happens when no group has remaining capacity for the student's
/// level, which a validated plan rules out. Gaps point at a plan or
/// bookkeeping bug and are reported, never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementGap {
    /// The unplaced student.
    pub student: StudentKey,
    /// The level being processed.
    pub level: Level,
}

/// Result of an allocation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Groups, index `g - 1` holds group `g`.
    pub groups: Vec<Group>,
    /// Students left unplaced.
    pub gaps: Vec<PlacementGap>,
}

impl Allocation {
    /// Creates an allocation from groups.
    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            groups,
            gaps: Vec::new(),
        }
    }

    /// Creates `group_count` empty groups numbered `1..=group_count`.
    pub fn empty(group_count: usize) -> Self {
        Self::new((1..=group_count).map(Group::new).collect())
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Group by 1-based number.
    pub fn group(&self, number: usize) -> Option<&Group> {
        number.checked_sub(1).and_then(|i| self.groups.get(i))
    }

    /// Total number of placed students.
    pub fn placed_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Whether every student was placed.
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Group sizes, in group order.
    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Group::len).collect()
    }

    /// Group number of the student with this key.
    pub fn group_of(&self, key: &StudentKey) -> Option<usize> {
        self.groups.iter().find(|g| g.contains(key)).map(|g| g.number)
    }

    /// Map from identity key to 1-based group number.
    pub fn placements(&self) -> HashMap<&StudentKey, usize> {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(move |s| (&s.key, g.number)))
            .collect()
    }

    /// Moves a student from one group to another.
    ///
    /// Returns `false` (and changes nothing) if either group does not
    /// exist, the groups are the same, or the student is not in `from`.
    pub fn transfer(&mut self, key: &StudentKey, from: usize, to: usize) -> bool {
        if from == to || self.group(to).is_none() {
            return false;
        }
        let Some(source) = from.checked_sub(1).and_then(|i| self.groups.get_mut(i)) else {
            return false;
        };
        let Some(pos) = source.members.iter().position(|s| &s.key == key) else {
            return false;
        };
        let student = source.members.remove(pos);
        self.groups[to - 1].members.push(student);
        true
    }
}
