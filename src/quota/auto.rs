//! Even split with rotating surplus.

use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{GroupingError, GroupingResult};
use crate::models::{Level, QuotaPlan, Roster};

/// Splits `count` students evenly across `groups` groups.
///
/// Every group receives `count / groups`; the `count % groups` surplus
/// students go one each to groups `rotation_offset`, `rotation_offset + 1`,
/// ... (mod `groups`). Each value is `base` or `base + 1` and the values sum
/// to `count`.
///
/// # Panics
/// If `groups` is zero. Callers taking a group count from outside the
/// crate check it first ([`GroupingError::InvalidGroupCount`]).
///
/// # Example
///
/// ```
/// use u_groups::quota::split;
///
/// assert_eq!(split(10, 3, 0), vec![4, 3, 3]);
/// assert_eq!(split(10, 3, 1), vec![3, 4, 3]);
/// assert_eq!(split(11, 3, 2), vec![4, 3, 4]);
/// ```
pub fn split(count: usize, groups: usize, rotation_offset: usize) -> Vec<usize> {
    let base = count / groups;
    let remainder = count % groups;
    let mut quotas = vec![base; groups];
    for i in 0..remainder {
        quotas[(i + rotation_offset) % groups] += 1;
    }
    quotas
}

/// Builds a plan from level populations.
///
/// Levels are split in natural order; the `i`-th level uses rotation
/// offset `i`.
pub fn plan_from_counts(
    level_counts: &BTreeMap<Level, usize>,
    group_count: usize,
) -> GroupingResult<QuotaPlan> {
    if group_count == 0 {
        return Err(GroupingError::InvalidGroupCount);
    }

    let mut plan = QuotaPlan::new();
    for (index, (level, &count)) in level_counts.iter().enumerate() {
        let row = split(count, group_count, index);
        debug!(level = %level, count, ?row, "auto quota");
        plan.insert(level.clone(), row);
    }
    Ok(plan)
}

/// Builds a balanced plan for every level of the roster.
///
/// # Example
///
/// ```
/// use u_groups::models::{Level, Roster, Student};
/// use u_groups::quota::auto_plan;
///
/// let roster = Roster::from_students(
///     (0..10).map(|i| Student::new(format!("N{i}"), "P", "601", "A")).collect(),
/// );
/// let plan = auto_plan(&roster, 3).unwrap();
/// assert_eq!(plan.row(&Level::new("A")), Some(&[4, 3, 3][..]));
/// ```
pub fn auto_plan(roster: &Roster, group_count: usize) -> GroupingResult<QuotaPlan> {
    plan_from_counts(&roster.level_counts(), group_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Student;

    #[test]
    fn test_split_sum_and_spread() {
        for groups in 1..=7 {
            for count in 0..=40 {
                for offset in 0..10 {
                    let q = split(count, groups, offset);
                    assert_eq!(q.len(), groups);
                    assert_eq!(q.iter().sum::<usize>(), count);
                    let max = *q.iter().max().unwrap();
                    let min = *q.iter().min().unwrap();
                    assert!(max - min <= 1, "split({count}, {groups}, {offset}) = {q:?}");
                }
            }
        }
    }

    #[test]
    fn test_split_rotation_is_cyclic() {
        for groups in 1..=6 {
            for count in 0..=20 {
                let reference = split(count, groups, 0);
                for offset in 0..(2 * groups) {
                    let rotated = split(count, groups, offset);
                    let mut expected = reference.clone();
                    expected.rotate_right(offset % groups);
                    assert_eq!(rotated, expected);
                }
            }
        }
    }

    #[test]
    fn test_split_examples() {
        assert_eq!(split(10, 3, 0), vec![4, 3, 3]);
        assert_eq!(split(10, 3, 1), vec![3, 4, 3]);
        assert_eq!(split(10, 3, 2), vec![3, 3, 4]);
        assert_eq!(split(10, 3, 3), vec![4, 3, 3]);
        assert_eq!(split(0, 4, 1), vec![0, 0, 0, 0]);
        assert_eq!(split(2, 4, 3), vec![1, 0, 0, 1]);
        assert_eq!(split(5, 1, 9), vec![5]);
    }

    #[test]
    #[should_panic]
    fn test_split_zero_groups_panics() {
        split(3, 0, 0);
    }

    #[test]
    fn test_auto_plan_rotates_by_level() {
        let mut students = Vec::new();
        for level in ["1", "2", "3"] {
            for i in 0..4 {
                students.push(Student::new(format!("{level}-{i}"), "P", "601", level));
            }
        }
        let roster = Roster::from_students(students);
        let plan = auto_plan(&roster, 3).unwrap();

        assert_eq!(plan.row(&Level::new("1")), Some(&[2, 1, 1][..]));
        assert_eq!(plan.row(&Level::new("2")), Some(&[1, 2, 1][..]));
        assert_eq!(plan.row(&Level::new("3")), Some(&[1, 1, 2][..]));
        assert_eq!(plan.group_totals(), vec![4, 4, 4]);
    }

    #[test]
    fn test_auto_plan_sums_to_population() {
        let roster = Roster::from_students(
            (0..10)
                .map(|i| Student::new(format!("N{i}"), "P", "601", "A"))
                .collect(),
        );
        let plan = auto_plan(&roster, 3).unwrap();
        let mut row = plan.row(&Level::new("A")).unwrap().to_vec();
        assert_eq!(row.iter().sum::<usize>(), 10);
        row.sort_unstable();
        assert_eq!(row, vec![3, 3, 4]);
    }

    #[test]
    fn test_auto_plan_zero_groups() {
        let roster = Roster::from_students(vec![Student::new("A", "B", "601", "1")]);
        assert_eq!(auto_plan(&roster, 0), Err(GroupingError::InvalidGroupCount));
    }

    #[test]
    fn test_auto_plan_empty_roster() {
        let plan = auto_plan(&Roster::default(), 3).unwrap();
        assert!(plan.is_empty());
    }
}
