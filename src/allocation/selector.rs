//! Candidate group selection.

use std::collections::BTreeSet;

/// Groups eligible to receive a student, as 1-based numbers in ascending
/// order.
///
/// Two-tier, novelty-first policy:
/// 1. Groups the student has never been in (`g ∉ history`) with remaining
///    capacity. If any exist, only these are returned.
/// 2. Otherwise every group with remaining capacity, visited or not.
///
/// There is no weighting beyond that: the caller picks uniformly among the
/// returned groups. An empty result means no group has room, which a
/// validated plan rules out; the caller treats it as a placement gap.
///
/// `remaining[g - 1]` is group `g`'s remaining capacity; missing entries
/// count as zero.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use u_groups::allocation::eligible_groups;
///
/// let visited = BTreeSet::from([1, 2]);
/// assert_eq!(eligible_groups(&visited, &[1, 1, 1], 3), vec![3]);
/// assert_eq!(eligible_groups(&visited, &[1, 2, 0], 3), vec![1, 2]);
/// assert!(eligible_groups(&visited, &[0, 0, 0], 3).is_empty());
/// ```
pub fn eligible_groups(
    history: &BTreeSet<usize>,
    remaining: &[usize],
    group_count: usize,
) -> Vec<usize> {
    let has_room = |g: &usize| remaining.get(g - 1).is_some_and(|&r| r > 0);

    let unvisited: Vec<usize> = (1..=group_count)
        .filter(has_room)
        .filter(|g| !history.contains(g))
        .collect();
    if !unvisited.is_empty() {
        return unvisited;
    }

    (1..=group_count).filter(has_room).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_history_returns_all_with_room() {
        let none = BTreeSet::new();
        assert_eq!(eligible_groups(&none, &[2, 0, 1], 3), vec![1, 3]);
    }

    #[test]
    fn test_prefers_unvisited() {
        let visited = BTreeSet::from([1]);
        assert_eq!(eligible_groups(&visited, &[5, 1, 1], 3), vec![2, 3]);
    }

    #[test]
    fn test_unvisited_full_falls_back_to_visited() {
        // history {1, 2}, group 3 full: fall back to visited groups with room
        let visited = BTreeSet::from([1, 2]);
        assert_eq!(eligible_groups(&visited, &[1, 1, 0], 3), vec![1, 2]);
        assert_eq!(eligible_groups(&visited, &[0, 1, 0], 3), vec![2]);
    }

    #[test]
    fn test_all_visited() {
        let visited = BTreeSet::from([1, 2, 3]);
        assert_eq!(eligible_groups(&visited, &[1, 0, 4], 3), vec![1, 3]);
    }

    #[test]
    fn test_history_outside_range_ignored() {
        let visited = BTreeSet::from([0, 7]);
        assert_eq!(eligible_groups(&visited, &[1, 1], 2), vec![1, 2]);
    }

    #[test]
    fn test_no_capacity_is_empty() {
        let visited = BTreeSet::from([2]);
        assert!(eligible_groups(&visited, &[0, 0, 0], 3).is_empty());
        assert!(eligible_groups(&visited, &[], 3).is_empty());
    }

    #[test]
    fn test_short_capacity_vector() {
        let none = BTreeSet::new();
        assert_eq!(eligible_groups(&none, &[0, 3], 4), vec![2]);
    }
}
