//! Roster model.
//!
//! A roster is the full list of students for one allocation run, plus the
//! typed schema of its history columns. History columns are detected once,
//! when the roster is built, instead of being pattern-matched on every
//! access.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

use super::{Allocation, Level, Student, StudentKey};
use crate::history;

/// A detected "group at period N" column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryColumn {
    /// Header exactly as it appears in the roster.
    pub header: String,
    /// Period number parsed from the header.
    pub period: u32,
}

/// The set of students to allocate.
///
/// # Columns
/// Besides the four role columns (name, first name, class, level) a roster
/// carries any number of extra columns, kept in their original order for
/// export. Extra columns whose normalized header reads
/// `groupe periode <N>` form the history schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    columns: Vec<String>,
    history_columns: Vec<HistoryColumn>,
    students: Vec<Student>,
}

impl Roster {
    /// Creates a roster with the given extra column headers.
    pub fn new(columns: Vec<String>, students: Vec<Student>) -> Self {
        let history_columns = detect_history_columns(&columns);
        Self {
            columns,
            history_columns,
            students,
        }
    }

    /// Creates a roster, deriving the extra columns from the students' fields.
    pub fn from_students(students: Vec<Student>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for student in &students {
            for header in student.fields.keys() {
                if !columns.contains(header) {
                    columns.push(header.clone());
                }
            }
        }
        Self::new(columns, students)
    }

    /// Adds a student. Unknown field headers become new columns.
    pub fn with_student(mut self, student: Student) -> Self {
        for header in student.fields.keys() {
            if !self.columns.contains(header) {
                self.columns.push(header.clone());
            }
        }
        self.history_columns = detect_history_columns(&self.columns);
        self.students.push(student);
        self
    }

    /// All students, in roster order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Extra column headers, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Detected history columns, in column order.
    pub fn history_columns(&self) -> &[HistoryColumn] {
        &self.history_columns
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the roster has no students.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Students at a given level, in roster order.
    pub fn students_at<'a>(&'a self, level: &'a Level) -> impl Iterator<Item = &'a Student> + 'a {
        self.students.iter().filter(move |s| &s.level == level)
    }

    /// Number of students per level, in natural level order.
    pub fn level_counts(&self) -> BTreeMap<Level, usize> {
        let mut counts = BTreeMap::new();
        for student in &self.students {
            *counts.entry(student.level.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct class labels, sorted.
    pub fn class_labels(&self) -> BTreeSet<&str> {
        self.students.iter().map(Student::class_label).collect()
    }

    /// Class labels joined with `-` (e.g. `"601-602"`).
    pub fn classes_label(&self) -> String {
        self.class_labels().into_iter().collect::<Vec<_>>().join("-")
    }

    /// Default number of groups: one per class, plus one.
    pub fn default_group_count(&self) -> usize {
        self.class_labels().len() + 1
    }

    /// Identity keys shared by more than one row, sorted.
    pub fn duplicate_keys(&self) -> Vec<&StudentKey> {
        let mut counts: BTreeMap<&StudentKey, usize> = BTreeMap::new();
        for student in &self.students {
            *counts.entry(&student.key).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(key, _)| key)
            .collect()
    }

    /// Next unused period number: 1 + the highest recorded period, or 1.
    pub fn next_period(&self) -> u32 {
        self.history_columns
            .iter()
            .map(|c| c.period)
            .max()
            .map_or(1, |p| p + 1)
    }

    /// Records an allocation as a new history column.
    ///
    /// Appends a `Groupe Période <P>` column (P = [`Self::next_period`])
    /// holding each placed student's 1-based group number. Rows are
    /// matched by identity key, so every row sharing a key receives the
    /// same value, and a duplicated key placed in two groups keeps only one
    /// of them (logged as a warning). Unplaced students get an empty cell.
    ///
    /// Returns the recorded period.
    pub fn record_allocation(&mut self, allocation: &Allocation) -> u32 {
        for key in self.duplicate_keys() {
            let groups: Vec<usize> = allocation
                .groups
                .iter()
                .filter(|g| g.contains(key))
                .map(|g| g.number)
                .collect();
            if groups.len() > 1 {
                warn!(
                    student = %key,
                    ?groups,
                    "duplicate student placed in several groups; recorded column keeps one"
                );
            }
        }

        let period = self.next_period();
        let header = history::period_header(period);
        let placements: HashMap<&StudentKey, usize> = allocation.placements();

        for student in &mut self.students {
            let value = placements
                .get(&student.key)
                .map(|g| g.to_string())
                .unwrap_or_default();
            student.fields.insert(header.clone(), value);
        }

        self.columns.push(header.clone());
        self.history_columns.push(HistoryColumn { header, period });
        period
    }
}

fn detect_history_columns(columns: &[String]) -> Vec<HistoryColumn> {
    columns
        .iter()
        .filter_map(|header| {
            history::period_of_label(header).map(|period| HistoryColumn {
                header: header.clone(),
                period,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Group;

    fn sample_roster() -> Roster {
        Roster::from_students(vec![
            Student::new("Dupont", "Alice", "601", "2").with_field("Groupe Periode 1", "1"),
            Student::new("Martin", "Bob", "602", "1").with_field("Groupe Periode 1", "2"),
            Student::new("Petit", "Emma", "601", "10").with_field("Groupe Periode 1", ""),
            Student::new("Bernard", "David", "602", "1").with_field("Remarque", "x"),
        ])
    }

    #[test]
    fn test_level_counts_natural_order() {
        let roster = sample_roster();
        let counts: Vec<(String, usize)> = roster
            .level_counts()
            .into_iter()
            .map(|(l, n)| (l.to_string(), n))
            .collect();
        assert_eq!(
            counts,
            vec![("1".into(), 2), ("2".into(), 1), ("10".into(), 1)]
        );
    }

    #[test]
    fn test_class_labels() {
        let roster = sample_roster();
        assert_eq!(roster.classes_label(), "601-602");
        assert_eq!(roster.default_group_count(), 3);
    }

    #[test]
    fn test_history_columns_detected() {
        let roster = sample_roster();
        assert_eq!(roster.columns().len(), 2);
        assert_eq!(roster.history_columns().len(), 1);
        assert_eq!(roster.history_columns()[0].period, 1);
        assert_eq!(roster.next_period(), 2);
    }

    #[test]
    fn test_next_period_without_history() {
        let roster = Roster::from_students(vec![Student::new("A", "B", "601", "1")]);
        assert_eq!(roster.next_period(), 1);
        assert_eq!(Roster::default().next_period(), 1);
    }

    #[test]
    fn test_next_period_uses_max() {
        let roster = Roster::new(
            vec![
                "Groupe Période 3".into(),
                "groupe  periode 1".into(),
                "Notes".into(),
            ],
            vec![],
        );
        assert_eq!(roster.next_period(), 4);
    }

    #[test]
    fn test_with_student_extends_columns() {
        let roster = Roster::default()
            .with_student(Student::new("A", "B", "601", "1").with_field("GROUPE PÉRIODE 2", "1"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.next_period(), 3);
    }

    #[test]
    fn test_record_allocation() {
        let mut roster = sample_roster();
        let s0 = roster.students()[0].clone();
        let s1 = roster.students()[1].clone();
        let allocation = Allocation::new(vec![
            Group::new(1).with_member(s1.clone()),
            Group::new(2).with_member(s0.clone()),
        ]);

        let period = roster.record_allocation(&allocation);
        assert_eq!(period, 2);
        assert_eq!(roster.next_period(), 3);

        let header = "Groupe Période 2";
        assert_eq!(roster.students()[0].field(header), Some("2"));
        assert_eq!(roster.students()[1].field(header), Some("1"));
        assert_eq!(roster.students()[2].field(header), Some(""));
        assert_eq!(roster.columns().last().map(String::as_str), Some(header));
    }

    #[test]
    fn test_duplicate_keys() {
        assert!(sample_roster().duplicate_keys().is_empty());

        let twin = Student::new("Lemoine", "Franck", "602", "3");
        let roster = Roster::from_students(vec![
            twin.clone(),
            Student::new("Lemoine", "Franck", "601", "3"),
            twin.clone(),
        ]);
        assert_eq!(roster.duplicate_keys(), vec![&twin.key]);
    }

    #[test]
    fn test_record_allocation_split_duplicates_stay_consistent() {
        let twin = Student::new("Lemoine", "Franck", "602", "3");
        let mut roster = Roster::from_students(vec![twin.clone(), twin.clone()]);
        let allocation = Allocation::new(vec![
            Group::new(1).with_member(twin.clone()),
            Group::new(2).with_member(twin),
        ]);

        roster.record_allocation(&allocation);
        let cells: Vec<Option<&str>> = roster
            .students()
            .iter()
            .map(|s| s.field("Groupe Période 1"))
            .collect();
        assert_eq!(cells[0], cells[1]);
        assert!(matches!(cells[0], Some("1") | Some("2")));
    }

    #[test]
    fn test_record_allocation_matches_duplicate_keys() {
        let twin = Student::new("Lemoine", "Franck", "602", "3");
        let mut roster = Roster::from_students(vec![twin.clone(), twin.clone()]);
        let allocation = Allocation::new(vec![Group::new(1), Group::new(2).with_member(twin)]);

        roster.record_allocation(&allocation);
        assert!(roster
            .students()
            .iter()
            .all(|s| s.field("Groupe Période 1") == Some("2")));
    }
}
