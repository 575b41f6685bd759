//! Student model.
//!
//! A student is identified by the triple (last name, first name, class
//! label). There is no surrogate ID: the triple is the stable key used to
//! carry history from one period to the next.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Academic level (grade band, ability tier, ...).
///
/// # Ordering
/// Natural order: two labels that both parse as integers compare
/// numerically, integer labels sort before non-numeric ones, everything
/// else compares lexicographically. Equal numeric values fall back to the
/// raw string so the order stays total (`"01"` and `"1"` are distinct).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(String);

impl Level {
    /// Creates a level from its label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Raw label.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Level {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identity key of a student: (last name, first name, class label).
///
/// Compared by exact string equality; no fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentKey {
    /// Last name.
    pub last_name: String,
    /// First name.
    pub first_name: String,
    /// Class label (e.g. "601").
    pub class_label: String,
}

impl StudentKey {
    /// Creates a key.
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        class_label: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            class_label: class_label.into(),
        }
    }
}

impl fmt::Display for StudentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.last_name, self.first_name, self.class_label)
    }
}

/// One roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Identity key.
    pub key: StudentKey,
    /// Level the student belongs to. Never empty once loaded.
    pub level: Level,
    /// Remaining columns by header, kept verbatim (history cells included).
    pub fields: BTreeMap<String, String>,
}

impl Student {
    /// Creates a student with no extra fields.
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        class_label: impl Into<String>,
        level: impl Into<Level>,
    ) -> Self {
        Self {
            key: StudentKey::new(last_name, first_name, class_label),
            level: level.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets an extra column value.
    pub fn with_field(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(header.into(), value.into());
        self
    }

    /// Value of an extra column, if present.
    pub fn field(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    /// Last name.
    pub fn last_name(&self) -> &str {
        &self.key.last_name
    }

    /// Class label.
    pub fn class_label(&self) -> &str {
        &self.key.class_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_natural_order() {
        let mut levels: Vec<Level> = ["10", "2", "B", "1", "A"]
            .into_iter()
            .map(Level::from)
            .collect();
        levels.sort();
        let labels: Vec<&str> = levels.iter().map(Level::as_str).collect();
        assert_eq!(labels, vec!["1", "2", "10", "A", "B"]);
    }

    #[test]
    fn test_level_numeric_tie_is_total() {
        let a = Level::new("01");
        let b = Level::new("1");
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn test_student_builder() {
        let s = Student::new("Dupont", "Alice", "601", "3").with_field("Groupe Période 1", "2");
        assert_eq!(s.key, StudentKey::new("Dupont", "Alice", "601"));
        assert_eq!(s.level, Level::new("3"));
        assert_eq!(s.field("Groupe Période 1"), Some("2"));
        assert_eq!(s.field("missing"), None);
        assert_eq!(s.last_name(), "Dupont");
        assert_eq!(s.class_label(), "601");
    }

    #[test]
    fn test_key_equality_is_exact() {
        let a = StudentKey::new("Durand", "Chloé", "601");
        let b = StudentKey::new("Durand", "Chloe", "601");
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "Durand Chloé (601)");
    }

    #[test]
    fn test_level_serializes_as_string() {
        let json = serde_json::to_string(&Level::new("5e")).unwrap();
        assert_eq!(json, "\"5e\"");
    }
}
