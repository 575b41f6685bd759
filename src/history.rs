//! Assignment history.
//!
//! Each past period leaves one column in the roster, headed
//! `Groupe Période <N>`, holding the group each student was in. Headers
//! come from hand-edited files, so matching is done on a normalized form:
//! accents stripped, lower-cased, trimmed, inner whitespace collapsed.
//!
//! Cells are equally unreliable. A cell that does not hold an integer is
//! treated as "no record" for that period, never as an error.

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Roster, StudentKey};

/// Group numbers each student has already occupied.
pub type History = HashMap<StudentKey, BTreeSet<usize>>;

static PERIOD_HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^groupe\s*periode\s*(\d+)\b").expect("Invalid regex pattern")
});

/// Normalizes a column label for matching.
///
/// Applies NFKD decomposition and drops every non-ASCII code point (which
/// removes combining accents), lower-cases, trims, and collapses runs of
/// whitespace into a single space.
///
/// ```
/// use u_groups::history::normalize_label;
///
/// assert_eq!(normalize_label("  Groupe   PÉRIODE\t2 "), "groupe periode 2");
/// ```
pub fn normalize_label(label: &str) -> String {
    let ascii: String = label.nfkd().filter(char::is_ascii).collect();
    ascii
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Period number encoded in a history column header, if it is one.
///
/// ```
/// use u_groups::history::period_of_label;
///
/// assert_eq!(period_of_label("Groupe Période 3"), Some(3));
/// assert_eq!(period_of_label("groupe periode12"), Some(12));
/// assert_eq!(period_of_label("Niveau"), None);
/// ```
pub fn period_of_label(label: &str) -> Option<u32> {
    let normalized = normalize_label(label);
    PERIOD_HEADER_PATTERN
        .captures(&normalized)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Header written for a new period column.
pub fn period_header(period: u32) -> String {
    format!("Groupe Période {period}")
}

/// Parses a history cell into a group number.
///
/// Accepts plain integers (`"2"`, `" +2 "`) and integral decimals as
/// produced by spreadsheet round trips (`"2.0"`). Anything else, including
/// empty cells and negative numbers, yields `None`.
pub fn parse_group_cell(cell: &str) -> Option<usize> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<usize>() {
        return Some(n);
    }
    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Some(value as usize)
    } else {
        None
    }
}

/// Derives, per student, the set of groups occupied in any past period.
///
/// Every student in the roster gets an entry, possibly empty. Rows sharing
/// an identity key are merged.
pub fn extract_history(roster: &Roster) -> History {
    let columns = roster.history_columns();
    let mut history = History::with_capacity(roster.len());

    for student in roster.students() {
        let groups = history.entry(student.key.clone()).or_default();
        for column in columns {
            if let Some(group) = student.field(&column.header).and_then(parse_group_cell) {
                groups.insert(group);
            }
        }
    }

    history
}
