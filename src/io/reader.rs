//! CSV roster loading.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::ROLE_COLUMNS;
use crate::error::RosterIoError;
use crate::models::{Level, Roster, Student, StudentKey};

/// Normalizes a header for role matching.
///
/// Replaces `é`/`É` with `e`/`E`, trims, then upper-cases the first letter
/// and lower-cases the rest.
///
/// ```
/// use u_groups::io::normalize_header;
///
/// assert_eq!(normalize_header(" PRÉNOM "), "Prenom");
/// assert_eq!(normalize_header("niveau"), "Niveau");
/// ```
pub fn normalize_header(header: &str) -> String {
    let replaced = header.replace('é', "e").replace('É', "E");
    let trimmed = replaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Decodes file bytes as UTF-8, falling back to Latin-1.
///
/// A leading byte-order mark is dropped.
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = String::from_utf8(bytes).unwrap_or_else(|err| {
        debug!("roster is not valid UTF-8, decoding as Latin-1");
        err.into_bytes().into_iter().map(char::from).collect()
    });
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Loads a roster file.
///
/// # Errors
/// - [`RosterIoError::UnsupportedFormat`] for anything but `.csv`
/// - [`RosterIoError::Io`] if the file cannot be read
/// - any error of [`parse_roster`]
pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster, RosterIoError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if extension != "csv" {
        return Err(RosterIoError::UnsupportedFormat(format!(".{extension}")));
    }

    let roster = parse_roster(&decode_text(std::fs::read(path)?))?;
    info!(
        path = %path.display(),
        students = roster.len(),
        periods = roster.history_columns().len(),
        "roster loaded"
    );
    Ok(roster)
}

/// Parses CSV text into a roster.
///
/// Missing cells (short rows) read as empty strings.
///
/// # Errors
/// - [`RosterIoError::MissingColumns`] if a role column is absent
/// - [`RosterIoError::EmptyLevel`] if a row has a blank level
/// - [`RosterIoError::Csv`] on malformed CSV
pub fn parse_roster(text: &str) -> Result<Roster, RosterIoError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let role_index = |role: &str| normalized.iter().position(|h| h == role);
    let missing: Vec<String> = ROLE_COLUMNS
        .iter()
        .filter(|&&role| role_index(role).is_none())
        .map(|role| role.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RosterIoError::MissingColumns {
            missing,
            found: normalized,
        });
    }

    // Presence checked above.
    let roles = ROLE_COLUMNS.map(|role| role_index(role).unwrap_or(0));
    let [name, first_name, class, level] = roles;

    let extra: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !roles.contains(i))
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut students = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |i: usize| record.get(i).unwrap_or("").to_string();

        let level_value = cell(level);
        if level_value.trim().is_empty() {
            return Err(RosterIoError::EmptyLevel { line: row + 2 });
        }

        let fields: BTreeMap<String, String> = extra
            .iter()
            .map(|(i, header)| (header.clone(), cell(*i)))
            .collect();

        students.push(Student {
            key: StudentKey::new(cell(name), cell(first_name), cell(class)),
            level: Level::new(level_value.trim()),
            fields,
        });
    }

    let columns = extra.into_iter().map(|(_, header)| header).collect();
    Ok(Roster::new(columns, students))
}
