//! CSV export of rosters and groups.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::ROLE_COLUMNS;
use crate::error::RosterIoError;
use crate::models::{Allocation, Group, Roster, Student};

fn role_cells(student: &Student) -> [&str; 4] {
    [
        &student.key.last_name,
        &student.key.first_name,
        &student.key.class_label,
        student.level.as_str(),
    ]
}

/// Writes a roster: the role columns, then every extra column in order.
pub fn write_roster<W: Write>(writer: W, roster: &Roster) -> Result<(), RosterIoError> {
    let mut csv = csv::Writer::from_writer(writer);

    let header = ROLE_COLUMNS
        .iter()
        .copied()
        .chain(roster.columns().iter().map(String::as_str));
    csv.write_record(header)?;

    for student in roster.students() {
        let extra = roster
            .columns()
            .iter()
            .map(|c| student.field(c).unwrap_or(""));
        csv.write_record(role_cells(student).into_iter().chain(extra))?;
    }

    csv.flush()?;
    Ok(())
}

/// Writes a roster to a file.
pub fn save_roster(path: impl AsRef<Path>, roster: &Roster) -> Result<(), RosterIoError> {
    let file = std::fs::File::create(path)?;
    write_roster(file, roster)
}

/// Writes one group's members (role columns only), sorted by name.
pub fn write_group<W: Write>(writer: W, group: &Group) -> Result<(), RosterIoError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(ROLE_COLUMNS)?;
    for student in group.sorted_by_name() {
        csv.write_record(role_cells(student))?;
    }
    csv.flush()?;
    Ok(())
}

/// Exports an allocation under `dir`.
///
/// Creates `<classes>_Période<P>/` containing the enriched roster
/// (`<classes>_Période<P>.csv`) and one file per group
/// (`<classes>_Groupe<g>_Période<P>.csv`), where `<classes>` is
/// [`Roster::classes_label`]. Returns the created folder.
pub fn export_allocation(
    dir: impl AsRef<Path>,
    roster: &Roster,
    allocation: &Allocation,
    period: u32,
) -> Result<PathBuf, RosterIoError> {
    let classes = roster.classes_label();
    let folder = dir.as_ref().join(format!("{classes}_Période{period}"));
    std::fs::create_dir_all(&folder)?;

    save_roster(folder.join(format!("{classes}_Période{period}.csv")), roster)?;
    for group in &allocation.groups {
        let path = folder.join(format!("{classes}_Groupe{}_Période{period}.csv", group.number));
        write_group(std::fs::File::create(path)?, group)?;
    }

    info!(folder = %folder.display(), groups = allocation.group_count(), "allocation exported");
    Ok(folder)
}
