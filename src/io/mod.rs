//! Roster files.
//!
//! Reads rosters from CSV and writes the enriched roster and per-group
//! files back out. The allocation core never touches files; this module is
//! the collaborator that feeds it a [`Roster`](crate::models::Roster) and
//! stores the resulting groups.
//!
//! # Columns
//!
//! Four role columns are required, matched after header normalization
//! (`é` → `e`, trimmed, capitalized): [`NAME_COLUMN`],
//! [`FIRST_NAME_COLUMN`], [`CLASS_COLUMN`], [`LEVEL_COLUMN`]. All other
//! columns are carried through untouched.

mod reader;
mod writer;

pub use reader::{decode_text, load_roster, normalize_header, parse_roster};
pub use writer::{export_allocation, save_roster, write_group, write_roster};

/// Last-name column.
pub const NAME_COLUMN: &str = "Nom";
/// First-name column.
pub const FIRST_NAME_COLUMN: &str = "Prenom";
/// Class column.
pub const CLASS_COLUMN: &str = "Classe";
/// Level column.
pub const LEVEL_COLUMN: &str = "Niveau";

/// Role columns, in output order.
pub const ROLE_COLUMNS: [&str; 4] = [NAME_COLUMN, FIRST_NAME_COLUMN, CLASS_COLUMN, LEVEL_COLUMN];
