//! Error types.
//!
//! [`GroupingError`] is the core taxonomy: everything that can stop an
//! allocation run before a group is produced. Loader and export failures
//! live in [`RosterIoError`] so the core never depends on file handling.
//!
//! Placement gaps are not errors. They are recorded per student in
//! [`Allocation::gaps`](crate::models::Allocation) and never abort a run.

use thiserror::Error;

use crate::validation::PlanMismatch;

/// Result alias for core operations.
pub type GroupingResult<T> = Result<T, GroupingError>;

/// Errors raised by quota planning and validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
    /// The requested number of groups is zero.
    #[error("group count must be at least 1")]
    InvalidGroupCount,

    /// The quota plan disagrees with the roster or the group count.
    #[error("quota plan rejected: {}", summarize(.0))]
    PlanMismatch(Vec<PlanMismatch>),

    /// A manually entered quota is negative or larger than the level.
    #[error("invalid quota {value} for level '{level}' (population {population})")]
    InvalidQuotaValue {
        /// Level the quota belongs to.
        level: String,
        /// Offending value (or sum of values).
        value: i64,
        /// Number of students at that level.
        population: usize,
    },

    /// A manual quota row names a level absent from the roster.
    #[error("level '{0}' does not exist in the roster")]
    UnknownLevel(String),
}

fn summarize(mismatches: &[PlanMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| m.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while reading or writing roster files.
#[derive(Error, Debug)]
pub enum RosterIoError {
    /// File extension is not a supported tabular format.
    #[error("unsupported file format '{0}' (accepted: .csv)")]
    UnsupportedFormat(String),

    /// One or more required columns are absent after normalization.
    #[error("missing required columns {missing:?}; found {found:?}")]
    MissingColumns {
        /// Required columns that were not found.
        missing: Vec<String>,
        /// Normalized headers present in the file.
        found: Vec<String>,
    },

    /// A data row has an empty level cell.
    #[error("empty level on line {line}")]
    EmptyLevel {
        /// 1-based line number in the source file (header = line 1).
        line: usize,
    },

    /// CSV parsing or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
