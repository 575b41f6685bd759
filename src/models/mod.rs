//! Grouping domain models.
//!
//! Provides the data types for representing an allocation problem
//! (roster, quota plan) and its solution (groups, placement gaps).
//!
//! # Domain Mappings
//!
//! | u-groups | School | Training | Clinical rotation |
//! |----------|--------|----------|-------------------|
//! | Student | Pupil | Trainee | Resident |
//! | Level | Grade band / tier | Track | Year |
//! | Group | Needs group | Cohort | Ward team |
//! | Period | Term | Session | Rotation block |

mod group;
mod plan;
mod roster;
mod student;

pub use group::{Allocation, Group, PlacementGap};
pub use plan::QuotaPlan;
pub use roster::{HistoryColumn, Roster};
pub use student::{Level, Student, StudentKey};
