//! History-aware group allocation for the U-Engine ecosystem.
//!
//! Assigns students to working groups for successive periods, keeping
//! group sizes balanced per level and avoiding, as far as the quotas allow,
//! groups a student has already been in.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Student`, `StudentKey`, `Level`, `Roster`,
//!   `QuotaPlan`, `Group`, `Allocation`
//! - **`quota`**: Even per-level quota splitting with rotating surplus,
//!   manual quota completion
//! - **`validation`**: Quota plan checks (row length, row sum, missing levels)
//! - **`history`**: Period column detection and per-student history extraction
//! - **`allocation`**: Novelty-first randomized assignment and recap metrics
//! - **`config`**: TOML run configuration
//! - **`io`**: CSV roster loading and export
//!
//! # Data flow
//!
//! ```text
//! roster ─► quota plan ─► validate ─► (roster + plan + history) ─► groups
//! ```
//!
//! # Example
//!
//! ```
//! use u_groups::allocation::AllocationRequest;
//! use u_groups::models::{Roster, Student};
//!
//! let mut roster = Roster::from_students(vec![
//!     Student::new("Dupont", "Alice", "601", "3").with_field("Groupe Période 1", "1"),
//!     Student::new("Martin", "Bob", "602", "2").with_field("Groupe Période 1", "2"),
//!     Student::new("Petit", "Emma", "601", "3").with_field("Groupe Période 1", "3"),
//! ]);
//!
//! let outcome = AllocationRequest::new(roster.clone())
//!     .with_group_count(3)
//!     .with_seed(11)
//!     .run()
//!     .unwrap();
//! let period = roster.record_allocation(&outcome.allocation);
//! assert_eq!(period, 2);
//! ```

pub mod allocation;
pub mod config;
pub mod error;
pub mod history;
pub mod io;
pub mod models;
pub mod quota;
pub mod validation;

pub use error::{GroupingError, GroupingResult, RosterIoError};
