//! Run configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! group_count = 4
//! seed = 2024
//!
//! [quotas]
//! "5e" = [6, "auto", "auto", 5]
//! "4e" = ["", 3]
//! ```
//!
//! Every field is optional. A quota cell is either an integer or a blank
//! marker (`"auto"` or `""`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::models::Roster;
use crate::quota::ManualQuotas;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A quota cell is a string other than a blank marker.
    #[error(
        "invalid quota cell '{cell}' for level '{level}' (expected a number, \"auto\" or \"\")"
    )]
    InvalidQuotaCell {
        /// Level of the offending row.
        level: String,
        /// Offending cell text.
        cell: String,
    },
}

/// One quota table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuotaCell {
    /// Fixed quota.
    Count(i64),
    /// Blank marker, filled automatically.
    Marker(String),
}

impl QuotaCell {
    fn resolve(&self, level: &str) -> Result<Option<i64>, ConfigError> {
        match self {
            Self::Count(n) => Ok(Some(*n)),
            Self::Marker(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("auto") => {
                Ok(None)
            }
            Self::Marker(s) => Err(ConfigError::InvalidQuotaCell {
                level: level.to_string(),
                cell: s.clone(),
            }),
        }
    }
}

/// Allocation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocationConfig {
    /// Number of groups. `None` = one per class, plus one.
    pub group_count: Option<usize>,
    /// Random seed. `None` = fresh entropy on every run.
    pub seed: Option<u64>,
    /// Hand-entered quotas by level label.
    pub quotas: BTreeMap<String, Vec<QuotaCell>>,
}

impl AllocationConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Effective group count for a roster.
    pub fn group_count_for(&self, roster: &Roster) -> usize {
        self.group_count
            .unwrap_or_else(|| roster.default_group_count())
    }

    /// Converts the quota table.
    pub fn manual_quotas(&self) -> Result<ManualQuotas, ConfigError> {
        let mut quotas = ManualQuotas::new();
        for (level, cells) in &self.quotas {
            let row = cells
                .iter()
                .map(|c| c.resolve(level))
                .collect::<Result<Vec<_>, _>>()?;
            quotas.insert(level.as_str(), row);
        }
        Ok(quotas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Student;

    #[test]
    fn test_empty_config() {
        let config = AllocationConfig::from_toml_str("").unwrap();
        assert_eq!(config, AllocationConfig::default());
        assert!(config.manual_quotas().unwrap().is_blank());
    }

    #[test]
    fn test_full_config() {
        let config = AllocationConfig::from_toml_str(
            r#"
            group_count = 4
            seed = 2024

            [quotas]
            "5e" = [6, "auto", "", 5]
            "#,
        )
        .unwrap();
        assert_eq!(config.group_count, Some(4));
        assert_eq!(config.seed, Some(2024));

        let expected = ManualQuotas::new().with_row("5e", vec![Some(6), None, None, Some(5)]);
        assert_eq!(config.manual_quotas().unwrap(), expected);
    }

    #[test]
    fn test_invalid_marker() {
        let config = AllocationConfig::from_toml_str(
            r#"
            [quotas]
            "1" = [2, "lots"]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.manual_quotas(),
            Err(ConfigError::InvalidQuotaCell { ref cell, .. }) if cell == "lots"
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            AllocationConfig::from_toml_str("groups = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_group_count_default() {
        let roster = Roster::from_students(vec![
            Student::new("A", "B", "601", "1"),
            Student::new("C", "D", "602", "1"),
        ]);
        assert_eq!(AllocationConfig::default().group_count_for(&roster), 3);
        let config = AllocationConfig {
            group_count: Some(2),
            ..Default::default()
        };
        assert_eq!(config.group_count_for(&roster), 2);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.toml");
        std::fs::write(&path, "seed = 7\n").unwrap();
        let config = AllocationConfig::load(&path).unwrap();
        assert_eq!(config.seed, Some(7));
        assert!(matches!(
            AllocationConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
