//! Core FortiOS domain types.
//!
//! Lifecycle verbs, the import-mode flag that selects how nested lists are refreshed,
//! and the ordering position used by move operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Lifecycle operations performed against a remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a new object
    Create,
    /// Read the current remote state
    Read,
    /// Update an existing object
    Update,
    /// Delete an object
    Delete,
    /// Move an object relative to another one
    Move,
}

impl Operation {
    /// Returns the progressive verb used in error messages.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Read => "reading",
            Self::Update => "updating",
            Self::Delete => "deleting",
            Self::Move => "moving",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Policy applied to nested-list fields when refreshing local state from a read.
///
/// Scalars are always overwritten; this flag only affects list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Overwrite a nested list only when it was already set locally
    #[default]
    Managed,
    /// Always overwrite nested lists from the remote value
    Full,
}

impl ImportMode {
    /// Returns true when nested lists are always overwritten.
    #[must_use]
    pub const fn overwrites_lists(&self) -> bool {
        matches!(self, Self::Full)
    }
}

impl FromStr for ImportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "managed" | "false" => Ok(Self::Managed),
            "full" | "true" => Ok(Self::Full),
            _ => Err(Error::ConfigError(format!("Unknown import mode: {s}"))),
        }
    }
}

/// Where an object is placed relative to its neighbor in an ordered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovePosition {
    /// Place the object before the neighbor
    Before,
    /// Place the object after the neighbor
    After,
}

impl MovePosition {
    /// Returns the query parameter name used by the move action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for MovePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovePosition {
    type Err = Error;

    /// Only the exact lowercase words are accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(Error::InvalidPosition(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_verbs() {
        assert_eq!(Operation::Create.to_string(), "creating");
        assert_eq!(Operation::Read.to_string(), "reading");
        assert_eq!(Operation::Update.to_string(), "updating");
        assert_eq!(Operation::Delete.to_string(), "deleting");
        assert_eq!(Operation::Move.to_string(), "moving");
    }

    #[test]
    fn test_import_mode_from_str() {
        assert_eq!("full".parse::<ImportMode>().unwrap(), ImportMode::Full);
        assert_eq!("TRUE".parse::<ImportMode>().unwrap(), ImportMode::Full);
        assert_eq!("managed".parse::<ImportMode>().unwrap(), ImportMode::Managed);
        assert_eq!("false".parse::<ImportMode>().unwrap(), ImportMode::Managed);
        assert!("sometimes".parse::<ImportMode>().is_err());
    }

    #[test]
    fn test_import_mode_default() {
        assert_eq!(ImportMode::default(), ImportMode::Managed);
        assert!(!ImportMode::Managed.overwrites_lists());
        assert!(ImportMode::Full.overwrites_lists());
    }

    #[test]
    fn test_move_position_parse() {
        assert_eq!("before".parse::<MovePosition>().unwrap(), MovePosition::Before);
        assert_eq!("after".parse::<MovePosition>().unwrap(), MovePosition::After);
    }

    #[test]
    fn test_move_position_rejects_other_values() {
        for value in ["", "Before", "AFTER", "middle", " after"] {
            let err = value.parse::<MovePosition>().unwrap_err();
            assert!(matches!(err, Error::InvalidPosition(_)), "{value:?}");
        }
    }

    #[test]
    fn test_move_position_serde() {
        let json = serde_json::to_string(&MovePosition::After).unwrap();
        assert_eq!(json, "\"after\"");
    }
}
