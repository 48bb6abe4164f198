//! Flag and command table validation.
//!
//! A [`CommandTable`] built by the parser is well formed by construction, but
//! tables can also be deserialized or assembled by hand. [`validate_table`]
//! checks the invariants the emitters rely on.
//!
//! # Examples
//!
//! ```
//! use helpsync_core::*;
//!
//! let mut table = CommandTable::new();
//! table.declare("clean");
//! assert!(validate_table(&table, &ParsePolicy::default()).is_empty());
//!
//! // Excluded commands never belong in a table
//! table.declare("help");
//! let errors = validate_table(&table, &ParsePolicy::default());
//! assert_eq!(errors, vec![ValidationError::ExcludedCommand("help".to_string())]);
//! ```

use thiserror::Error;

use crate::{CommandTable, ParsePolicy};

/// Reasons a flag literal is rejected by [`Flag::parse`](crate::Flag::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// Short flag is not a single dash plus one alphanumeric character.
    #[error("invalid short flag format: {0}")]
    InvalidShortFlag(String),
    /// Long flag is not `--` plus a lowercase/hyphen token.
    #[error("invalid long flag format: {0}")]
    InvalidLongFlag(String),
    /// Literal does not start with a dash.
    #[error("flag must start with '-': {0}")]
    MissingDash(String),
}

/// Command table validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name contains characters outside `[a-z-]`.
    #[error("invalid command name: {0}")]
    InvalidCommandName(String),
    /// Command is excluded by policy but present in the table.
    #[error("excluded command present in table: {0}")]
    ExcludedCommand(String),
}

/// Returns `true` when `name` matches `[a-z-]+`.
pub fn is_command_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch == '-')
}

/// Validates every command in `table` against `policy`.
pub fn validate_table(table: &CommandTable, policy: &ParsePolicy) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (name, _) in table.iter() {
        if !is_command_name(name) {
            errors.push(ValidationError::InvalidCommandName(name.to_string()));
        }
        if policy.is_excluded(name) {
            errors.push(ValidationError::ExcludedCommand(name.to_string()));
        }
    }
    errors
}
