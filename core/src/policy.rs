//! Named policy constants for help-text parsing.
//!
//! The section headers that bound the capture region, the commands excluded
//! from every table, and the protocol commands unioned into every completion
//! list are gathered here so callers can override them.

use serde::{Deserialize, Serialize};

/// Header that opens the capture region.
pub const OPTIONS_HEADER: &str = "Options:";

/// Headers that close the capture region.
pub const END_HEADERS: [&str; 2] = ["Environment Variables:", "Git Protocol Commands"];

/// Commands never recorded in a [`CommandTable`](crate::CommandTable).
pub const EXCLUDED_COMMANDS: [&str; 2] = ["help", "version"];

/// git-remote-helper verbs always offered as completions.
pub const PROTOCOL_COMMANDS: [&str; 4] = ["capabilities", "fetch", "list", "push"];

/// Header and exclusion rules used by the command table parser.
///
/// # Examples
///
/// ```
/// use helpsync_core::ParsePolicy;
///
/// let policy = ParsePolicy::default();
/// assert!(policy.opens_capture("Options:"));
/// assert!(policy.closes_capture("Git Protocol Commands (for debugging):"));
/// assert!(policy.is_excluded("help"));
/// assert!(!policy.is_excluded("clean"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsePolicy {
    /// Trimmed-line prefixes that start the capture region.
    pub start_headers: Vec<String>,
    /// Trimmed-line prefixes that end the capture region.
    pub end_headers: Vec<String>,
    /// Commands dropped from the table.
    pub excluded_commands: Vec<String>,
}

impl Default for ParsePolicy {
    fn default() -> Self {
        Self {
            start_headers: vec![OPTIONS_HEADER.to_string()],
            end_headers: END_HEADERS.iter().map(|h| h.to_string()).collect(),
            excluded_commands: EXCLUDED_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ParsePolicy {
    /// Returns `true` if the trimmed line starts with a start header.
    pub fn opens_capture(&self, trimmed: &str) -> bool {
        self.start_headers.iter().any(|h| trimmed.starts_with(h.as_str()))
    }

    /// Returns `true` if the trimmed line starts with an end header.
    pub fn closes_capture(&self, trimmed: &str) -> bool {
        self.end_headers.iter().any(|h| trimmed.starts_with(h.as_str()))
    }

    pub fn is_excluded(&self, command: &str) -> bool {
        self.excluded_commands.iter().any(|c| c == command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_match_on_prefix() {
        let policy = ParsePolicy::default();
        assert!(policy.opens_capture("Options: (all optional)"));
        assert!(policy.closes_capture("Environment Variables:"));
        assert!(!policy.closes_capture("Environment"));
        assert!(!policy.opens_capture("  Options:"));
    }

    #[test]
    fn test_custom_policy_replaces_defaults() {
        let policy = ParsePolicy {
            start_headers: vec!["Commands:".to_string()],
            end_headers: vec!["Notes:".to_string()],
            excluded_commands: Vec::new(),
        };
        assert!(!policy.opens_capture("Options:"));
        assert!(policy.opens_capture("Commands:"));
        assert!(!policy.is_excluded("help"));
    }
}
