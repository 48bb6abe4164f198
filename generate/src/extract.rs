//! Help-text extraction from a tool's source.
//!
//! The help text is the content of a shell assignment `NAME="..."` that may
//! span many lines. Content ends at the first double quote not preceded by a
//! backslash; escape sequences are returned as written.

use regex::Regex;
use tracing::{debug, warn};

/// Default name of the variable holding the help text.
pub const DEFAULT_HELP_VARIABLE: &str = "HELP_TEXT";

/// Returns the content of the first `variable="..."` assignment in `source`.
///
/// The variable name must start a line or follow a non-identifier
/// character, so `MY_HELP_TEXT` never matches `HELP_TEXT`.
///
/// # Examples
///
/// ```
/// use helpsync_generate::extract::extract_help_text;
///
/// let source = "#!/bin/sh\nHELP_TEXT=\"Usage: tool\nOptions:\n  check\"\necho done\n";
/// assert_eq!(
///     extract_help_text(source, "HELP_TEXT"),
///     Some("Usage: tool\nOptions:\n  check")
/// );
/// assert_eq!(extract_help_text(source, "USAGE"), None);
/// ```
pub fn extract_help_text<'a>(source: &'a str, variable: &str) -> Option<&'a str> {
    let pattern = format!(
        r#"(?m)(?:^|[^A-Za-z0-9_]){}="((?:[^"\\]|\\[\s\S])*)""#,
        regex::escape(variable)
    );
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(err) => {
            warn!(variable, error = %err, "invalid help variable pattern");
            return None;
        }
    };

    let mut matches = re.captures_iter(source);
    let first = matches.next()?.get(1)?;
    let extra = matches.count();
    if extra > 0 {
        warn!(variable, extra, "multiple help text assignments found, using the first");
    }
    debug!(variable, bytes = first.len(), "extracted help text");
    Some(first.as_str())
}
