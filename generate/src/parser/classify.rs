//! Line classification for the command table parser.
//!
//! Classification is independent of parser state; the state machine in
//! [`super`] decides what each kind means in context.

use std::sync::LazyLock;

use helpsync_core::{Flag, ParsePolicy};
use regex::Regex;

/// `  name` followed by whitespace or end of line.
static COMMAND_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^  ([a-z-]+)(?:\s|$)").expect("valid command line regex"));

/// A short+long pair joined by a comma, a long flag, or a short flag.
static FLAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s\[(|])(-[A-Za-z0-9]\s*,\s*--[a-z][a-z-]*|--[a-z][a-z-]*|-[A-Za-z0-9])\b")
        .expect("valid flag token regex")
});

/// Kind of a raw help-text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Trimmed line starts with a capture start header.
    StartHeader,
    /// Trimmed line starts with a capture end header.
    EndHeader,
    /// Two-space indented command entry.
    Command(&'a str),
    /// Four-space indented line; `owner` is its first token, `body` the rest.
    FlagLine { owner: &'a str, body: &'a str },
    /// Empty or whitespace-only line.
    Blank,
    /// Anything else.
    Other,
}

/// Classifies one raw line. End headers take precedence over start headers.
pub fn classify_line<'a>(line: &'a str, policy: &ParsePolicy) -> LineKind<'a> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if policy.closes_capture(trimmed) {
        return LineKind::EndHeader;
    }
    if policy.opens_capture(trimmed) {
        return LineKind::StartHeader;
    }

    match leading_spaces(line) {
        2 => match COMMAND_LINE.captures(line).and_then(|caps| caps.get(1)) {
            Some(name) => LineKind::Command(name.as_str()),
            None => LineKind::Other,
        },
        4 => {
            let content = &line[4..];
            let owner_end = content
                .find(char::is_whitespace)
                .unwrap_or(content.len());
            LineKind::FlagLine {
                owner: &content[..owner_end],
                body: &content[owner_end..],
            }
        }
        _ => LineKind::Other,
    }
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

/// Extracts the flags listed in a flag line body.
///
/// The description, everything after the first run of two or more spaces,
/// is discarded. Comma-joined pairs yield both literals.
pub fn extract_flags(body: &str) -> Vec<Flag> {
    let body = body.trim_start();
    let region = match body.find("  ") {
        Some(idx) => &body[..idx],
        None => body,
    };

    let mut flags = Vec::new();
    for caps in FLAG_TOKEN.captures_iter(region) {
        let Some(token) = caps.get(1) else {
            continue;
        };
        for literal in token.as_str().split(',') {
            if let Ok(flag) = Flag::parse(literal.trim()) {
                flags.push(flag);
            }
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(body: &str) -> Vec<String> {
        extract_flags(body)
            .into_iter()
            .map(|f| f.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_classify_headers() {
        let policy = ParsePolicy::default();
        assert_eq!(classify_line("Options:", &policy), LineKind::StartHeader);
        assert_eq!(
            classify_line("Git Protocol Commands (for debugging):", &policy),
            LineKind::EndHeader
        );
        assert_eq!(classify_line("Environment Variables:", &policy), LineKind::EndHeader);
        assert_eq!(classify_line("   ", &policy), LineKind::Blank);
    }

    #[test]
    fn test_classify_command_lines() {
        let policy = ParsePolicy::default();
        assert_eq!(
            classify_line("  check [URL]      Check a repo", &policy),
            LineKind::Command("check")
        );
        assert_eq!(classify_line("  clean", &policy), LineKind::Command("clean"));
        assert_eq!(classify_line("  Check", &policy), LineKind::Other);
        assert_eq!(classify_line("  check2", &policy), LineKind::Other);
        assert_eq!(classify_line("   check", &policy), LineKind::Other);
        assert_eq!(classify_line("check", &policy), LineKind::Other);
    }

    #[test]
    fn test_classify_flag_lines() {
        let policy = ParsePolicy::default();
        assert_eq!(
            classify_line("    clean -f, --force   Delete", &policy),
            LineKind::FlagLine {
                owner: "clean",
                body: " -f, --force   Delete"
            }
        );
        assert_eq!(classify_line("      clean -f", &policy), LineKind::Other);
    }

    #[test]
    fn test_extract_pair_and_singletons() {
        assert_eq!(literals(" -f, --force   Actually delete"), ["-f", "--force"]);
        assert_eq!(literals(" --init   Initialize"), ["--init"]);
        assert_eq!(literals(" -q"), ["-q"]);
        assert_eq!(literals(" -f ,  --force"), ["-f"]);
    }

    #[test]
    fn test_extract_ignores_description_flags() {
        assert_eq!(literals(" --force   same as -f, --yes"), ["--force"]);
    }

    #[test]
    fn test_extract_bracketed_alternatives() {
        assert_eq!(literals(" [-f|--force] URL"), ["-f", "--force"]);
    }

    #[test]
    fn test_extract_skips_embedded_dashes() {
        assert_eq!(literals(" URL-x --dry-run"), ["--dry-run"]);
        assert!(literals(" -fx").is_empty());
    }
}
