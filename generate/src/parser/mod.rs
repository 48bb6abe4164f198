//! Command table parser for indentation-structured help text.
//!
//! The parser is a three-state machine driven by [`classify::LineKind`]:
//!
//! ```text
//!   Seeking ──StartHeader──▶ InOptions ──EndHeader──▶ Done
//! ```
//!
//! Inside the capture region (`InOptions`):
//!
//! - a two-space `  name ...` line makes `name` the current command and
//!   records it with an empty flag set, unless policy excludes it;
//! - a four-space line whose first token is the current command's name
//!   contributes the flags listed before its description;
//! - every other non-blank line is dropped and counted as unresolved.
//!
//! Lines before the start header and after the end header are never looked
//! at, so a protocol-command section after the options block contributes
//! nothing.
//!
//! Most consumers should use [`parse_command_table`](crate::parse_command_table).

mod classify;

use helpsync_core::{CommandTable, ParsePolicy};
use serde::Serialize;
use tracing::debug;

pub use classify::{LineKind, classify_line, extract_flags};

/// Position of the parser relative to the capture region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseState {
    /// Before the start header.
    #[default]
    Seeking,
    /// Between the start and end headers.
    InOptions,
    /// After the end header; the remaining lines are ignored.
    Done,
}

/// What to do with a classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action<'a> {
    Skip,
    Declare(&'a str),
    Flags { owner: &'a str, body: &'a str },
    Drop,
}

/// Transition table for the parser state machine.
fn transition(state: ParseState, kind: LineKind<'_>) -> (ParseState, Action<'_>) {
    use ParseState::{Done, InOptions, Seeking};

    match (state, kind) {
        (Seeking, LineKind::StartHeader) => (InOptions, Action::Skip),
        (Seeking, _) => (Seeking, Action::Skip),
        (InOptions, LineKind::EndHeader) => (Done, Action::Skip),
        (InOptions, LineKind::StartHeader | LineKind::Blank) => (InOptions, Action::Skip),
        (InOptions, LineKind::Command(name)) => (InOptions, Action::Declare(name)),
        (InOptions, LineKind::FlagLine { owner, body }) => {
            (InOptions, Action::Flags { owner, body })
        }
        (InOptions, LineKind::Other) => (InOptions, Action::Drop),
        (Done, _) => (Done, Action::Skip),
    }
}

/// Diagnostics for a single parse run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// Non-blank, non-header lines inside the capture region.
    pub relevant_lines: usize,
    /// Command and flag lines that were attributed.
    pub recognized_lines: usize,
    /// Lines inside the capture region that contributed nothing.
    pub unresolved_lines: Vec<String>,
    /// Commands seen but excluded by policy.
    pub excluded_commands: Vec<String>,
    /// State the machine ended in.
    pub final_state: ParseState,
}

impl ParseDiagnostics {
    pub fn coverage(&self) -> f64 {
        if self.relevant_lines == 0 {
            return 0.0;
        }
        self.recognized_lines as f64 / self.relevant_lines as f64
    }
}

/// Table and diagnostics produced by [`CommandTableParser::parse`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub table: CommandTable,
    pub diagnostics: ParseDiagnostics,
}

/// Builds a [`CommandTable`] from help text.
///
/// # Examples
///
/// ```
/// use helpsync_core::ParsePolicy;
/// use helpsync_generate::parser::CommandTableParser;
///
/// let help = "\
/// Options:
///   check [URL]   Check a repository
///   clean         Scan for unencrypted files
///     clean -f, --force   Actually delete
/// Git Protocol Commands
///   capabilities  List capabilities
/// ";
///
/// let policy = ParsePolicy::default();
/// let outcome = CommandTableParser::new(&policy).parse(help);
/// assert_eq!(outcome.table.command_names(), ["check", "clean"]);
/// assert!(outcome.table.flags("clean").unwrap().contains("--force"));
/// ```
pub struct CommandTableParser<'p> {
    policy: &'p ParsePolicy,
}

impl<'p> CommandTableParser<'p> {
    pub fn new(policy: &'p ParsePolicy) -> Self {
        Self { policy }
    }

    pub fn parse(&self, help_text: &str) -> ParseOutcome {
        let mut table = CommandTable::new();
        let mut diagnostics = ParseDiagnostics::default();
        let mut state = ParseState::default();
        let mut current: Option<&str> = None;

        for line in help_text.lines() {
            let kind = classify_line(line, self.policy);
            let (next, action) = transition(state, kind);
            if next != state {
                debug!(from = ?state, to = ?next, line, "parser state change");
            }
            state = next;

            match action {
                Action::Skip => {}
                Action::Declare(name) => {
                    diagnostics.relevant_lines += 1;
                    diagnostics.recognized_lines += 1;
                    current = Some(name);
                    if self.policy.is_excluded(name) {
                        diagnostics.excluded_commands.push(name.to_string());
                    } else {
                        table.declare(name);
                    }
                }
                Action::Flags { owner, body } => {
                    diagnostics.relevant_lines += 1;
                    if current != Some(owner) {
                        debug!(
                            line,
                            current = ?current,
                            "dropping flag line not owned by current command"
                        );
                        diagnostics.unresolved_lines.push(line.to_string());
                        continue;
                    }
                    diagnostics.recognized_lines += 1;
                    if self.policy.is_excluded(owner) {
                        continue;
                    }
                    for flag in extract_flags(body) {
                        table.add_flag(owner, flag);
                    }
                }
                Action::Drop => {
                    diagnostics.relevant_lines += 1;
                    debug!(line, "dropping unrecognized line in capture region");
                    diagnostics.unresolved_lines.push(line.to_string());
                }
            }
        }

        if state == ParseState::Seeking {
            debug!("no capture region found in help text");
        }
        diagnostics.final_state = state;

        ParseOutcome { table, diagnostics }
    }
}
