//! Completion and README generation from an embedded help text.
//!
//! This crate derives bash, zsh and fish completion scripts and README
//! sections from the help text a tool carries in its own source, so the
//! documentation and completions cannot drift from the real command set.
//!
//! # Main entry points
//!
//! - [`parse_command_table`]: parse help text into a
//!   [`CommandTable`](helpsync_core::CommandTable) without touching the file
//!   system.
//! - [`pipeline::Pipeline::sync`]: the full extract → parse → render → write
//!   run driven by a [`config::SyncConfig`].
//! - [`pipeline::Pipeline::check`]: same computation, reports stale files
//!   instead of writing.
//!
//! # Example
//!
//! ```
//! use helpsync_core::ParsePolicy;
//! use helpsync_generate::parse_command_table;
//!
//! let help = "\
//! Usage: git-remote-gcrypt [command]
//!
//! Options:
//!   help              Show this help
//!   check [URL]       Check if URL is a gcrypt repository
//!   clean [URL]       Scan/Clean unencrypted files from remote
//!     clean -f, --force   Actually delete files
//! Git Protocol Commands (for debugging):
//!   capabilities      List remote helper capabilities
//! ";
//!
//! let table = parse_command_table(help, &ParsePolicy::default());
//! assert_eq!(table.command_names(), ["check", "clean"]);
//! let flags: Vec<&str> = table.flags("clean").unwrap().iter().map(|f| f.as_str()).collect();
//! assert_eq!(flags, ["-f", "--force"]);
//! ```

pub mod config;
pub mod defaults;
pub mod emit;
pub mod error;
pub mod extract;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod readme;

pub use error::{Result, SyncError};

use helpsync_core::{CommandTable, ParsePolicy};
use parser::CommandTableParser;

/// Parses help text into a command table using `policy`.
///
/// Lines that cannot be attributed are dropped silently; use
/// [`CommandTableParser`] directly to inspect them.
pub fn parse_command_table(help_text: &str, policy: &ParsePolicy) -> CommandTable {
    CommandTableParser::new(policy).parse(help_text).table
}
