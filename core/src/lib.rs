//! Core types for help-text driven completion generation.
//!
//! This crate defines the data recovered from a tool's help text and the
//! template model the emitters render into:
//!
//! - [`CommandTable`]: command name → [`FlagSet`], always iterated in
//!   lexicographic order.
//! - [`Flag`]: a validated short (`-f`) or long (`--force`) literal.
//! - [`Template`] / [`Bindings`]: placeholder templates rendered from a
//!   key → value map.
//! - [`ParsePolicy`]: capture-region headers and excluded commands, with
//!   the named defaults [`OPTIONS_HEADER`], [`END_HEADERS`],
//!   [`EXCLUDED_COMMANDS`] and [`PROTOCOL_COMMANDS`].
//!
//! # Example
//!
//! ```
//! use helpsync_core::*;
//!
//! let mut table = CommandTable::new();
//! table.declare("clean");
//! table.add_flag("clean", Flag::parse("-f").unwrap());
//! table.add_flag("clean", Flag::parse("--force").unwrap());
//!
//! let mut bindings = Bindings::new();
//! bindings.bind("commands", table.command_names().join(" "));
//!
//! let template = Template::parse("commands=\"{commands}\"");
//! assert_eq!(template.render(&bindings), "commands=\"clean\"");
//! assert!(validate_table(&table, &ParsePolicy::default()).is_empty());
//! ```

mod policy;
mod template;
mod types;
mod validate;

pub use policy::{END_HEADERS, EXCLUDED_COMMANDS, OPTIONS_HEADER, PROTOCOL_COMMANDS, ParsePolicy};
pub use template::{Bindings, Segment, Template};
pub use types::*;
pub use validate::{FlagError, ValidationError, is_command_name, validate_table};
