//! Zsh `_arguments` exclusion-group emitter.
//!
//! All flags of the group are mutually exclusive and share one description:
//!
//! ```text
//! '(-f --force)'{-f,--force}'[actually delete files]'
//! ```
//!
//! A single flag has nothing to brace-expand and is written bare:
//! `'(-f)'-f'[actually delete files]'`.

use helpsync_core::{Flag, FlagSet};

use super::{CompletionEmitter, FlagGroup, render_order};

pub struct ZshEmitter;

impl CompletionEmitter for ZshEmitter {
    fn flag_block(&self, group: &FlagGroup<'_>, flags: &FlagSet) -> String {
        let literals: Vec<&str> = render_order(flags).into_iter().map(Flag::as_str).collect();
        let exclusion = format!("'({})'", literals.join(" "));
        let alternatives = match literals.as_slice() {
            [single] => (*single).to_string(),
            many => format!("{{{}}}", many.join(",")),
        };
        format!(
            "{exclusion}{alternatives}'[{}]'",
            escape_description(group.description)
        )
    }
}

/// Escapes text for use inside `'[...]'` in an `_arguments` spec.
fn escape_description(text: &str) -> String {
    text.replace('\'', r"'\''")
        .replace('[', r"\[")
        .replace(']', r"\]")
}
