//! Bash word-list emitter.

use helpsync_core::{Flag, FlagSet};

use super::{CompletionEmitter, FlagGroup, render_order};

/// Flags become a plain word list for `compgen -W`.
pub struct BashEmitter;

impl CompletionEmitter for BashEmitter {
    fn flag_block(&self, _group: &FlagGroup<'_>, flags: &FlagSet) -> String {
        render_order(flags)
            .into_iter()
            .map(Flag::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
