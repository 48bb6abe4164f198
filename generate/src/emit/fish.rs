//! Fish `complete` statement emitter.
//!
//! Each flag becomes its own statement scoped to the group command:
//!
//! ```text
//! complete -c git-remote-gcrypt -f -n "__fish_seen_subcommand_from clean" -s f -d 'actually delete files'
//! complete -c git-remote-gcrypt -f -n "__fish_seen_subcommand_from clean" -l force -d 'actually delete files'
//! ```

use helpsync_core::{FlagKind, FlagSet};

use super::{CompletionEmitter, FlagGroup, render_order, single_quote};

pub struct FishEmitter;

impl CompletionEmitter for FishEmitter {
    fn flag_block(&self, group: &FlagGroup<'_>, flags: &FlagSet) -> String {
        let description = single_quote(group.description);
        render_order(flags)
            .into_iter()
            .map(|flag| {
                let marker = match flag.kind() {
                    FlagKind::Short => "-s",
                    FlagKind::Long => "-l",
                };
                format!(
                    "complete -c {} -f -n \"__fish_seen_subcommand_from {}\" {marker} {} -d {description}",
                    group.program,
                    group.command,
                    flag.name()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use helpsync_core::Flag;

    use super::*;

    #[test]
    fn test_one_statement_per_flag() {
        let flags: FlagSet = ["-f", "--force"]
            .into_iter()
            .map(|f| Flag::parse(f).unwrap())
            .collect();
        let group = FlagGroup {
            command: "clean",
            description: "actually delete files",
            program: "git-remote-gcrypt",
        };

        let block = FishEmitter.flag_block(&group, &flags);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(
            lines,
            [
                "complete -c git-remote-gcrypt -f -n \"__fish_seen_subcommand_from clean\" -s f -d 'actually delete files'",
                "complete -c git-remote-gcrypt -f -n \"__fish_seen_subcommand_from clean\" -l force -d 'actually delete files'",
            ]
        );
    }
}
