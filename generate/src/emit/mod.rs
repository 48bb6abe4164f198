//! Completion-script emitters for bash, zsh and fish.
//!
//! Every dialect resolves the same two placeholders from a [`CommandTable`]:
//!
//! - the **command list**, sorted and space-joined (identical in all three
//!   dialects);
//! - the **flag block** for one designated command, rendered in the
//!   dialect's own syntax by [`CompletionEmitter::flag_block`].
//!
//! A placeholder with no data renders as an empty string. Emitters only read
//! the table, so identical inputs always produce byte-identical scripts.

pub mod bash;
pub mod fish;
pub mod zsh;

use std::fmt;
use std::sync::LazyLock;

use helpsync_core::{Bindings, CommandTable, Flag, FlagSet, ParsePolicy, Template};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Target completion grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Dialect {
    Bash,
    Zsh,
    Fish,
}

impl Dialect {
    /// All dialects in pipeline order.
    pub const ALL: [Dialect; 3] = [Dialect::Bash, Dialect::Zsh, Dialect::Fish];

    /// Human-readable name used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            Dialect::Bash => "Bash",
            Dialect::Zsh => "Zsh",
            Dialect::Fish => "Fish",
        }
    }

    pub fn emitter(self) -> &'static dyn CompletionEmitter {
        match self {
            Dialect::Bash => &bash::BashEmitter,
            Dialect::Zsh => &zsh::ZshEmitter,
            Dialect::Fish => &fish::FishEmitter,
        }
    }

    /// Recovers the command list from a script rendered from the bundled
    /// default template for this dialect.
    ///
    /// Returns `None` when the script has no recognizable command list.
    pub fn recover_command_list(self, script: &str) -> Option<Vec<String>> {
        let re: &Regex = match self {
            Dialect::Bash => &*BASH_COMMAND_LIST,
            Dialect::Zsh => &*ZSH_COMMAND_LIST,
            Dialect::Fish => &*FISH_COMMAND_LIST,
        };
        let caps = re.captures(script)?;
        Some(
            caps.get(1)?
                .as_str()
                .split_whitespace()
                .map(String::from)
                .collect(),
        )
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Bash => "bash",
            Dialect::Zsh => "zsh",
            Dialect::Fish => "fish",
        })
    }
}

static BASH_COMMAND_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*commands="([^"]*)""#).expect("valid bash list regex"));
static ZSH_COMMAND_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'1:command:\(([^)]*)\)'").expect("valid zsh list regex"));
static FISH_COMMAND_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"not __fish_seen_subcommand_from ([^"]*)""#).expect("valid fish list regex")
});

/// The command whose flags get a dialect-specific block.
#[derive(Debug, Clone, Copy)]
pub struct FlagGroup<'a> {
    /// Command name as it appears in the table (e.g. `clean`).
    pub command: &'a str,
    /// Shared description for every flag of the group.
    pub description: &'a str,
    /// Program name used by statement-based dialects (fish).
    pub program: &'a str,
}

/// Placeholder keys a template uses for the two rendered values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderKeys {
    pub commands: String,
    pub flags: String,
}

impl PlaceholderKeys {
    /// Keys used by the bundled default template for `dialect`.
    pub fn defaults_for(dialect: Dialect) -> Self {
        let commands = match dialect {
            Dialect::Bash | Dialect::Zsh => "commands",
            Dialect::Fish => "not_sc_list",
        };
        Self {
            commands: commands.to_string(),
            flags: "clean_flags".to_string(),
        }
    }
}

/// Renders dialect-specific completion fragments.
pub trait CompletionEmitter {
    /// Sorted, space-joined command names.
    fn command_list(&self, commands: &[String]) -> String {
        let mut sorted = commands.to_vec();
        sorted.sort();
        sorted.dedup();
        sorted.join(" ")
    }

    /// Flags of the group command in this dialect's syntax.
    ///
    /// Only called with a non-empty `flags`.
    fn flag_block(&self, group: &FlagGroup<'_>, flags: &FlagSet) -> String;
}

/// Flags in the order every emitter renders them: by name, short before
/// long on equal names. Help-text order never reaches the output.
pub fn render_order(flags: &FlagSet) -> Vec<&Flag> {
    let mut ordered: Vec<&Flag> = flags.iter().collect();
    ordered.sort_by(|a, b| a.name().cmp(b.name()).then(a.kind().cmp(&b.kind())));
    ordered
}

/// Everything an emitter reads during one render.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Final completion command list.
    pub commands: &'a [String],
    pub table: &'a CommandTable,
    pub group: FlagGroup<'a>,
}

/// Binds the command list and flag block for `emitter` under `keys`.
pub fn bindings_for(
    emitter: &dyn CompletionEmitter,
    ctx: &RenderContext<'_>,
    keys: &PlaceholderKeys,
) -> Bindings {
    let flag_block = match ctx.table.flags(ctx.group.command) {
        Some(flags) if !flags.is_empty() => emitter.flag_block(&ctx.group, flags),
        _ => String::new(),
    };

    let mut bindings = Bindings::new();
    bindings
        .bind(keys.commands.as_str(), emitter.command_list(ctx.commands))
        .bind(keys.flags.as_str(), flag_block);
    bindings
}

/// Renders a completion script for `dialect` from `template`.
///
/// # Examples
///
/// ```
/// use helpsync_core::{CommandTable, Flag, Template};
/// use helpsync_generate::emit::{
///     Dialect, FlagGroup, PlaceholderKeys, RenderContext, render_completion,
/// };
///
/// let mut table = CommandTable::new();
/// table.declare("clean");
/// table.add_flag("clean", Flag::parse("-f").unwrap());
/// table.add_flag("clean", Flag::parse("--force").unwrap());
///
/// let commands = vec!["clean".to_string(), "check".to_string()];
/// let ctx = RenderContext {
///     commands: &commands,
///     table: &table,
///     group: FlagGroup { command: "clean", description: "delete", program: "tool" },
/// };
/// let template = Template::parse("commands=\"{commands}\" opts=\"{clean_flags}\"");
/// let script = render_completion(
///     Dialect::Bash,
///     &template,
///     &ctx,
///     &PlaceholderKeys::defaults_for(Dialect::Bash),
/// );
/// assert_eq!(script, "commands=\"check clean\" opts=\"-f --force\"");
/// ```
pub fn render_completion(
    dialect: Dialect,
    template: &Template,
    ctx: &RenderContext<'_>,
    keys: &PlaceholderKeys,
) -> String {
    template.render(&bindings_for(dialect.emitter(), ctx, keys))
}

/// Builds the final completion command list.
///
/// Parsed commands are unioned with `protocol_commands`, excluded commands
/// are removed, and the result is sorted and deduplicated.
pub fn completion_commands(
    table: &CommandTable,
    protocol_commands: &[String],
    policy: &ParsePolicy,
) -> Vec<String> {
    let mut commands: Vec<String> = table
        .command_names()
        .into_iter()
        .map(String::from)
        .chain(protocol_commands.iter().cloned())
        .filter(|name| !policy.is_excluded(name))
        .collect();
    commands.sort();
    commands.dedup();
    commands
}

/// Wraps `text` in single quotes for a POSIX-style shell.
pub(crate) fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use helpsync_core::PROTOCOL_COMMANDS;

    use super::*;

    fn table() -> CommandTable {
        let mut table = CommandTable::new();
        table.declare("clean");
        table.declare("check");
        table.add_flag("clean", Flag::parse("-f").unwrap());
        table.add_flag("clean", Flag::parse("--force").unwrap());
        table
    }

    fn protocol() -> Vec<String> {
        PROTOCOL_COMMANDS.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_completion_commands_union_and_sort() {
        let commands = completion_commands(&table(), &protocol(), &ParsePolicy::default());
        assert_eq!(
            commands,
            ["capabilities", "check", "clean", "fetch", "list", "push"]
        );
    }

    #[test]
    fn test_completion_commands_never_include_excluded() {
        let mut protocol = protocol();
        protocol.push("help".to_string());
        protocol.push("version".to_string());
        let commands = completion_commands(&table(), &protocol, &ParsePolicy::default());
        assert!(!commands.iter().any(|c| c == "help" || c == "version"));
    }

    #[test]
    fn test_missing_group_command_renders_empty_block() {
        let table = table();
        let commands = vec!["check".to_string()];
        let ctx = RenderContext {
            commands: &commands,
            table: &table,
            group: FlagGroup {
                command: "prune",
                description: "d",
                program: "p",
            },
        };
        for dialect in Dialect::ALL {
            let keys = PlaceholderKeys::defaults_for(dialect);
            let template = Template::parse("[{clean_flags}]");
            assert_eq!(render_completion(dialect, &template, &ctx, &keys), "[]");
        }
    }

    #[test]
    fn test_command_list_is_identical_across_dialects() {
        let commands = vec!["push".to_string(), "check".to_string(), "list".to_string()];
        let lists: Vec<String> = Dialect::ALL
            .iter()
            .map(|d| d.emitter().command_list(&commands))
            .collect();
        assert!(lists.iter().all(|l| l == "check list push"));
    }

    #[test]
    fn test_render_order_ignores_help_text_order() {
        let flags: FlagSet = ["--init", "--force", "-f", "-i"]
            .into_iter()
            .map(|f| Flag::parse(f).unwrap())
            .collect();
        let ordered: Vec<&str> = render_order(&flags).into_iter().map(Flag::as_str).collect();
        assert_eq!(ordered, ["-f", "--force", "-i", "--init"]);
    }

    #[test]
    fn test_flag_block_is_stable_under_reordering() {
        let commands = vec!["clean".to_string()];
        let mut forward = CommandTable::new();
        let mut reversed = CommandTable::new();
        forward.declare("clean");
        reversed.declare("clean");
        for literal in ["-f", "--force", "--init"] {
            forward.add_flag("clean", Flag::parse(literal).unwrap());
        }
        for literal in ["--init", "-f", "--force"] {
            reversed.add_flag("clean", Flag::parse(literal).unwrap());
        }

        let template = Template::parse("{commands}|{not_sc_list}|{clean_flags}");
        for dialect in Dialect::ALL {
            let render = |table: &CommandTable| {
                let ctx = RenderContext {
                    commands: &commands,
                    table,
                    group: FlagGroup {
                        command: "clean",
                        description: "actually delete files",
                        program: "git-remote-gcrypt",
                    },
                };
                render_completion(dialect, &template, &ctx, &PlaceholderKeys::defaults_for(dialect))
            };
            assert_eq!(render(&forward), render(&reversed), "{dialect} output differs");
        }
    }

    #[test]
    fn test_single_quote_escapes_quotes() {
        assert_eq!(single_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_recover_command_list_requires_marker() {
        assert_eq!(Dialect::Bash.recover_command_list("no list here"), None);
        assert_eq!(
            Dialect::Bash.recover_command_list("\tcommands=\"check clean\"\n"),
            Some(vec!["check".to_string(), "clean".to_string()])
        );
    }
}
