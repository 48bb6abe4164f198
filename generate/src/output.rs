//! Output formatting for parsed command tables.

use helpsync_core::{CommandTable, Flag};

use crate::error::Result;

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

/// Formats a command table in the requested output format.
pub fn format_table(table: &CommandTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(table)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(table)?),
        OutputFormat::Text => Ok(table_to_text(table)),
    }
}

fn table_to_text(table: &CommandTable) -> String {
    let width = table
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (name, flags) in table.iter() {
        let literals = flags.iter().map(Flag::as_str).collect::<Vec<_>>();
        if literals.is_empty() {
            out.push_str(&format!("{name}\n"));
        } else {
            out.push_str(&format!("{name:<width$}  {}\n", literals.join(" ")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        let mut table = CommandTable::new();
        table.declare("check");
        table.declare("clean");
        table.add_flag("clean", Flag::parse("-f").unwrap());
        table.add_flag("clean", Flag::parse("--force").unwrap());
        table
    }

    #[test]
    fn test_text_format_aligns_flags() {
        let text = format_table(&table(), OutputFormat::Text).unwrap();
        assert_eq!(text, "check\nclean  -f --force\n");
    }

    #[test]
    fn test_yaml_format_lists_flags() {
        let yaml = format_table(&table(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("check: []"));
        assert!(yaml.contains("--force"));
    }

    #[test]
    fn test_json_format_is_valid() {
        let json = format_table(&table(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["clean"][1], "--force");
    }
}
