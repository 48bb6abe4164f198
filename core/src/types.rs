//! Command table type definitions.
//!
//! This module defines the data model recovered from a tool's help text: a
//! [`CommandTable`] mapping each command name to the [`FlagSet`] listed under
//! it. The types serialize with [`serde`] so a parsed table can be printed as
//! JSON or YAML.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validate::FlagError;

/// Shape of a [`Flag`] literal. Short sorts before long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlagKind {
    /// `-` followed by one ASCII alphanumeric character (e.g. `-f`).
    Short,
    /// `--` followed by a lowercase/hyphen token (e.g. `--force`).
    Long,
}

/// A single flag literal such as `-f` or `--force`.
///
/// Short and long forms are never paired here; each literal is its own
/// `Flag`. Emitters decide how to group them.
///
/// # Examples
///
/// ```
/// use helpsync_core::{Flag, FlagKind};
///
/// let force = Flag::parse("--force").unwrap();
/// assert_eq!(force.kind(), FlagKind::Long);
/// assert_eq!(force.name(), "force");
///
/// let short = Flag::parse("-f").unwrap();
/// assert_eq!(short.kind(), FlagKind::Short);
/// assert_eq!(short.name(), "f");
///
/// assert!(Flag::parse("force").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Flag(String);

impl Flag {
    /// Validates and wraps a flag literal.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError`] when `literal` is neither a short nor a long
    /// flag.
    pub fn parse(literal: &str) -> Result<Self, FlagError> {
        classify(literal)?;
        Ok(Self(literal.to_string()))
    }

    /// Returns whether this is a short or long flag.
    pub fn kind(&self) -> FlagKind {
        if self.0.starts_with("--") {
            FlagKind::Long
        } else {
            FlagKind::Short
        }
    }

    /// Returns the flag name with its leading dashes stripped.
    pub fn name(&self) -> &str {
        self.0.trim_start_matches('-')
    }

    /// Returns the full literal, dashes included.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn classify(literal: &str) -> Result<FlagKind, FlagError> {
    if let Some(name) = literal.strip_prefix("--") {
        let mut chars = name.chars();
        let starts_ok = chars.next().is_some_and(|ch| ch.is_ascii_lowercase());
        if starts_ok && chars.all(|ch| ch.is_ascii_lowercase() || ch == '-') {
            return Ok(FlagKind::Long);
        }
        return Err(FlagError::InvalidLongFlag(literal.to_string()));
    }

    if let Some(name) = literal.strip_prefix('-') {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphanumeric() => return Ok(FlagKind::Short),
            _ => return Err(FlagError::InvalidShortFlag(literal.to_string())),
        }
    }

    Err(FlagError::MissingDash(literal.to_string()))
}

impl TryFrom<String> for Flag {
    type Error = FlagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        classify(&value)?;
        Ok(Self(value))
    }
}

impl From<Flag> for String {
    fn from(flag: Flag) -> Self {
        flag.0
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Flag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, duplicate-free flags belonging to one command.
///
/// Flags keep the order in which they first appeared in the help text.
///
/// # Examples
///
/// ```
/// use helpsync_core::{Flag, FlagSet};
///
/// let mut flags = FlagSet::new();
/// assert!(flags.insert(Flag::parse("-f").unwrap()));
/// assert!(flags.insert(Flag::parse("--force").unwrap()));
/// assert!(!flags.insert(Flag::parse("-f").unwrap()));
///
/// let literals: Vec<&str> = flags.iter().map(|f| f.as_str()).collect();
/// assert_eq!(literals, ["-f", "--force"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `flag` unless an identical literal is already present.
    ///
    /// Returns `true` when the flag was added.
    pub fn insert(&mut self, flag: Flag) -> bool {
        if self.flags.contains(&flag) {
            return false;
        }
        self.flags.push(flag);
        true
    }

    pub fn contains(&self, literal: &str) -> bool {
        self.flags.iter().any(|f| f.as_str() == literal)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flag> {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl<'a> IntoIterator for &'a FlagSet {
    type Item = &'a Flag;
    type IntoIter = std::slice::Iter<'a, Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = FlagSet::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

/// Mapping from command name to the flags listed under it.
///
/// Iteration order is always lexicographic on the command name, which makes
/// every rendering derived from the table deterministic.
///
/// # Examples
///
/// ```
/// use helpsync_core::{CommandTable, Flag};
///
/// let mut table = CommandTable::new();
/// table.declare("clean");
/// table.declare("check");
/// table.add_flag("clean", Flag::parse("--force").unwrap());
///
/// assert_eq!(table.command_names(), ["check", "clean"]);
/// assert!(table.flags("clean").unwrap().contains("--force"));
/// assert!(table.flags("check").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTable {
    commands: BTreeMap<String, FlagSet>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `command` with an empty flag set.
    ///
    /// Declaring an existing command resets its flags.
    pub fn declare(&mut self, command: &str) {
        self.commands.insert(command.to_string(), FlagSet::new());
    }

    /// Appends `flag` to `command`'s flag set.
    ///
    /// Returns `false` when the command is unknown or the flag is a
    /// duplicate.
    pub fn add_flag(&mut self, command: &str, flag: Flag) -> bool {
        match self.commands.get_mut(command) {
            Some(flags) => flags.insert(flag),
            None => false,
        }
    }

    pub fn flags(&self, command: &str) -> Option<&FlagSet> {
        self.commands.get(command)
    }

    pub fn contains(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    /// Returns command names in lexicographic order.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagSet)> {
        self.commands.iter().map(|(name, flags)| (name.as_str(), flags))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
