//! Minimal template model for completion scripts and README sections.
//!
//! A template is parsed once into an ordered list of [`Segment`]s. A
//! placeholder is `{key}` with `key` matching `[a-z_]+`; any other brace text
//! (shell parameter expansion, zsh brace expansion, awk programs) stays
//! literal.
//!
//! Rendering resolves each placeholder against [`Bindings`]:
//!
//! - bound key → the bound value (possibly empty)
//! - unbound key → the original `{key}` text, unchanged
//!
//! Keys bound but absent from the template are ignored.

use std::collections::BTreeMap;

/// One piece of a parsed [`Template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed template.
///
/// # Examples
///
/// ```
/// use helpsync_core::{Bindings, Template};
///
/// let template = Template::parse("commands=\"{commands}\" ${COMP_WORDS[1]} {unknown}");
/// let mut bindings = Bindings::new();
/// bindings.bind("commands", "check clean");
///
/// assert_eq!(
///     template.render(&bindings),
///     "commands=\"check clean\" ${COMP_WORDS[1]} {unknown}"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match placeholder_key(after) {
                Some(key) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(key.to_string()));
                    rest = &after[key.len() + 1..];
                }
                None => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the placeholder keys in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(key) => Some(key.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, bindings: &Bindings) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(key) => match bindings.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

/// Returns the key when `text` starts with `key}` and `key` matches `[a-z_]+`.
fn placeholder_key(text: &str) -> Option<&str> {
    let end = text
        .find(|ch: char| !(ch.is_ascii_lowercase() || ch == '_'))
        .unwrap_or(text.len());
    if end == 0 || !text[end..].starts_with('}') {
        return None;
    }
    Some(&text[..end])
}

/// Placeholder key → rendered value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to `value`, replacing any earlier binding.
    pub fn bind(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}
