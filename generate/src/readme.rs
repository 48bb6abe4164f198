//! README section synchronization.
//!
//! A section starts at its heading line (followed by its reStructuredText
//! underline when one is configured) and ends either after an inclusive
//! literal ([`SectionEnd::Through`]) or just before a look-ahead literal
//! ([`SectionEnd::Before`]). The whole span, heading included, is replaced by
//! the rendered section text.
//!
//! A missing start or end marker leaves the document untouched.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a section stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionEnd {
    /// Up to and including the first occurrence of this literal.
    Through(String),
    /// Up to, not including, the first occurrence of this literal.
    Before(String),
}

/// Boundary markers of one README section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarkers {
    /// Heading text (e.g. `Detecting gcrypt repos`).
    pub heading: String,
    /// Underline character repeated under the heading; `None` for a bare
    /// heading line.
    pub underline: Option<char>,
    pub end: SectionEnd,
}

impl SectionMarkers {
    /// Text that opens the section.
    pub fn start_marker(&self) -> String {
        match self.underline {
            Some(ch) => {
                let rule: String = std::iter::repeat_n(ch, self.heading.chars().count()).collect();
                format!("{}\n{rule}", self.heading)
            }
            None => self.heading.clone(),
        }
    }
}

/// Replaces every occurrence of the section described by `markers` with
/// `replacement`.
///
/// # Examples
///
/// ```
/// use helpsync_generate::readme::{SectionEnd, SectionMarkers, replace_section};
///
/// let doc = "Intro\n\nUsage\n=====\n\nold text\n\nKnown issues\n============\n";
/// let markers = SectionMarkers {
///     heading: "Usage".to_string(),
///     underline: Some('='),
///     end: SectionEnd::Before("\nKnown issues".to_string()),
/// };
///
/// let updated = replace_section(doc, &markers, "Usage\n=====\n\nnew text\n");
/// assert_eq!(updated, "Intro\n\nUsage\n=====\n\nnew text\n\nKnown issues\n============\n");
/// ```
pub fn replace_section<'a>(
    document: &'a str,
    markers: &SectionMarkers,
    replacement: &str,
) -> Cow<'a, str> {
    let start_marker = markers.start_marker();
    if start_marker.is_empty() {
        return Cow::Borrowed(document);
    }

    let mut out = String::new();
    let mut cursor = 0;
    let mut replaced = 0usize;

    while let Some(found) = document[cursor..].find(&start_marker) {
        let start = cursor + found;
        let search_from = start + start_marker.len();
        let end = match &markers.end {
            SectionEnd::Through(literal) => document[search_from..]
                .find(literal.as_str())
                .map(|idx| search_from + idx + literal.len()),
            SectionEnd::Before(literal) => document[search_from..]
                .find(literal.as_str())
                .map(|idx| search_from + idx),
        };
        let Some(end) = end else {
            debug!(heading = %markers.heading, "section end marker not found");
            break;
        };

        out.push_str(&document[cursor..start]);
        out.push_str(replacement);
        cursor = end;
        replaced += 1;
    }

    if replaced == 0 {
        debug!(heading = %markers.heading, "section not found, document unchanged");
        return Cow::Borrowed(document);
    }

    out.push_str(&document[cursor..]);
    Cow::Owned(out)
}
