//! Artifact detection without rewriting.
//!
//! Used by the CLI `info` command and callers that want to know whether a
//! document needs processing at all.

use crate::passes::ARROW_MACROS;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Counts of each wiki-artifact class found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStats {
    /// Escaped bracket-pair sequences (`{[}{[}` / `{]}{]}`).
    pub escaped_brackets: usize,
    /// Embedded-image directives (`![[...]]` lines).
    pub embedded_images: usize,
    /// Remaining wiki-link directives, inline image mentions included.
    pub wiki_links: usize,
    /// `longtable` environments.
    pub long_tables: usize,
    /// Literal escaped Markdown headings (`\#\#\#\#`).
    pub literal_headings: usize,
    /// Mapped Unicode arrow glyphs.
    pub arrow_glyphs: usize,
    /// Bracket-delimited display-math openers.
    pub display_math: usize,
}

impl ArtifactStats {
    /// Total artifacts across all classes.
    pub fn total(&self) -> usize {
        self.escaped_brackets
            + self.embedded_images
            + self.wiki_links
            + self.long_tables
            + self.literal_headings
            + self.arrow_glyphs
            + self.display_math
    }

    /// Whether the document carries no artifact the pipeline rewrites.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| crate::error::Error::Other(err.to_string()))
    }
}

/// Scanner counting artifact classes; patterns compile once.
pub struct ArtifactScanner {
    escaped: Regex,
    embedded: Regex,
    link: Regex,
    long_table: Regex,
    literal_heading: Regex,
}

impl ArtifactScanner {
    pub fn new() -> Self {
        Self {
            escaped: Regex::new(r"\{\[\}\{\[\}|\{\]\}\{\]\}").unwrap(),
            embedded: Regex::new(r"(?m)^!\[\[[^\]]+\]\]").unwrap(),
            link: Regex::new(r"(?s)(^|[^!\[])\[\[.*?\]\]").unwrap(),
            long_table: Regex::new(r"\\begin\{longtable\}").unwrap(),
            literal_heading: Regex::new(r"(?m)^\\\#\\\#\\\#\\\#\s").unwrap(),
        }
    }

    /// Count every artifact class in one scan of the document.
    pub fn scan(&self, text: &str) -> ArtifactStats {
        ArtifactStats {
            escaped_brackets: self.escaped.find_iter(text).count(),
            embedded_images: self.embedded.find_iter(text).count(),
            wiki_links: self.link.find_iter(text).count(),
            long_tables: self.long_table.find_iter(text).count(),
            literal_headings: self.literal_heading.find_iter(text).count(),
            arrow_glyphs: text
                .chars()
                .filter(|ch| {
                    ARROW_MACROS
                        .iter()
                        .any(|(glyph, _)| glyph.chars().next() == Some(*ch))
                })
                .count(),
            display_math: count_display_math(text),
        }
    }
}

impl Default for ArtifactScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Count `\[` openers that are display math rather than `\\[len]` breaks.
fn count_display_math(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0;
    let mut search = 0;
    while let Some(offset) = text[search..].find("\\[") {
        let start = search + offset;
        if start == 0 || bytes[start - 1] != b'\\' {
            count += 1;
        }
        search = start + 2;
    }
    count
}

/// Scan a document with a fresh scanner.
pub fn scan(text: &str) -> ArtifactStats {
    ArtifactScanner::new().scan(text)
}

/// Whether a document carries any artifact the pipeline rewrites.
pub fn has_artifacts(text: &str) -> bool {
    !scan(text).is_clean()
}
