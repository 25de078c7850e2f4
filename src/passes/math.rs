//! Arrow glyph mapping and display-math numbering.

use regex::Regex;

/// Unicode arrows that can break compilation depending on engine/fonts,
/// mapped to `\ensuremath` so the replacement works both in text and in
/// existing math.
pub const ARROW_MACROS: [(&str, &str); 13] = [
    ("→", "\\ensuremath{\\to}"),
    ("←", "\\ensuremath{\\leftarrow}"),
    ("↔", "\\ensuremath{\\leftrightarrow}"),
    ("⇒", "\\ensuremath{\\Rightarrow}"),
    ("⇐", "\\ensuremath{\\Leftarrow}"),
    ("⇔", "\\ensuremath{\\Leftrightarrow}"),
    ("↦", "\\ensuremath{\\mapsto}"),
    ("⟶", "\\ensuremath{\\longrightarrow}"),
    ("⟵", "\\ensuremath{\\longleftarrow}"),
    ("⟷", "\\ensuremath{\\longleftrightarrow}"),
    ("⟹", "\\ensuremath{\\Longrightarrow}"),
    ("⟸", "\\ensuremath{\\Longleftarrow}"),
    ("⟺", "\\ensuremath{\\Longleftrightarrow}"),
];

/// Glyph substitution and `\[ ... \]` conversion to numbered equations.
pub struct MathPass {
    arrows: Regex,
}

impl MathPass {
    pub fn new() -> Self {
        let alternation = ARROW_MACROS
            .iter()
            .map(|(glyph, _)| *glyph)
            .collect::<Vec<_>>()
            .join("|");
        Self {
            arrows: Regex::new(&alternation).unwrap(),
        }
    }

    /// Replace every mapped arrow glyph. Short-circuits when none occur;
    /// that is purely a fast path, not needed for correctness.
    pub fn arrows(&self, text: &str) -> String {
        if !ARROW_MACROS.iter().any(|(glyph, _)| text.contains(glyph)) {
            return text.to_string();
        }
        self.arrows
            .replace_all(text, |caps: &regex::Captures| {
                ARROW_MACROS
                    .iter()
                    .find(|(glyph, _)| *glyph == &caps[0])
                    .map(|(_, macro_)| *macro_)
                    .unwrap_or_default()
            })
            .into_owned()
    }

    /// Convert bracket-delimited display math into numbered equations.
    ///
    /// A small scanner rather than a regex: `\\[2pt]` line-break arguments
    /// must not open a span, and the regex crate has no lookbehind to
    /// exclude them.
    pub fn equations(&self, text: &str) -> String {
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len() + 32);
        let mut search = 0;
        let mut last = 0;
        while let Some(offset) = text[search..].find("\\[") {
            let start = search + offset;
            if start > 0 && bytes[start - 1] == b'\\' {
                search = start + 2;
                continue;
            }
            match text[start + 2..].find("\\]") {
                Some(close) => {
                    let end = start + 2 + close;
                    out.push_str(&text[last..start]);
                    out.push_str("\\begin{equation}");
                    out.push_str(&text[start + 2..end]);
                    out.push_str("\\end{equation}");
                    search = end + 2;
                    last = search;
                }
                None => break,
            }
        }
        out.push_str(&text[last..]);
        out
    }
}

impl Default for MathPass {
    fn default() -> Self {
        Self::new()
    }
}
