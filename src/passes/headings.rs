//! Section page breaks and literal-heading repair.

use regex::Regex;

/// Two small fixes on heading structure: a page break ahead of every
/// top-level section, and literal escaped Markdown headings
/// (`\#\#\#\# Title`) that slipped through the converter.
pub struct HeadingPass {
    section: Regex,
    literal: Regex,
}

impl HeadingPass {
    pub fn new() -> Self {
        Self {
            section: Regex::new(r"(?m)^\\section\{").unwrap(),
            literal: Regex::new(r"(?m)^\\\#\\\#\\\#\\\#\s+(.+)$").unwrap(),
        }
    }

    /// Insert `\newpage` before each `\section` line. Sections already
    /// preceded by one are skipped, which keeps the pipeline idempotent.
    pub fn page_breaks(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 64);
        let mut last = 0;
        for m in self.section.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            if !preceded_by_newpage(&text[..m.start()]) {
                out.push_str("\\newpage\n");
            }
            last = m.start();
        }
        out.push_str(&text[last..]);
        out
    }

    /// Rewrite a literal fourth-level Markdown heading as `\paragraph`.
    pub fn literal_headings(&self, text: &str) -> String {
        self.literal
            .replace_all(text, "\\paragraph{${1}}")
            .into_owned()
    }
}

impl Default for HeadingPass {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the line just before `prefix`'s end is a lone `\newpage`.
fn preceded_by_newpage(prefix: &str) -> bool {
    let Some(prefix) = prefix.strip_suffix('\n') else {
        return false;
    };
    let prefix = prefix.strip_suffix('\r').unwrap_or(prefix);
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    prefix[line_start..].trim() == "\\newpage"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_break_inserted() {
        let pass = HeadingPass::new();
        let output = pass.page_breaks("intro\n\\section{One}\nbody\n\\section{Two}\n");
        assert_eq!(
            output,
            "intro\n\\newpage\n\\section{One}\nbody\n\\newpage\n\\section{Two}\n"
        );
    }

    #[test]
    fn test_page_break_idempotent() {
        let pass = HeadingPass::new();
        let once = pass.page_breaks("\\section{One}\n");
        assert_eq!(once, "\\newpage\n\\section{One}\n");
        assert_eq!(pass.page_breaks(&once), once);
    }

    #[test]
    fn test_mid_line_section_untouched() {
        let pass = HeadingPass::new();
        let text = "see \\section{not a heading line}";
        assert_eq!(pass.page_breaks(text), text);
    }

    #[test]
    fn test_literal_heading_repair() {
        let pass = HeadingPass::new();
        assert_eq!(
            pass.literal_headings("\\#\\#\\#\\# Deployment notes\n"),
            "\\paragraph{Deployment notes}\n"
        );
    }

    #[test]
    fn test_shorter_literal_heading_kept() {
        let pass = HeadingPass::new();
        let text = "\\#\\#\\# Only three\n";
        assert_eq!(pass.literal_headings(text), text);
    }
}
