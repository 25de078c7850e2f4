//! Bracket un-escaping, the first pass.

use regex::Regex;

/// Collapses the converter's double-escaping of literal bracket pairs
/// (`{[}{[}` -> `[[`, `{]}{]}` -> `]]`). Every later pass matches on the
/// unescaped form, so this must run first.
pub struct EscapePass {
    open: Regex,
    close: Regex,
}

impl EscapePass {
    pub fn new() -> Self {
        Self {
            open: Regex::new(r"\{\[\}\{\[\}").unwrap(),
            close: Regex::new(r"\{\]\}\{\]\}").unwrap(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let text = self.open.replace_all(text, "[[");
        self.close.replace_all(&text, "]]").into_owned()
    }
}

impl Default for EscapePass {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescapes_both_directions() {
        let pass = EscapePass::new();
        assert_eq!(pass.apply("{[}{[}Setup{]}{]}"), "[[Setup]]");
    }

    #[test]
    fn test_leaves_other_braces_alone() {
        let pass = EscapePass::new();
        let text = "\\textbf{[}x{]} and {[}{]}";
        assert_eq!(pass.apply(text), text);
    }
}
