//! Stray-brace repair on cross-reference, graphics and label commands.

use regex::Regex;

/// Fixes a known brace-balance defect the upstream converter leaves on
/// three commands: an empty brace pair directly followed by the argument
/// and a stray closing brace (`\ref{fig:}name}`). The three fixes are
/// independent string substitutions.
pub struct RepairPass {
    refs: Regex,
    graphics: Regex,
    labels: Regex,
}

impl RepairPass {
    pub fn new() -> Self {
        Self {
            refs: Regex::new(r"\\ref\{fig:\}([^}]+)\}").unwrap(),
            graphics: Regex::new(r"(\\includegraphics\[[^\]]+\])\{\}\s*([^}\s]+)\}").unwrap(),
            labels: Regex::new(r"\\label\{fig:\}([^}]+)\}").unwrap(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let text = self.refs.replace_all(text, "\\ref{fig:${1}}");
        let text = self.graphics.replace_all(&text, "${1}{${2}}");
        self.labels
            .replace_all(&text, "\\label{fig:${1}}")
            .into_owned()
    }
}

impl Default for RepairPass {
    fn default() -> Self {
        Self::new()
    }
}
