//! Wiki-link resolution, the catch-all pass.

use crate::model::WikiLink;
use regex::{Captures, Regex};

/// Rewrites every `[[...]]` directive still standing after the figure pass
/// into a `\hyperref` command. Must run last among the bracket-directive
/// passes so it never consumes an image reference.
pub struct LinkPass {
    file_slug: Option<String>,
    link: Regex,
}

impl LinkPass {
    pub fn new(file_slug: Option<String>) -> Self {
        Self {
            file_slug,
            link: Regex::new(r"(?s)\[\[(.*?)\]\]").unwrap(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.link
            .replace_all(text, |caps: &Captures| {
                WikiLink::parse(&caps[1]).to_latex(self.file_slug.as_deref())
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_link() {
        let pass = LinkPass::new(None);
        assert_eq!(
            pass.apply("See [[Setup]] for details."),
            "See \\hyperref[setup]{Setup} for details."
        );
    }

    #[test]
    fn test_alias_and_heading() {
        let pass = LinkPass::new(None);
        assert_eq!(
            pass.apply("[[Setup#Install|the installer]]"),
            "\\hyperref[setup--install]{the installer}"
        );
    }

    #[test]
    fn test_same_document_link_namespaced() {
        let pass = LinkPass::new(Some("setup-guide".to_string()));
        assert_eq!(
            pass.apply("[[#Install]]"),
            "\\hyperref[setup-guide--install]{Install}"
        );
    }

    #[test]
    fn test_multiple_links_one_line() {
        let pass = LinkPass::new(None);
        let output = pass.apply("[[A]] and [[B]]");
        assert_eq!(output, "\\hyperref[a]{A} and \\hyperref[b]{B}");
    }
}
