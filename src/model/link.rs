//! Wiki-link descriptors.

use super::slugify;

/// A parsed `[[...]]` wiki link: target note, optional heading anchor,
/// optional display alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    /// Target note name; empty for same-document links.
    pub note: String,
    /// Heading anchor; empty when the link targets a whole note.
    pub heading: String,
    /// Display alias, when the author provided one.
    pub alias: Option<String>,
}

impl WikiLink {
    /// Parse the inner text of a `[[...]]` directive.
    ///
    /// The upstream converter escapes `#` and `|` inside link targets;
    /// both are undone before splitting on them.
    pub fn parse(inner: &str) -> Self {
        let inner = inner.replace("\\#", "#").replace("\\textbar", "|");
        let inner = inner.trim();
        let (target, alias) = match inner.split_once('|') {
            Some((target, alias)) => (target.trim(), Some(alias.trim())),
            None => (inner, None),
        };
        let (note, heading) = match target.split_once('#') {
            Some((note, heading)) => (note.trim(), heading.trim()),
            None => (target, ""),
        };
        Self {
            note: note.to_string(),
            heading: heading.to_string(),
            alias: alias.filter(|a| !a.is_empty()).map(str::to_string),
        }
    }

    /// The text shown to the reader: alias, else heading, else note name.
    pub fn display(&self) -> &str {
        if let Some(ref alias) = self.alias {
            alias
        } else if !self.heading.is_empty() {
            &self.heading
        } else {
            &self.note
        }
    }

    /// The label this link resolves to.
    ///
    /// `slug(note)--slug(heading)` when both parts are present,
    /// `slug(heading)` for a same-document link, `slug(note)` otherwise.
    /// Same-document heading links are namespaced by `file_slug` when one
    /// is configured, so labels stay unique across a multi-file build.
    pub fn label(&self, file_slug: Option<&str>) -> String {
        if self.heading.is_empty() {
            return slugify(&self.note);
        }
        let heading = slugify(&self.heading);
        if !self.note.is_empty() {
            format!("{}--{}", slugify(&self.note), heading)
        } else if let Some(file_slug) = file_slug {
            format!("{}--{}", file_slug, heading)
        } else {
            heading
        }
    }

    /// Render the link as a `\hyperref` command.
    pub fn to_latex(&self, file_slug: Option<&str>) -> String {
        format!("\\hyperref[{}]{{{}}}", self.label(file_slug), self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_only() {
        let link = WikiLink::parse("Setup");
        assert_eq!(link.note, "Setup");
        assert_eq!(link.heading, "");
        assert_eq!(link.alias, None);
        assert_eq!(link.display(), "Setup");
        assert_eq!(link.label(None), "setup");
    }

    #[test]
    fn test_parse_note_heading_alias() {
        let link = WikiLink::parse("Setup#Install|the installer");
        assert_eq!(link.note, "Setup");
        assert_eq!(link.heading, "Install");
        assert_eq!(link.display(), "the installer");
        assert_eq!(link.label(None), "setup--install");
    }

    #[test]
    fn test_parse_heading_only() {
        let link = WikiLink::parse("#Data and info");
        assert_eq!(link.note, "");
        assert_eq!(link.display(), "Data and info");
        assert_eq!(link.label(None), "data-and-info");
    }

    #[test]
    fn test_same_document_namespacing() {
        let link = WikiLink::parse("#Install");
        assert_eq!(link.label(Some("setup-guide")), "setup-guide--install");
        // Links that already carry a note name are never renamespaced.
        let link = WikiLink::parse("Other#Install");
        assert_eq!(link.label(Some("setup-guide")), "other--install");
    }

    #[test]
    fn test_parse_unescapes_converter_output() {
        let link = WikiLink::parse("Setup\\#Install\\textbar alias");
        assert_eq!(link.heading, "Install");
        assert_eq!(link.alias.as_deref(), Some("alias"));
    }

    #[test]
    fn test_to_latex() {
        let link = WikiLink::parse("Setup#Install|the installer");
        assert_eq!(
            link.to_latex(None),
            "\\hyperref[setup--install]{the installer}"
        );
    }
}
