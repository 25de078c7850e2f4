//! # retex
//!
//! Rewrites converter-generated, wiki-flavored LaTeX into LaTeX that
//! compiles standalone.
//!
//! Markdown-to-LaTeX converters run over wiki-dialect notes leave behind
//! artifacts that neither render nor cross-reference: embedded-image
//! directives, `[[...]]` wiki links, escaped bracket pairs, multi-page
//! `longtable` environments, literal heading markup, and non-ASCII arrow
//! glyphs. retex runs an ordered set of rewrite passes over the document
//! and re-emits well-formed figures, tables and hyperref links with
//! deterministically derived labels.
//!
//! ## Quick Start
//!
//! ```
//! let latex = retex::process_str("See [[Setup#Install|the installer]].");
//! assert_eq!(latex, "See \\hyperref[setup--install]{the installer}.");
//! ```
//!
//! ## Features
//!
//! - **Figure synthesis**: `![[image]]` directives become floating figures
//!   with captions and filename-derived labels
//! - **Link resolution**: wiki links become `\hyperref` commands with
//!   slug-derived labels, optionally namespaced per source file
//! - **Table reflow**: paginating `longtable` blocks become floating
//!   `tabularx` tables; `Table <slug>: ...` captions are detected and
//!   later mentions back-patched into references
//! - **Cleanup passes**: escaped brackets, stray braces, Unicode arrows
//!   and `\[ ... \]` display math
//! - **Template splicing**: processed bodies drop into a template between
//!   literal marker lines
//! - **Batch mode**: independent documents process in parallel via Rayon

pub mod assets;
pub mod detect;
pub mod error;
pub mod model;
pub mod passes;
pub mod scan;
pub mod template;

// Re-export commonly used types
pub use assets::{copy_assets, ImageResolver, IMAGE_DEFAULT_ROOT, IMAGE_ROOTS};
pub use detect::{has_artifacts, scan as scan_artifacts, ArtifactScanner, ArtifactStats};
pub use error::{Error, Result};
pub use model::{slugify, CaptionSide, FigureRef, LongTable, TableCaption, WikiLink};
pub use passes::{Pipeline, PipelineOptions};
pub use template::{inject_body, MARKER_END, MARKER_START};

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Process a document string with default options.
pub fn process_str(text: &str) -> String {
    Pipeline::default().process(text)
}

/// Process a document string with custom options.
pub fn process_str_with_options(text: &str, options: PipelineOptions) -> String {
    Pipeline::new(options).process(text)
}

/// Process a file in place with default options.
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<()> {
    process_file_with_options(path, PipelineOptions::default())
}

/// Process a file in place with custom options.
pub fn process_file_with_options<P: AsRef<Path>>(path: P, options: PipelineOptions) -> Result<()> {
    let path = path.as_ref();
    let text = read_document(path)?;
    fs::write(path, Pipeline::new(options).process(&text))?;
    Ok(())
}

/// Read a document, surfacing invalid UTF-8 as an encoding error.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|err| Error::Encoding(format!("{}: {}", path.display(), err)))
}

/// Process every `.tex` file directly under a directory, in place.
///
/// Documents are independent, so they are processed in parallel. Returns
/// the processed paths in sorted order.
pub fn process_dir<P: AsRef<Path>>(dir: P, options: &PipelineOptions) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("tex")
        })
        .collect();
    files.sort();

    let pipeline = Pipeline::new(options.clone());
    files
        .par_iter()
        .map(|path| {
            let text = read_document(path)?;
            fs::write(path, pipeline.process(&text))?;
            Ok(())
        })
        .collect::<Result<Vec<()>>>()?;
    Ok(files)
}

/// Builder for configuring and running the rewrite pipeline.
///
/// # Example
///
/// ```
/// let latex = retex::Retex::new()
///     .with_file_slug("setup-guide")
///     .process_str("See [[#Install]].");
/// assert!(latex.contains("setup-guide--install"));
/// ```
pub struct Retex {
    options: PipelineOptions,
}

impl Retex {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: PipelineOptions::default(),
        }
    }

    /// Set the label-namespacing slug directly.
    pub fn with_file_slug(mut self, slug: impl Into<String>) -> Self {
        self.options = self.options.with_file_slug(slug);
        self
    }

    /// Derive the label-namespacing slug from the source note's filename.
    pub fn with_source_note<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.options = self.options.with_source_note(path);
        self
    }

    /// Replace the ordered image search roots.
    pub fn with_image_roots(mut self, roots: Vec<String>) -> Self {
        self.options = self.options.with_image_roots(roots);
        self
    }

    /// Disable page breaks before sections.
    pub fn without_page_breaks(mut self) -> Self {
        self.options = self.options.with_page_breaks(false);
        self
    }

    /// Disable display-math numbering.
    pub fn without_numbered_equations(mut self) -> Self {
        self.options = self.options.with_numbered_equations(false);
        self
    }

    /// Build the configured pipeline.
    pub fn build(self) -> Pipeline {
        Pipeline::new(self.options)
    }

    /// Process a document string.
    pub fn process_str(self, text: &str) -> String {
        self.build().process(text)
    }

    /// Process a file in place.
    pub fn process_file<P: AsRef<Path>>(self, path: P) -> Result<()> {
        process_file_with_options(path, self.options)
    }

    /// Process a file and write the result somewhere else.
    pub fn process_file_to<P: AsRef<Path>, Q: AsRef<Path>>(self, input: P, output: Q) -> Result<()> {
        let text = read_document(input.as_ref())?;
        fs::write(output, self.build().process(&text))?;
        Ok(())
    }

    /// Process a file and splice the result into a template.
    pub fn process_into_template<P: AsRef<Path>, Q: AsRef<Path>>(
        self,
        input: P,
        template: Q,
    ) -> Result<String> {
        let text = read_document(input.as_ref())?;
        let template_text = read_document(template.as_ref())?;
        inject_body(&template_text, &self.build().process(&text))
    }
}

impl Default for Retex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_options() {
        let retex = Retex::new()
            .with_file_slug("notes")
            .without_page_breaks()
            .without_numbered_equations();
        assert_eq!(retex.options.file_slug.as_deref(), Some("notes"));
        assert!(!retex.options.page_break_sections);
        assert!(!retex.options.number_equations);
    }

    #[test]
    fn test_process_str_resolves_links() {
        let output = process_str("See [[Setup]].");
        assert_eq!(output, "See \\hyperref[setup]{Setup}.");
    }

    #[test]
    fn test_process_file_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("doc.tex");
        fs::write(&path, "Intro [[Setup]] outro.\n").unwrap();
        process_file(&path).unwrap();
        let output = fs::read_to_string(&path).unwrap();
        assert_eq!(output, "Intro \\hyperref[setup]{Setup} outro.\n");
    }

    #[test]
    fn test_read_document_rejects_invalid_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("doc.tex");
        fs::write(&path, [0x66, 0xFF, 0xFE]).unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_process_dir_only_touches_tex_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.tex"), "[[A]]").unwrap();
        fs::write(tmp.path().join("b.tex"), "[[B]]").unwrap();
        fs::write(tmp.path().join("keep.md"), "[[untouched]]").unwrap();

        let processed = process_dir(tmp.path(), &PipelineOptions::default()).unwrap();
        assert_eq!(processed.len(), 2);
        assert!(fs::read_to_string(tmp.path().join("a.tex"))
            .unwrap()
            .contains("\\hyperref[a]{A}"));
        assert_eq!(
            fs::read_to_string(tmp.path().join("keep.md")).unwrap(),
            "[[untouched]]"
        );
    }
}
