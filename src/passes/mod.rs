//! The ordered rewrite passes and their orchestration.
//!
//! Each pass is a pure text transform; the pipeline runs them in a fixed
//! order over one document at a time. The only state threaded between
//! steps is the list of table slugs collected by the table pass, consumed
//! by its own back-reference step within the same invocation.

mod escapes;
mod figures;
mod headings;
mod links;
mod math;
mod repair;
mod tables;

pub use escapes::EscapePass;
pub use figures::FigurePass;
pub use headings::HeadingPass;
pub use links::LinkPass;
pub use math::{MathPass, ARROW_MACROS};
pub use repair::RepairPass;
pub use tables::TablePass;

use crate::assets::{ImageResolver, IMAGE_ROOTS};
use crate::model::slugify;
use std::path::Path;

/// Options controlling the rewrite pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Slug used to namespace same-document heading labels, usually
    /// derived from the source note's filename.
    pub file_slug: Option<String>,

    /// Ordered roots searched when resolving relative image paths.
    pub image_roots: Vec<String>,

    /// Insert a page break before each top-level section.
    pub page_break_sections: bool,

    /// Convert `\[ ... \]` display math into numbered equations.
    pub number_equations: bool,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label-namespacing slug directly.
    pub fn with_file_slug(mut self, slug: impl Into<String>) -> Self {
        self.file_slug = Some(slug.into());
        self
    }

    /// Derive the label-namespacing slug from a source note's filename.
    pub fn with_source_note<P: AsRef<Path>>(mut self, path: P) -> Self {
        let stem = path
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let slug = slugify(&stem);
        self.file_slug = if slug.is_empty() { None } else { Some(slug) };
        self
    }

    /// Replace the ordered image search roots.
    pub fn with_image_roots(mut self, roots: Vec<String>) -> Self {
        self.image_roots = roots;
        self
    }

    /// Enable or disable page breaks before sections.
    pub fn with_page_breaks(mut self, enable: bool) -> Self {
        self.page_break_sections = enable;
        self
    }

    /// Enable or disable display-math numbering.
    pub fn with_numbered_equations(mut self, enable: bool) -> Self {
        self.number_equations = enable;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            file_slug: None,
            image_roots: IMAGE_ROOTS.iter().map(|root| root.to_string()).collect(),
            page_break_sections: true,
            number_equations: true,
        }
    }
}

/// The full rewrite pipeline. Patterns compile once; `process` may then
/// be called for any number of documents.
pub struct Pipeline {
    options: PipelineOptions,
    escapes: EscapePass,
    figures: FigurePass,
    links: LinkPass,
    headings: HeadingPass,
    tables: TablePass,
    repair: RepairPass,
    math: MathPass,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            escapes: EscapePass::new(),
            figures: FigurePass::new(ImageResolver::new(options.image_roots.clone())),
            links: LinkPass::new(options.file_slug.clone()),
            headings: HeadingPass::new(),
            tables: TablePass::new(),
            repair: RepairPass::new(),
            math: MathPass::new(),
            options,
        }
    }

    /// Run every pass in order over one document.
    pub fn process(&self, text: &str) -> String {
        // Bracket un-escaping first; every later pattern matches on `[[`.
        let mut text = self.escapes.apply(text);
        text = self.figures.apply(&text);
        // The catch-all link pass runs only after every image-specific
        // form has been consumed.
        text = self.links.apply(&text);
        if self.options.page_break_sections {
            text = self.headings.page_breaks(&text);
        }
        text = self.headings.literal_headings(&text);
        // Back-references are substituted only once every block has been
        // converted; the replacement text must not re-enter table matching.
        let (text_with_tables, slugs) = self.tables.apply(&text);
        text = self
            .tables
            .substitute_references(&text_with_tables, &slugs);
        text = self.repair.apply(&text);
        text = self.math.arrows(&text);
        if self.options.number_equations {
            text = self.math.equations(&text);
        }
        text
    }

    /// The options this pipeline was built with.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}
