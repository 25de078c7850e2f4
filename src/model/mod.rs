//! Transient descriptors produced by the rewrite passes.
//!
//! Nothing here outlives a single pipeline invocation; each descriptor is
//! parsed out of the document text, re-rendered as LaTeX, and dropped.

mod figure;
mod link;
mod table;

pub use figure::{caption_from_filename, path_stem, FigureRef, IMAGE_EXTS};
pub use link::WikiLink;
pub use table::{
    extract_embedded_caption, normalize_col_spec, CaptionSide, LongTable, TableCaption,
};

/// Turn free text into a LaTeX-safe label fragment:
/// `"Data and info"` -> `"data-and-info"`.
///
/// Whitespace runs collapse to a single hyphen, everything outside
/// `[0-9A-Za-z-]` is removed, and the result is lower-cased. Distinct
/// inputs may collapse to the same slug; collisions are not detected.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_gap = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            in_gap = true;
            continue;
        }
        if in_gap {
            slug.push('-');
            in_gap = false;
        }
        if ch.is_ascii_alphanumeric() || ch == '-' {
            slug.push(ch.to_ascii_lowercase());
        }
    }
    slug
}
