//! Figure descriptors for embedded images.

use super::slugify;
use std::path::Path;

/// Image extensions recognized as figures.
pub const IMAGE_EXTS: [&str; 5] = [".png", ".jpg", ".jpeg", ".svg", ".pdf"];

/// A figure synthesized from an embedded-image directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureRef {
    /// Path as authored in the note.
    pub raw: String,
    /// Resolved path, escaped for TeX output.
    pub tex_path: String,
    /// Caption body, without the trailing period.
    pub caption: String,
    /// Label without the `fig:` prefix, slugified from the filename stem.
    pub slug: String,
}

impl FigureRef {
    /// Build a descriptor from the authored path, its resolved TeX form,
    /// and the caption body. The label is always derived from the filename
    /// stem, never from the caption, so inline references elsewhere in the
    /// document resolve to the same label.
    pub fn new(raw: &str, tex_path: String, caption: String) -> Self {
        Self {
            slug: Self::label_for(raw),
            raw: raw.to_string(),
            tex_path,
            caption,
        }
    }

    /// Whether a path ends in a recognized image extension.
    pub fn is_image_path(path: &str) -> bool {
        let lower = path.to_ascii_lowercase();
        IMAGE_EXTS.iter().any(|ext| lower.ends_with(ext))
    }

    /// Label slug for a reference to an image defined elsewhere.
    pub fn label_for(path: &str) -> String {
        slugify(&path_stem(path.trim()))
    }

    /// Render as a floating figure environment. The caption gets exactly
    /// one trailing period.
    pub fn to_latex(&self) -> String {
        format!(
            "\\begin{{figure}}[htbp]\n    \\centering\n    \\includegraphics[width=\\textwidth]{{{}}}\n    \\caption{{{}.}}\n    \\label{{fig:{}}}\n\\end{{figure}}\n\n",
            self.tex_path, self.caption, self.slug
        )
    }
}

/// Filename stem of an authored path, with TeX space escapes undone.
pub fn path_stem(path: &str) -> String {
    let raw = path.replace("\\ ", " ");
    Path::new(&raw)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Derive a caption from the filename when the note carries none:
/// underscores and hyphens become spaces, first letter capitalized.
pub fn caption_from_filename(path: &str) -> String {
    let stem = path_stem(path);
    let caption = stem.replace(['_', '-'], " ").trim().to_string();
    if caption.is_empty() {
        return "Figure".to_string();
    }
    let mut chars = caption.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => caption,
    }
}
