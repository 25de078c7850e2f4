//! Image path resolution and asset staging.

use crate::error::Result;
use crate::model::IMAGE_EXTS;
use log::debug;
use std::fs;
use std::path::Path;

/// Directory emitted for resolved and unresolved images alike.
pub const IMAGE_DEFAULT_ROOT: &str = "figures";

/// Ordered roots searched when resolving a relative image path; the first
/// candidate that exists on disk wins.
pub const IMAGE_ROOTS: [&str; 4] = ["figures", "input/figures", "input/attachments", "input"];

/// Resolves authored image paths against the on-disk search roots.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    roots: Vec<String>,
}

impl ImageResolver {
    pub fn new(roots: Vec<String>) -> Self {
        Self { roots }
    }

    /// Normalize an authored path and resolve it under the search roots.
    ///
    /// URLs, absolute paths (incl. drive-letter paths) and paths already
    /// under a known root pass through unchanged. Anything else is probed
    /// under each root, full relative path first, then basename, and
    /// re-expressed under `figures/`; when nothing exists the best-guess
    /// `figures/<path>` is emitted and final rendering is left to the
    /// compiler.
    pub fn resolve(&self, raw: &str) -> String {
        let path = raw.trim().trim_matches(|ch| ch == '{' || ch == '}');
        // Undo converter escaping so the file can be found on disk.
        let path = path
            .replace("\\ ", " ")
            .replace("\\_", "_")
            .replace('\\', "/");

        if path.starts_with("http://") || path.starts_with("https://") {
            return path;
        }
        if is_absolute(&path) {
            return path;
        }
        if self
            .roots
            .iter()
            .any(|root| path.starts_with(&format!("{}/", root)))
        {
            return path;
        }

        let basename = Path::new(&path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let mut candidates: Vec<(String, &str)> = self
            .roots
            .iter()
            .map(|root| (format!("{}/{}", root, path), path.as_str()))
            .collect();
        if let Some(ref name) = basename {
            if *name != path {
                for root in &self.roots {
                    candidates.push((format!("{}/{}", root, name), name.as_str()));
                }
            }
        }

        for (probe, rel) in &candidates {
            if Path::new(probe).exists() {
                return format!("{}/{}", IMAGE_DEFAULT_ROOT, rel);
            }
        }
        debug!("image not found under any root, assuming {IMAGE_DEFAULT_ROOT}/: {path}");
        format!("{}/{}", IMAGE_DEFAULT_ROOT, path)
    }

    /// Resolve and re-escape underscores and spaces for TeX output.
    pub fn tex_path(&self, raw: &str) -> String {
        self.resolve(raw).replace('_', "\\_").replace(' ', "\\ ")
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(IMAGE_ROOTS.iter().map(|root| root.to_string()).collect())
    }
}

fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || (bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/')
}

/// Copy files with recognized image extensions from the source roots into
/// the figures directory, skipping names already present. Returns how many
/// files were copied.
pub fn copy_assets(roots: &[String], figures_dir: &Path) -> Result<usize> {
    fs::create_dir_all(figures_dir)?;
    let mut copied = 0;
    for root in roots {
        let root = Path::new(root);
        if root == figures_dir || !root.is_dir() {
            continue;
        }
        for entry in fs::read_dir(root)? {
            let path = entry?.path();
            if !path.is_file() || !is_image_file(&path) {
                continue;
            }
            let Some(name) = path.file_name() else {
                continue;
            };
            let dest = figures_dir.join(name);
            if !dest.exists() {
                fs::copy(&path, &dest)?;
                copied += 1;
            }
        }
    }
    Ok(copied)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let dotted = format!(".{}", ext.to_ascii_lowercase());
            IMAGE_EXTS.contains(&dotted.as_str())
        })
        .unwrap_or(false)
}
