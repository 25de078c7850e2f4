//! Long-table descriptors and reflow into floating tables.
//!
//! `longtable` environments paginate and cannot float; converted notes read
//! better as a single floating `table` wrapping a `tabularx` sized to the
//! line width. The dissection here is deliberately partial: when a marker
//! needed for an extraction step is missing, the caller keeps the original
//! block rather than emitting a malformed table.

use crate::scan::{extract_braced, skip_optional};
use regex::Regex;

/// Where a caption sits relative to the tabular body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionSide {
    Above,
    Below,
}

/// Caption attached to a reflowed table. Either part may be absent when
/// the caption was recovered from commands embedded in the source block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCaption {
    pub text: Option<String>,
    pub label: Option<String>,
    pub side: CaptionSide,
}

impl TableCaption {
    /// Caption from the plain-text `Table <slug>: <caption>` convention.
    pub fn convention(slug: &str, text: &str, side: CaptionSide) -> Self {
        Self {
            text: Some(text.trim().to_string()),
            label: Some(format!("tbl:{}", slug)),
            side,
        }
    }

    /// Caption recovered from `\caption`/`\label` commands inside the
    /// block; placement is always above, matching where the converter put
    /// the commands.
    pub fn embedded(text: Option<String>, label: Option<String>) -> Self {
        Self {
            text,
            label,
            side: CaptionSide::Above,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.label.is_none()
    }
}

const BEGIN: &str = "\\begin{longtable}";

/// A dissected `longtable` block, ready to re-emit as a floating table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongTable {
    /// Normalized column specification, bounded by `@{}` markers.
    pub col_spec: String,
    /// Header rows followed by data rows, ending in a bottom rule.
    pub body: String,
}

impl LongTable {
    /// Dissect a longtable block. Returns `None` when the begin marker,
    /// the column-spec brace, or the top rule is missing; the caller then
    /// leaves the block untouched.
    pub fn parse(block: &str) -> Option<Self> {
        let begin = block.find(BEGIN)?;
        let mut idx = begin + BEGIN.len();
        idx = skip_optional(block, idx);
        let brace = idx + block[idx..].find('{')?;
        let (raw_spec, _) = extract_braced(block, brace + 1);
        let col_spec = normalize_col_spec(raw_spec);

        if !block.contains("\\toprule") {
            return None;
        }

        let header = match Regex::new(r"(?s)\\toprule.*?\\endfirsthead")
            .unwrap()
            .find(block)
        {
            Some(m) => m.as_str().replace("\\endfirsthead", "").trim().to_string(),
            None => Regex::new(r"(?s)\\toprule.*?\\midrule")
                .unwrap()
                .find(block)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
        };

        let data = Regex::new(r"(?s)\\endlastfoot(.*?)\\end\{longtable\}")
            .unwrap()
            .captures(block)
            .or_else(|| {
                Regex::new(r"(?s)\\endhead(.*?)\\end\{longtable\}")
                    .unwrap()
                    .captures(block)
            })
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_default();

        let mut body = [header, data]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if !body.is_empty() && !body.contains("\\bottomrule") {
            body.push_str("\n\\bottomrule");
        }

        Some(Self { col_spec, body })
    }

    /// Render as a floating table wrapping a full-width `tabularx`, with
    /// the caption and label on the requested side of the body.
    pub fn to_latex(&self, caption: Option<&TableCaption>) -> String {
        let mut lines = vec![
            "\\begin{table}[htbp]".to_string(),
            "  \\centering".to_string(),
        ];
        if let Some(cap) = caption {
            if cap.side == CaptionSide::Above {
                push_caption_lines(&mut lines, cap);
            }
        }
        lines.push(format!(
            "  \\begin{{tabularx}}{{\\linewidth}}{{{}}}",
            self.col_spec
        ));
        if !self.body.is_empty() {
            lines.push(format!("    {}", self.body));
        }
        lines.push("  \\end{tabularx}".to_string());
        if let Some(cap) = caption {
            if cap.side == CaptionSide::Below {
                push_caption_lines(&mut lines, cap);
            }
        }
        lines.push("\\end{table}\n".to_string());
        lines.join("\n")
    }
}

fn push_caption_lines(lines: &mut Vec<String>, cap: &TableCaption) {
    if let Some(ref text) = cap.text {
        lines.push(format!("  \\caption{{{}}}", text));
    }
    if let Some(ref label) = cap.label {
        lines.push(format!("  \\label{{{}}}", label));
    }
}

/// Normalize a longtable column spec for `tabularx`: fixed-width column
/// types (`p`/`m`/`b` with a braced width, nested braces honored) become
/// flexible `X` columns, and the spec is bounded by `@{}` padding
/// suppressors on both ends without duplicating existing ones.
pub fn normalize_col_spec(spec: &str) -> String {
    let compact = spec.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(compact.len());
    let mut i = 0;
    while i < compact.len() {
        let ch = compact[i..].chars().next().unwrap();
        if matches!(ch, 'p' | 'm' | 'b') && compact[i + 1..].starts_with('{') {
            let (_, next) = extract_braced(&compact, i + 2);
            out.push('X');
            i = next;
            continue;
        }
        out.push(ch);
        i += ch.len_utf8();
    }
    let out = out.trim();
    let prefix = if out.starts_with("@{}") { "" } else { "@{}" };
    let suffix = if out.ends_with("@{}") { "" } else { "@{}" };
    format!("{}{}{}", prefix, out, suffix)
}

/// Extract an embedded `\caption{...}` / `\label{...}` pair from a block.
/// The caption is read with the depth-counting scanner so nested braces
/// survive; a label command nested inside the caption text is stripped.
pub fn extract_embedded_caption(block: &str) -> (Option<String>, Option<String>) {
    const CAPTION_CMD: &str = "\\caption{";
    let mut caption = block.find(CAPTION_CMD).map(|idx| {
        let (text, _) = extract_braced(block, idx + CAPTION_CMD.len());
        text.trim().to_string()
    });

    let label_re = Regex::new(r"\\label\{([^}]+)\}").unwrap();
    let label = label_re
        .captures(block)
        .map(|caps| caps[1].trim().to_string());
    if label.is_some() {
        if let Some(text) = caption.take() {
            caption = Some(label_re.replace_all(&text, "").trim().to_string());
        }
    }

    (
        caption.filter(|c| !c.is_empty()),
        label.filter(|l| !l.is_empty()),
    )
}
