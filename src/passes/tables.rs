//! Longtable reflow, caption resolution and back-references.

use crate::model::{extract_embedded_caption, CaptionSide, LongTable, TableCaption};
use log::debug;
use regex::{Captures, Regex};

/// Converts `longtable` blocks into floating tables.
///
/// Caption text comes from the plain-text `Table <slug>: <caption>`
/// convention on the line next to the block, or failing that from
/// `\caption`/`\label` commands embedded in the block. The below-form
/// pass runs first; the above-form pass then runs over the updated text,
/// so a converted block is never consumed twice. Conversion returns the
/// slugs it assigned so later prose mentions can be back-patched once
/// every block is rewritten.
pub struct TablePass {
    below: Regex,
    above: Regex,
    bare: Regex,
    caption_line: Regex,
}

const SLUG: &str = "[0-9A-Za-z][0-9A-Za-z-]*";

impl TablePass {
    pub fn new() -> Self {
        let block = r"\\begin\{longtable\}.*?\\end\{longtable\}";
        Self {
            below: Regex::new(&format!(
                r"(?ms)(?P<block>{block})[ \t]*\r?\n[ \t]*Table[ \t]+(?P<slug>{SLUG}):[ \t]*(?P<cap>[^\n]*)$"
            ))
            .unwrap(),
            above: Regex::new(&format!(
                r"(?ms)^[ \t]*Table[ \t]+(?P<slug>{SLUG}):[ \t]*(?P<cap>[^\n]*)\r?\n[ \t]*(?P<block>{block})"
            ))
            .unwrap(),
            bare: Regex::new(&format!(r"(?s){block}")).unwrap(),
            caption_line: Regex::new(&format!(
                r"^[ \t]*Table[ \t]+({SLUG}):[ \t]*(.*)$"
            ))
            .unwrap(),
        }
    }

    /// Convert every longtable block, returning the updated text and the
    /// slugs of tables labeled through the caption convention.
    pub fn apply(&self, text: &str) -> (String, Vec<String>) {
        let mut slugs = Vec::new();
        let text = self.convert_below(text, &mut slugs);
        let text = self.convert_above(&text, &mut slugs);
        let text = self.convert_bare(&text);
        (text, slugs)
    }

    /// Below form: block followed by a convention line. When the line
    /// right above the same block also matches the convention, the above
    /// line wins and the below line stays behind as prose.
    fn convert_below(&self, text: &str, slugs: &mut Vec<String>) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.below.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            let block = caps.name("block").unwrap().as_str();

            let above = line_before(text, whole.start())
                .filter(|(line_start, _)| *line_start >= last)
                .and_then(|(line_start, line)| {
                    self.caption_line
                        .captures(line)
                        .map(|line_caps| (line_start, line_caps))
                });

            let Some(table) = LongTable::parse(block) else {
                debug!("longtable missing required markers, keeping block");
                out.push_str(&text[last..whole.end()]);
                last = whole.end();
                continue;
            };

            match above {
                Some((line_start, line_caps)) => {
                    let slug = line_caps[1].to_string();
                    let caption =
                        TableCaption::convention(&slug, &line_caps[2], CaptionSide::Above);
                    out.push_str(&text[last..line_start]);
                    out.push_str(&table.to_latex(Some(&caption)));
                    // The unclaimed below line survives as prose.
                    out.push_str(&format!(
                        "Table {}: {}",
                        &caps["slug"],
                        caps["cap"].trim()
                    ));
                    slugs.push(slug);
                }
                None => {
                    let slug = caps["slug"].to_string();
                    let caption = TableCaption::convention(&slug, &caps["cap"], CaptionSide::Below);
                    out.push_str(&text[last..whole.start()]);
                    out.push_str(&table.to_latex(Some(&caption)));
                    slugs.push(slug);
                }
            }
            last = whole.end();
        }
        out.push_str(&text[last..]);
        out
    }

    /// Above form: convention line followed by a block.
    fn convert_above(&self, text: &str, slugs: &mut Vec<String>) -> String {
        self.above
            .replace_all(text, |caps: &Captures| {
                let block = caps.name("block").unwrap().as_str();
                match LongTable::parse(block) {
                    Some(table) => {
                        let slug = caps["slug"].to_string();
                        let caption =
                            TableCaption::convention(&slug, &caps["cap"], CaptionSide::Above);
                        slugs.push(slug);
                        table.to_latex(Some(&caption))
                    }
                    None => {
                        debug!("longtable missing required markers, keeping block");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Bare blocks fall back to any caption and label embedded inside.
    fn convert_bare(&self, text: &str) -> String {
        self.bare
            .replace_all(text, |caps: &Captures| {
                let block = &caps[0];
                let Some(table) = LongTable::parse(block) else {
                    debug!("longtable missing required markers, keeping block");
                    return block.to_string();
                };
                let (cap_text, label) = extract_embedded_caption(block);
                let caption = TableCaption::embedded(cap_text, label);
                if caption.is_empty() {
                    table.to_latex(None)
                } else {
                    table.to_latex(Some(&caption))
                }
            })
            .into_owned()
    }

    /// Rewrite later whole-word `Table <slug>` mentions into references.
    /// Runs only after every block is converted; the emitted `Table~\ref`
    /// form uses a tie, so the pattern cannot re-match its own output.
    pub fn substitute_references(&self, text: &str, slugs: &[String]) -> String {
        let mut text = text.to_string();
        for slug in slugs {
            // Hyphens are slug characters, so `\b` alone would split
            // `latency-v2` after `latency`; the trailing context is matched
            // explicitly and re-emitted instead.
            let pattern = format!(r"\bTable[ \t]+{}([^0-9A-Za-z-]|$)", regex::escape(slug));
            let replacement = format!("Table~\\ref{{tbl:{}}}${{1}}", slug);
            text = Regex::new(&pattern)
                .unwrap()
                .replace_all(&text, replacement.as_str())
                .into_owned();
        }
        text
    }
}

impl Default for TablePass {
    fn default() -> Self {
        Self::new()
    }
}

/// The line immediately before byte `pos`, which must sit at a line start.
fn line_before(text: &str, pos: usize) -> Option<(usize, &str)> {
    let prefix = text[..pos].strip_suffix('\n')?;
    let prefix = prefix.strip_suffix('\r').unwrap_or(prefix);
    let start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    Some((start, &prefix[start..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "\\begin{longtable}[]{@{}ll@{}}\n\\toprule\nNode & Latency \\\\\n\\midrule\n\\endhead\na1 & 3ms \\\\\n\\end{longtable}";

    #[test]
    fn test_caption_above() {
        let pass = TablePass::new();
        let text = format!("Table latency: Per-node latency\n{}\nrest", BLOCK);
        let (output, slugs) = pass.apply(&text);
        assert_eq!(slugs, vec!["latency".to_string()]);
        assert!(output.contains("\\label{tbl:latency}"));
        let cap_idx = output.find("\\caption{Per-node latency}").unwrap();
        assert!(cap_idx < output.find("\\begin{tabularx}").unwrap());
        assert!(!output.contains("longtable"));
    }

    #[test]
    fn test_caption_below() {
        let pass = TablePass::new();
        let text = format!("{}\nTable latency: Per-node latency\nrest", BLOCK);
        let (output, slugs) = pass.apply(&text);
        assert_eq!(slugs, vec!["latency".to_string()]);
        let cap_idx = output.find("\\caption{Per-node latency}").unwrap();
        assert!(cap_idx > output.find("\\end{tabularx}").unwrap());
        assert!(output.ends_with("rest"));
    }

    #[test]
    fn test_above_wins_over_below() {
        let pass = TablePass::new();
        let text = format!(
            "Table alpha: Above caption\n{}\nTable beta: Below caption\n",
            BLOCK
        );
        let (output, slugs) = pass.apply(&text);
        assert_eq!(slugs, vec!["alpha".to_string()]);
        assert!(output.contains("\\caption{Above caption}"));
        assert!(output.contains("\\label{tbl:alpha}"));
        // The losing line is kept as prose, not converted again.
        assert!(output.contains("Table beta: Below caption"));
        assert!(!output.contains("tbl:beta"));
    }

    #[test]
    fn test_bare_block_uses_embedded_caption() {
        let pass = TablePass::new();
        let block = "\\begin{longtable}{ll}\n\\caption{Results\\label{tab:results}}\\\\\n\\toprule\nA & B \\\\\n\\midrule\n\\endhead\n1 & 2 \\\\\n\\end{longtable}";
        let (output, slugs) = pass.apply(block);
        assert!(slugs.is_empty());
        assert!(output.contains("\\caption{Results}"));
        assert!(output.contains("\\label{tab:results}"));
    }

    #[test]
    fn test_malformed_block_untouched() {
        let pass = TablePass::new();
        // No \toprule anywhere: every form must keep the block verbatim.
        let block = "\\begin{longtable}{ll}\nA & B \\\\\n\\end{longtable}";
        let text = format!("Table x: caption\n{}\n", block);
        let (output, slugs) = pass.apply(&text);
        assert!(slugs.is_empty());
        assert!(output.contains(block));
        assert!(output.contains("Table x: caption"));
    }

    #[test]
    fn test_substitute_references() {
        let pass = TablePass::new();
        let text = "As Table latency shows, a1 wins. See also Table latency-v2.";
        let output =
            pass.substitute_references(text, &["latency".to_string()]);
        assert_eq!(
            output,
            "As Table~\\ref{tbl:latency} shows, a1 wins. See also Table latency-v2."
        );
    }

    #[test]
    fn test_substitute_is_stable() {
        let pass = TablePass::new();
        let slugs = vec!["latency".to_string()];
        let once = pass.substitute_references("See Table latency.", &slugs);
        assert_eq!(pass.substitute_references(&once, &slugs), once);
    }

    #[test]
    fn test_consecutive_tables_keep_their_captions() {
        let pass = TablePass::new();
        let text = format!(
            "{}\nTable one: First\n{}\nTable two: Second\n",
            BLOCK, BLOCK
        );
        let (output, slugs) = pass.apply(&text);
        assert_eq!(slugs, vec!["one".to_string(), "two".to_string()]);
        assert!(output.contains("\\label{tbl:one}"));
        assert!(output.contains("\\label{tbl:two}"));
    }
}
