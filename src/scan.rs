//! Depth-counting scanner for nested brace-delimited LaTeX arguments.
//!
//! Column specifications and captions may nest braces arbitrarily deep
//! (`p{0.4\textwidth}`, `\caption{a \textbf{b} c}`), which a regular
//! expression cannot track. The extraction sites walk the bytes with an
//! explicit depth counter instead.

/// Extract the contents of a brace group, starting just past the opening
/// brace. Returns the contents and the index one past the closing brace.
///
/// An unbalanced group runs to the end of the input.
pub fn extract_braced(text: &str, start: usize) -> (&str, usize) {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = start;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    let end = if depth == 0 { i - 1 } else { i };
    (&text[start..end], i)
}

/// Skip a `[...]` optional argument at `start`, if one is present.
/// Returns the index of the first byte past the argument.
pub fn skip_optional(text: &str, start: usize) -> usize {
    if text.as_bytes().get(start) == Some(&b'[') {
        if let Some(close) = text[start..].find(']') {
            return start + close + 1;
        }
    }
    start
}
