//! Template splicing between literal content markers.

use crate::error::{Error, Result};

/// Literal line that opens the injected region in a template.
pub const MARKER_START: &str = "% === BEGIN MARKDOWN CONTENT ===";
/// Literal line that closes the injected region in a template.
pub const MARKER_END: &str = "% === END MARKDOWN CONTENT ===";

/// Splice a processed body into a template between the two markers,
/// replacing whatever was between them. A template missing either marker
/// cannot be assembled and is a hard error.
pub fn inject_body(template: &str, body: &str) -> Result<String> {
    let start = template
        .find(MARKER_START)
        .ok_or_else(|| Error::MissingMarker(MARKER_START.to_string()))?;
    let after_start = start + MARKER_START.len();
    let end = template[after_start..]
        .find(MARKER_END)
        .map(|offset| after_start + offset)
        .ok_or_else(|| Error::MissingMarker(MARKER_END.to_string()))?;

    Ok(format!(
        "{}\n{}\n{}",
        &template[..after_start],
        body.trim_end(),
        &template[end..]
    ))
}
