//! Preview extraction: the first few lines of a body, as comments

/// Marker appended to a preview line that was cut short
pub const TRUNCATION_MARKER: &str = "...";

/// Derive comment lines (without indentation) previewing `body`
///
/// Leading blank lines are skipped, then up to `preserve_lines` non-blank
/// lines are taken in order, stripped of leading indentation and cut to
/// `preserve_chars` characters.
pub fn preview_comments(body: &str, preserve_lines: usize, preserve_chars: usize) -> Vec<String> {
    if preserve_lines == 0 || preserve_chars == 0 {
        return Vec::new();
    }

    body.lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty())
        .take(preserve_lines)
        .map(|content| {
            if content.chars().count() > preserve_chars {
                let kept: String = content.chars().take(preserve_chars).collect();
                format!("# {kept}{TRUNCATION_MARKER}")
            } else {
                format!("# {content}")
            }
        })
        .collect()
}
