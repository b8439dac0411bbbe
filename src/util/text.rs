use unicode_segmentation::UnicodeSegmentation;

/// Truncate to at most `max` grapheme clusters, appending `…` when cut.
/// Used for titles in CLI listings so combining marks and emoji never get
/// split mid-cluster.
pub fn truncate_graphemes(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let count = s.graphemes(true).count();
    if count <= max {
        return s.to_string();
    }
    let mut out: String = s.graphemes(true).take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

/// Lowercase and squash everything outside [a-z0-9] to `_` for filenames
pub fn sanitize_filename(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
