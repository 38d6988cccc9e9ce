/// Lowercase, drop punctuation, collapse whitespace.
///
/// Alphanumerics (any script), `_` and whitespace survive; everything else is removed.
pub fn normalize_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prepares free text for speech synthesis: control characters become
/// spaces, whitespace is collapsed, at most `max_chars` characters remain.
pub fn sanitize_text(text: &str, max_chars: usize) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    spaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}
