/// First `max_chars` characters of `s`.
///
/// Counts chars, not bytes, so multi-byte text is never split mid-character.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
