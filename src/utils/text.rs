/// Hard-cuts a string to at most `max` characters (code points).
/// The cut is not sentence-aware; it lands on a char boundary by construction,
/// so multi-byte UTF-8 sequences are never split.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
