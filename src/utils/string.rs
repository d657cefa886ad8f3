//! String helpers for model output that may contain multi-byte text

/// Keep at most `max_chars` characters of `s`, appending "..." when cut.
///
/// Counts Unicode scalar values, so accented Spanish text and emoji never
/// get split mid-character.
///
/// # Examples
/// ```
/// use aulasense_core::utils::string::truncate_at_char_boundary;
///
/// assert_eq!(truncate_at_char_boundary("hola mundo", 4), "hola...");
/// assert_eq!(truncate_at_char_boundary("hola", 10), "hola");
/// assert_eq!(truncate_at_char_boundary("acompañamiento", 7), "acompañ...");
/// ```
pub fn truncate_at_char_boundary(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}

/// Remove every character contained in `set`
pub fn strip_chars(s: &str, set: &[char]) -> String {
    s.chars().filter(|c| !set.contains(c)).collect()
}
