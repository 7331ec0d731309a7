//! Slug derivation for option values.

/// Derive a slug from a label.
///
/// Lowercases and trims the input, collapses every run of non-alphanumeric
/// characters into a single hyphen and drops leading/trailing hyphens.
/// Applying it to its own output returns the same string.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    out
}
