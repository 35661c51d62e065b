//! Filename sanitization.

/// Maximum length of a sanitized name, in characters.
pub const MAX_FILENAME_CHARS: usize = 200;

/// Sanitizes a candidate filename so it is a single, harmless path component.
///
/// - Replaces `< > : " / \ | ? *` and control characters with `_`
/// - Turns each run of whitespace into a single `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing underscores
/// - Limits length to 200 characters
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
            '_'
        } else if c.is_whitespace() || c.is_control() {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    truncate_chars(out.trim_matches('_'), MAX_FILENAME_CHARS).to_string()
}

/// Returns at most the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
