//! Minimal lexical helpers shared by the call scanner and the function resolver
//!
//! Quoted string literals, comments (`//`, `#`, `/* */`) and delimiter nesting
//! are understood. Heredocs and every other construct are plain text. A quote
//! or block comment that never closes is treated as an ordinary byte.

/// Whether a byte can appear in an identifier (non-ASCII bytes included)
pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Given the index of an opening quote, return the index just past the
/// closing quote. Backslash escapes are honored. `None` if unterminated.
pub(crate) fn skip_quoted(bytes: &[u8], open: usize) -> Option<usize> {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// If a string literal or comment starts at `i`, return the index just past
/// it. Unterminated strings and block comments return `None`.
pub(crate) fn skip_inert(bytes: &[u8], i: usize) -> Option<usize> {
    match (bytes[i], bytes.get(i + 1)) {
        (b'\'' | b'"', _) => skip_quoted(bytes, i),
        // `#[...]` is an attribute, not a comment
        (b'#', next) if next != Some(&b'[') => Some(line_end_bytes(bytes, i)),
        (b'/', Some(b'/')) => Some(line_end_bytes(bytes, i)),
        (b'/', Some(b'*')) => bytes[i + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .map(|p| i + 2 + p + 2),
        _ => None,
    }
}

fn line_end_bytes(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| i + p)
}

/// Find the delimiter that balances the one at `open`, skipping strings and comments.
pub(crate) fn find_matching(bytes: &[u8], open: usize, left: u8, right: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if let Some(next) = skip_inert(bytes, i) {
            i = next;
            continue;
        }
        let b = bytes[i];
        if b == left {
            depth += 1;
        } else if b == right {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// 1-based line number of a byte offset
pub fn line_number(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Offset of the end of the line containing `offset` (exclusive of the newline)
pub(crate) fn line_end(text: &str, offset: usize) -> usize {
    text[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_quoted_with_escape() {
        let text = br#"'it\'s' rest"#;
        assert_eq!(skip_quoted(text, 0), Some(7));
        assert_eq!(skip_quoted(b"'open", 0), None);
    }

    #[test]
    fn test_find_matching_ignores_strings() {
        let text = br#"(a, ')', (b)) tail"#;
        assert_eq!(find_matching(text, 0, b'(', b')'), Some(12));
        assert_eq!(find_matching(b"(a, (b)", 0, b'(', b')'), None);
    }

    #[test]
    fn test_find_matching_ignores_comments() {
        let text = b"(a, // don't ) here\n  b /* ) */ # it's\n)";
        assert_eq!(find_matching(text, 0, b'(', b')'), Some(text.len() - 1));
    }

    #[test]
    fn test_stray_quote_is_plain_text() {
        let text = b"(it's)";
        assert_eq!(find_matching(text, 0, b'(', b')'), Some(5));
        assert_eq!(skip_inert(b"/* open", 0), None);
        assert_eq!(skip_inert(b"#[Attr]", 0), None);
        assert_eq!(skip_inert(b"# note\nx", 0), Some(6));
    }

    #[test]
    fn test_line_number() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_number(text, 0), 1);
        assert_eq!(line_number(text, 4), 2);
        assert_eq!(line_number(text, 8), 3);
        assert_eq!(line_number(text, 999), 3);
    }
}
