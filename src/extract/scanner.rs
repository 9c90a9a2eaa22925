//! Call-site scanner
//!
//! Locates every occurrence of a callee name and pulls out the literal hook
//! name passed as the first argument.
//!
//! Matching is a bare, case-sensitive substring search. Occurrences inside
//! comments or string literals are reported like any other call, and a
//! longer name that starts with the callee (`apply_filters_ref_array`) is
//! matched too.

use super::lexer::{find_matching, is_ident_byte, line_end, skip_quoted};

/// A call whose first argument is a string literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMatch<'a> {
    /// Byte offset of the callee name
    pub start: usize,
    /// Byte offset of the call's opening parenthesis
    pub open: usize,
    /// Byte offset just past the call's closing parenthesis (or line end)
    pub end: usize,
    /// The matched call text, `start..end`
    pub text: &'a str,
    /// Contents of the first string literal, without quotes
    pub literal: &'a str,
}

/// Scans text for calls to one callee
#[derive(Debug, Clone)]
pub struct CallScanner {
    callee: String,
}

impl CallScanner {
    pub fn new(callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
        }
    }

    pub fn callee(&self) -> &str {
        &self.callee
    }

    /// Lazily iterate over the qualifying calls in `text`.
    ///
    /// Each invocation starts a fresh pass.
    pub fn scan<'a>(&'a self, text: &'a str) -> CallMatches<'a> {
        CallMatches {
            callee: &self.callee,
            text,
            cursor: 0,
        }
    }
}

/// Iterator returned by [`CallScanner::scan`]
pub struct CallMatches<'a> {
    callee: &'a str,
    text: &'a str,
    cursor: usize,
}

impl<'a> Iterator for CallMatches<'a> {
    type Item = CallMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.callee.is_empty() {
            return None;
        }

        while let Some(found) = self.text[self.cursor..].find(self.callee) {
            let start = self.cursor + found;
            let name_end = start + self.callee.len();
            self.cursor = name_end;

            if let Some(call) = match_call(self.text, start, name_end) {
                return Some(call);
            }
        }

        self.cursor = self.text.len();
        None
    }
}

fn match_call(text: &str, start: usize, name_end: usize) -> Option<CallMatch<'_>> {
    let bytes = text.as_bytes();

    // Allow the rest of a longer identifier and whitespace before the paren
    let mut open = name_end;
    while open < bytes.len() && (is_ident_byte(bytes[open]) || bytes[open].is_ascii_whitespace()) {
        open += 1;
    }
    if open >= bytes.len() || bytes[open] != b'(' {
        return None;
    }

    let (scope_end, end) = match find_matching(bytes, open, b'(', b')') {
        Some(close) => (close, close + 1),
        None => {
            let eol = line_end(text, open);
            (eol, eol)
        }
    };

    let literal = leading_literal(&text[open + 1..scope_end])?;

    Some(CallMatch {
        start,
        open,
        end,
        text: &text[start..end],
        literal,
    })
}

/// The contents of a string literal at the very start of an argument list
fn leading_literal(args: &str) -> Option<&str> {
    let trimmed = args.trim_start();
    let offset = args.len() - trimmed.len();
    let bytes = args.as_bytes();

    match bytes.get(offset) {
        Some(b'\'') | Some(b'"') => {}
        _ => return None,
    }

    let close = skip_quoted(bytes, offset)?;
    let literal = &args[offset + 1..close - 1];
    if literal.is_empty() {
        None
    } else {
        Some(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all<'a>(scanner: &'a CallScanner, text: &'a str) -> Vec<CallMatch<'a>> {
        scanner.scan(text).collect()
    }

    #[test]
    fn test_extracts_literal_and_call_text() {
        let scanner = CallScanner::new("apply_filters");
        let text = "$x = apply_filters( 'my_hook', $value, array( 1, 2 ) );";
        let calls = scan_all(&scanner, text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].literal, "my_hook");
        assert_eq!(calls[0].start, 5);
        assert_eq!(calls[0].text, "apply_filters( 'my_hook', $value, array( 1, 2 ) )");
    }

    #[test]
    fn test_multiline_call() {
        let scanner = CallScanner::new("apply_filters");
        let text = "apply_filters(\n    \"multi_line\",\n    $value\n);";
        let calls = scan_all(&scanner, text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].literal, "multi_line");
        assert!(calls[0].text.ends_with("$value\n)"));
    }

    #[test]
    fn test_variable_first_argument_is_skipped() {
        let scanner = CallScanner::new("apply_filters");
        let text = "apply_filters($tag, 'later');\napply_filters( '' , $v );";
        assert!(scan_all(&scanner, text).is_empty());
    }

    #[test]
    fn test_unbalanced_call_falls_back_to_line() {
        let scanner = CallScanner::new("apply_filters");
        let text = "apply_filters('open_hook', $a\nnext line";
        let calls = scan_all(&scanner, text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].literal, "open_hook");
        assert_eq!(calls[0].text, "apply_filters('open_hook', $a");
    }

    #[test]
    fn test_longer_identifier_still_matches() {
        let scanner = CallScanner::new("apply_filters");
        let text = "apply_filters_ref_array('ref_hook', array($a));";
        let calls = scan_all(&scanner, text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].literal, "ref_hook");
    }

    #[test]
    fn test_matches_inside_comments() {
        let scanner = CallScanner::new("apply_filters");
        let text = "// apply_filters('commented_hook', $x);\n";
        let calls = scan_all(&scanner, text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].literal, "commented_hook");
    }

    #[test]
    fn test_is_case_sensitive() {
        let scanner = CallScanner::new("apply_filters");
        assert!(scan_all(&scanner, "APPLY_FILTERS('loud', $x);").is_empty());
    }

    #[test]
    fn test_scan_is_restartable() {
        let scanner = CallScanner::new("apply_filters");
        let text = "apply_filters('a', 1); apply_filters('b', 2); apply_filters('c', 3);";

        let first: Vec<_> = scanner.scan(text).map(|c| c.literal).collect();
        let second: Vec<_> = scanner.scan(text).map(|c| c.literal).collect();
        assert_eq!(first, vec!["a", "b", "c"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_callee_yields_nothing() {
        let scanner = CallScanner::new("");
        assert_eq!(scanner.scan("apply_filters('x')").count(), 0);
    }
}
