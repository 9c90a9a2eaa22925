//! Enclosing function resolution
//!
//! Walks backward from a position to the nearest named `function` definition
//! and balances braces forward to find where that definition ends.

use super::lexer::{find_matching, is_ident_byte, skip_inert};
use serde::{Deserialize, Serialize};

const KEYWORD: &str = "function";

/// A named function definition that textually contains a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnclosingFunction {
    /// Function name
    pub name: String,
    /// Parameter list between the signature's parentheses, verbatim
    pub params: String,
    /// Inner body between the outermost braces, trimmed
    pub body: String,
    /// Full definition from the keyword through the closing brace
    pub definition: String,
    /// Byte offset of the `function` keyword
    pub start: usize,
    /// Byte offset just past the closing brace
    pub end: usize,
}

impl EnclosingFunction {
    /// Parameter names in declaration order, without defaults or type hints
    pub fn param_names(&self) -> Vec<&str> {
        self.params
            .split(',')
            .filter_map(|param| {
                let decl = param.split('=').next().unwrap_or("").trim();
                decl.split_whitespace().last()
            })
            .map(|name| name.trim_start_matches('&').trim_start_matches("..."))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

struct Signature {
    name_start: usize,
    name_end: usize,
    params_open: usize,
    params_close: usize,
}

enum BodyScan {
    /// Declaration without a body (`abstract function f();`)
    NoBody,
    /// Braces never balanced before end of text
    Unterminated,
    Closed { open: usize, close: usize },
}

/// Find the named function whose definition contains `position`.
///
/// Returns `None` when no definition precedes the position, when the nearest
/// candidate is unterminated, or when every preceding definition closes before
/// the position. Never panics on malformed input.
pub fn resolve(text: &str, position: usize) -> Option<EnclosingFunction> {
    let mut position = position.min(text.len());
    while !text.is_char_boundary(position) {
        position -= 1;
    }

    let bytes = text.as_bytes();
    let mut search_end = position;

    while let Some(keyword) = text[..search_end].rfind(KEYWORD) {
        search_end = keyword;

        let Some(signature) = parse_signature(bytes, keyword) else {
            continue;
        };

        match scan_body(bytes, signature.params_close + 1) {
            BodyScan::NoBody => continue,
            BodyScan::Unterminated => return None,
            BodyScan::Closed { close, .. } if close < position => continue,
            BodyScan::Closed { open, close } => {
                return Some(EnclosingFunction {
                    name: text[signature.name_start..signature.name_end].to_string(),
                    params: text[signature.params_open + 1..signature.params_close].to_string(),
                    body: text[open + 1..close].trim().to_string(),
                    definition: text[keyword..=close].to_string(),
                    start: keyword,
                    end: close + 1,
                });
            }
        }
    }

    None
}

/// Match `function [&] name (...)` at `keyword`
fn parse_signature(bytes: &[u8], keyword: usize) -> Option<Signature> {
    if keyword > 0 && (is_ident_byte(bytes[keyword - 1]) || bytes[keyword - 1] == b'$') {
        return None;
    }

    let mut i = keyword + KEYWORD.len();
    if i < bytes.len() && is_ident_byte(bytes[i]) {
        return None;
    }

    i = skip_whitespace(bytes, i);
    if bytes.get(i) == Some(&b'&') {
        i = skip_whitespace(bytes, i + 1);
    }

    let name_start = i;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    if i == name_start || bytes[name_start].is_ascii_digit() {
        return None;
    }
    let name_end = i;

    let params_open = skip_whitespace(bytes, i);
    if bytes.get(params_open) != Some(&b'(') {
        return None;
    }
    let params_close = find_matching(bytes, params_open, b'(', b')')?;

    Some(Signature {
        name_start,
        name_end,
        params_open,
        params_close,
    })
}

/// Balance braces starting after the parameter list.
///
/// Depth only counts once the first `{` is seen; a `;` before that means the
/// signature has no body. Strings and comments are skipped; a quote that never
/// closes counts as a plain byte.
fn scan_body(bytes: &[u8], from: usize) -> BodyScan {
    let mut depth = 0usize;
    let mut open = None;
    let mut i = from;

    while i < bytes.len() {
        if let Some(next) = skip_inert(bytes, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b';' if open.is_none() => return BodyScan::NoBody,
            b'{' => {
                open.get_or_insert(i);
                depth += 1;
            }
            b'}' if open.is_some() => {
                depth -= 1;
                if depth == 0 {
                    if let Some(open) = open {
                        return BodyScan::Closed { open, close: i };
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    BodyScan::Unterminated
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}
