//! Neutralization of dangerous embedded constructs
//!
//! Applied once per file before scanning, so every offset and line number
//! reported downstream refers to the sanitized text.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Comment inserted in front of evaluation/execution primitives
pub const NEUTRALIZE_MARKER: &str = "/* neutralized */ ";

fn script_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex")
    })
}

fn dangerous_call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:eval|base64_decode|system|exec|shell_exec)\s*\(").expect("valid regex")
    })
}

/// Strip script blocks and neutralize eval-like calls.
///
/// Pure and total. Idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let stripped = strip_script_blocks(text);
    neutralize_dangerous_calls(&stripped)
}

/// Remove `<script>...</script>` blocks until none remain.
///
/// A single pass could join fragments like `<scr<script></script>ipt>` into
/// a fresh block, so removal repeats until the text is stable.
fn strip_script_blocks(text: &str) -> String {
    let pattern = script_block_pattern();
    let mut current = text.to_string();

    loop {
        let next = match pattern.replace_all(&current, "") {
            Cow::Borrowed(_) => None,
            Cow::Owned(stripped) => Some(stripped),
        };

        match next {
            Some(stripped) => current = stripped,
            None => return current,
        }
    }
}

/// Prefix every dangerous call with [`NEUTRALIZE_MARKER`], leaving its
/// arguments in place. Calls already carrying the marker are left alone.
fn neutralize_dangerous_calls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for found in dangerous_call_pattern().find_iter(text) {
        let start = found.start();
        out.push_str(&text[last..start]);
        if !text[..start].ends_with(NEUTRALIZE_MARKER) {
            out.push_str(NEUTRALIZE_MARKER);
        }
        last = start;
    }

    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_script_blocks() {
        let text = "<?php echo 1; ?><SCRIPT type=\"text/javascript\">alert(1)</script>\nok";
        assert_eq!(sanitize(text), "<?php echo 1; ?>\nok");
    }

    #[test]
    fn test_script_removal_is_non_greedy() {
        let text = "a<script>x</script>b<script>y</script>c";
        assert_eq!(sanitize(text), "abc");
    }

    #[test]
    fn test_nested_fragments_do_not_survive() {
        let text = "<scr<script></script>ipt>alert(1)</script>";
        assert_eq!(sanitize(text), "");
    }

    #[test]
    fn test_neutralizes_eval_calls() {
        let text = "<?php eval($code); Base64_Decode ('abc');";
        let clean = sanitize(text);
        assert_eq!(
            clean,
            "<?php /* neutralized */ eval($code); /* neutralized */ Base64_Decode ('abc');"
        );
    }

    #[test]
    fn test_leaves_lookalike_names_alone() {
        let text = "filesystem($x); shell_exec($y); my_exec($z);";
        let clean = sanitize(text);
        assert!(clean.starts_with("filesystem($x);"));
        assert!(clean.contains("/* neutralized */ shell_exec($y)"));
        assert!(clean.contains("my_exec($z)"));
        assert!(!clean.contains("neutralized */ my_exec"));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "",
            "plain text",
            "<?php eval($a); system('ls'); exec ($b);",
            "<script>a</script><script src=x>b</script>eval(1)",
            "<scr<script>z</script>ipt>q</script> /* neutralized */ eval(2)",
            "function f() { return apply_filters('x', $y); }",
        ];

        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
