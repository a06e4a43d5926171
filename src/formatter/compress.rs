//! @dose
//! purpose: Squeezes a docstring into the single quoted fragment that trails a FUNC/MTHD
//!     line. Lines are trimmed, blank lines dropped, the rest joined with single spaces,
//!     and anything past MAX_DOC_CHARS is cut with a "..." suffix.
//!
//! invariants:
//!     - compress_doc never returns a string containing a line break
//!     - A truncated result is exactly MAX_DOC_CHARS characters long
//!     - Lengths are counted in chars, never bytes, so multi-byte text is cut cleanly
//!
//! gotchas:
//!     - Line splitting follows the source language's idea of a line boundary, which
//!       includes \x0b, \x0c, \x1c-\x1e, U+0085, U+2028 and U+2029 besides \r and \n

/// Longest flattened docstring kept verbatim
pub const MAX_DOC_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Join the non-blank, trimmed lines of `text` with single spaces
pub fn flatten(text: &str) -> String {
    text.split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten and truncate a docstring. Returns None when nothing printable remains.
pub fn compress_doc(text: &str) -> Option<String> {
    let flat = flatten(text);
    if flat.is_empty() {
        return None;
    }

    if flat.chars().count() > MAX_DOC_CHARS {
        let keep = MAX_DOC_CHARS - ELLIPSIS.len();
        let mut cut: String = flat.chars().take(keep).collect();
        cut.push_str(ELLIPSIS);
        Some(cut)
    } else {
        Some(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_joins_lines() {
        assert_eq!(flatten("Summary.\n\n    More detail\n  here.\n"), "Summary. More detail here.");
    }

    #[test]
    fn test_flatten_keeps_inner_spacing() {
        assert_eq!(flatten("  a   b  "), "a   b");
    }

    #[test]
    fn test_flatten_exotic_line_breaks() {
        assert_eq!(flatten("one\u{2028}two\r\nthree\x0cfour"), "one two three four");
    }

    #[test]
    fn test_compress_doc_blank_is_none() {
        assert_eq!(compress_doc(""), None);
        assert_eq!(compress_doc("   \n\t\n"), None);
    }

    #[test]
    fn test_compress_doc_short_text() {
        assert_eq!(compress_doc("Greets the user."), Some("Greets the user.".to_string()));
    }

    #[test]
    fn test_compress_doc_exact_length_not_truncated() {
        let exact = "a".repeat(MAX_DOC_CHARS);
        let out = compress_doc(&exact).unwrap();
        assert_eq!(out, exact);
        assert!(!out.ends_with("..."));
    }

    #[test]
    fn test_compress_doc_truncates_long_text() {
        let long = "A".repeat(200);
        let out = compress_doc(&long).unwrap();
        assert_eq!(out.chars().count(), 100);
        assert_eq!(out, format!("{}...", "A".repeat(97)));
    }

    #[test]
    fn test_compress_doc_one_over() {
        let out = compress_doc(&"b".repeat(MAX_DOC_CHARS + 1)).unwrap();
        assert_eq!(out.chars().count(), MAX_DOC_CHARS);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_compress_doc_counts_chars_not_bytes() {
        let long = "é".repeat(150);
        let out = compress_doc(&long).unwrap();
        assert_eq!(out.chars().count(), 100);
        assert!(out.starts_with("éé"));
    }

    #[test]
    fn test_compress_doc_truncates_after_flattening() {
        let doc = format!("{}\n{}", "x".repeat(60), "y".repeat(60));
        let out = compress_doc(&doc).unwrap();
        assert_eq!(out, format!("{} {}...", "x".repeat(60), "y".repeat(36)));
    }
}
