//! @dose
//! purpose: Decodes Python string literals into their runtime text so docstrings can be
//!     digested the way the interpreter sees them: prefixes, quote styles, raw strings,
//!     escape sequences and implicit concatenation.
//!
//! invariants:
//!     - f-strings and bytes literals are never docstrings and decode to None
//!     - Unknown escapes keep their backslash, as the interpreter does
//!
//! gotchas:
//!     - \N{NAME} escapes are kept verbatim; there is no Unicode name table here

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

/// Literal prefix, opening quote, then everything after it
static LITERAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)^([A-Za-z]*)("""|'''|"|')(.*)$"#).unwrap());

const TAB_SIZE: usize = 8;

/// Text value of a `string` or `concatenated_string` node, if it is a plain str literal
pub fn string_value(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" => decode_literal(&source[node.start_byte()..node.end_byte()]),
        "concatenated_string" => {
            let mut value = String::new();
            let mut cursor = node.walk();
            for part in node.named_children(&mut cursor) {
                match part.kind() {
                    "string" => value.push_str(&decode_literal(
                        &source[part.start_byte()..part.end_byte()],
                    )?),
                    "comment" => {}
                    _ => return None,
                }
            }
            Some(value)
        }
        _ => None,
    }
}

/// Decode one literal token such as `r'''x'''` or `"a\tb"`
pub fn decode_literal(text: &str) -> Option<String> {
    let caps = LITERAL_PATTERN.captures(text)?;
    let prefix = caps.get(1)?.as_str().to_ascii_lowercase();
    let quote = caps.get(2)?.as_str();
    let body = caps.get(3)?.as_str().strip_suffix(quote)?;

    if prefix.contains('f') || prefix.contains('b') || prefix.contains('t') {
        return None;
    }

    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Expand tabs to 8-column stops, restarting the column at each line break
pub fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Quote `value` back into a one-line literal the way the interpreter's repr() does:
/// single quotes unless only double quotes avoid escaping, non-printables escaped.
pub fn quote_literal(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if is_unprintable(c) => {
                let code = c as u32;
                let escaped = match code {
                    0..=0xff => format!("\\x{:02x}", code),
                    0x100..=0xffff => format!("\\u{:04x}", code),
                    _ => format!("\\U{:08x}", code),
                };
                out.push_str(&escaped);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn is_unprintable(c: char) -> bool {
    c.is_control() || matches!(c, '\u{a0}' | '\u{ad}' | '\u{2028}' | '\u{2029}')
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' | '\'' | '"' => out.push(next),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut digits = String::from(next);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut digits = String::new();
                while digits.len() < width {
                    match chars.peek() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let decoded = if digits.len() == width {
                    u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('\\');
                        out.push(next);
                        out.push_str(&digits);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}
