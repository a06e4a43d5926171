//! @dose
//! purpose: Rebuilds single-line source text for an expression node. Leaf tokens are
//!     concatenated in order; spacing inside a line is copied verbatim while line breaks,
//!     comments and backslash continuations collapse to one space.
//!
//! invariants:
//!     - The rendered text never contains a line break
//!     - Nodes containing ERROR or MISSING children never render
//!
//! gotchas:
//!     - String literals are emitted as one token. A str literal spanning lines is decoded
//!       and quoted again on one line, repr() style; f-strings and bytes spanning lines
//!       are reported as MultilineLiteral
//!     - No space is inserted right after ( [ { or right before ) ] } ,

use crate::parser::literal::{decode_literal, quote_literal};
use crate::types::{Expr, RenderError};
use std::borrow::Cow;
use tree_sitter::Node;

/// Node kinds copied as a single token
const ATOMIC_KINDS: &[&str] = &["string"];

/// Extras that never contribute text
const SKIPPED_KINDS: &[&str] = &["comment", "line_continuation"];

/// Render `node` into an Expr, capturing failure instead of returning it
pub fn render_expr(node: Node, source: &str) -> Expr {
    match render_source(node, source) {
        Ok(text) => Expr::source(text),
        Err(e) => Expr::unrenderable(e),
    }
}

pub fn render_source(node: Node, source: &str) -> Result<String, RenderError> {
    if node.has_error() {
        return Err(RenderError::Malformed);
    }

    let mut leaves = Vec::new();
    collect_leaves(node, &mut leaves);

    let mut out = String::new();
    let mut prev_end: Option<usize> = None;

    for leaf in leaves {
        let raw = &source[leaf.start_byte()..leaf.end_byte()];
        let text = if leaf.kind() == "string" && raw.contains(['\n', '\r']) {
            let value = decode_literal(raw).ok_or(RenderError::MultilineLiteral)?;
            Cow::Owned(quote_literal(&value))
        } else {
            Cow::Borrowed(raw)
        };
        if let Some(end) = prev_end {
            push_gap(&mut out, &source[end..leaf.start_byte()], &text);
        }
        out.push_str(&text);
        prev_end = Some(leaf.end_byte());
    }

    if out.is_empty() {
        return Err(RenderError::Unsupported(node.kind().to_string()));
    }
    Ok(out)
}

/// Leaf tokens under `node` in source order. Walked with a cursor, so nesting depth
/// costs no stack.
fn collect_leaves<'t>(node: Node<'t>, leaves: &mut Vec<Node<'t>>) {
    let mut cursor = node.walk();

    loop {
        let current = cursor.node();
        let kind = current.kind();
        let skipped = SKIPPED_KINDS.contains(&kind);
        let atomic = current.child_count() == 0 || ATOMIC_KINDS.contains(&kind);

        if !skipped && atomic && current.start_byte() < current.end_byte() {
            leaves.push(current);
        }
        if !skipped && !atomic && cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn push_gap(out: &mut String, gap: &str, next: &str) {
    if gap.is_empty() {
        return;
    }
    if gap.chars().all(|c| c == ' ' || c == '\t') {
        out.push_str(gap);
        return;
    }

    let after_open = out.ends_with(['(', '[', '{']);
    let before_close = next.starts_with([')', ']', '}', ',']);
    if !after_open && !before_close {
        out.push(' ');
    }
}
