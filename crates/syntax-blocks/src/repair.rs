//! Boundary repair: recover the longest structurally complete prefix or
//! suffix of text whose other end is malformed (truncated or streamed code).
//!
//! Only top-level named children of the root are considered. The first (or
//! last) `min_block_count` children are never trimmed into. Text without
//! structural errors, or with too few children to scan, still loses its last
//! (or first) child as a safety margin against an incomplete edge that the
//! parser did not flag.

use crate::syntax::{Point, SyntaxNode, SyntaxTree};

/// Longest leading text that ends on a complete top-level block
#[must_use]
pub fn trim_to_valid_suffix(tree: &SyntaxTree, min_block_count: usize) -> String {
    let text = tree.source();
    let root = tree.root();
    let children: Vec<SyntaxNode<'_>> = root.named_children().collect();
    let floor = min_block_count.max(1);

    if !root.has_error() || children.len() <= floor {
        return match children.len().checked_sub(2) {
            Some(index) => keep_through(text, children[index].end_position()),
            None => text.to_string(),
        };
    }

    // Skip the trailing run of errored children and resume at the next clean one.
    let mut saw_error = false;
    let mut boundary = None;
    for index in (floor..children.len()).rev() {
        let child = children[index];
        if child.has_error() {
            saw_error = true;
        } else if saw_error {
            boundary = Some(child);
            break;
        }
    }

    let boundary = boundary.unwrap_or(children[floor - 1]);
    log::debug!(
        "suffix trim boundary: {} ending at {:?}",
        boundary.kind(),
        boundary.end_position()
    );
    keep_through(text, boundary.end_position())
}

/// Longest trailing text that starts on a complete top-level block
#[must_use]
pub fn trim_to_valid_prefix(tree: &SyntaxTree, min_block_count: usize) -> String {
    let text = tree.source();
    let root = tree.root();
    let children: Vec<SyntaxNode<'_>> = root.named_children().collect();
    let floor = min_block_count.max(1);

    if !root.has_error() || children.len() <= floor {
        return match children.get(1) {
            Some(child) => keep_from(text, child.start_position()),
            None => text.to_string(),
        };
    }

    // Skip the leading run of errored children and resume at the next clean one.
    let mut saw_error = false;
    let mut boundary = None;
    for &child in &children[..children.len() - floor] {
        if child.has_error() {
            saw_error = true;
        } else if saw_error {
            boundary = Some(child);
            break;
        }
    }

    let boundary = boundary.unwrap_or(children[children.len() - floor]);
    log::debug!(
        "prefix trim boundary: {} starting at {:?}",
        boundary.kind(),
        boundary.start_position()
    );
    keep_from(text, boundary.start_position())
}

/// Lines up to `end.row`, the last one cut at `end.column`
fn keep_through(text: &str, end: Point) -> String {
    let mut lines: Vec<&str> = text.split('\n').take(end.row + 1).collect();
    if lines.len() == end.row + 1 {
        if let Some(last) = lines.last_mut() {
            *last = &last[..floor_char_boundary(last, end.column)];
        }
    }
    lines.join("\n")
}

/// Lines from `start.row`, the first one starting at `start.column`
fn keep_from(text: &str, start: Point) -> String {
    let mut lines: Vec<&str> = text.split('\n').skip(start.row).collect();
    if let Some(first) = lines.first_mut() {
        *first = &first[floor_char_boundary(first, start.column)..];
    }
    lines.join("\n")
}

fn floor_char_boundary(line: &str, column: usize) -> usize {
    let mut index = column.min(line.len());
    while !line.is_char_boundary(index) {
        index -= 1;
    }
    index
}
