//! Position-based block search.
//!
//! Offset lookups walk from the deepest node at the offset toward the root and
//! stop at the first node the taxonomy accepts, so the answer is always the
//! smallest enclosing block. Enumerations instead scan every descendant and
//! report nested blocks separately.

use crate::syntax::{SyntaxNode, SyntaxTree};
use crate::taxonomy::LanguageTaxonomy;
use crate::types::{BlockInfo, Range};

/// Nearest ancestor-or-self containing `offset` whose kind is a block
#[must_use]
pub fn find_enclosing_block<'t>(
    taxonomy: &LanguageTaxonomy,
    node: SyntaxNode<'t>,
    offset: usize,
) -> Option<SyntaxNode<'t>> {
    find_enclosing(node, offset, |kind| taxonomy.is_block(kind))
}

/// Nearest ancestor-or-self containing `offset` whose kind is a function
#[must_use]
pub fn find_enclosing_function<'t>(
    taxonomy: &LanguageTaxonomy,
    node: SyntaxNode<'t>,
    offset: usize,
) -> Option<SyntaxNode<'t>> {
    find_enclosing(node, offset, |kind| taxonomy.is_function_block(kind))
}

fn find_enclosing<'t>(
    start: SyntaxNode<'t>,
    offset: usize,
    accepts: impl Fn(&str) -> bool,
) -> Option<SyntaxNode<'t>> {
    let mut current = Some(start);
    while let Some(node) = current {
        if node.contains_offset(offset) && accepts(node.kind()) {
            return Some(node);
        }
        current = node.parent();
    }
    None
}

/// Every block in the tree, in document order
#[must_use]
pub fn list_all_blocks(tree: &SyntaxTree, taxonomy: &LanguageTaxonomy) -> Vec<BlockInfo> {
    tree.root()
        .descendants_of_kind(taxonomy.block_kinds(), None)
        .iter()
        .map(|node| taxonomy.classify(node))
        .collect()
}

/// Every function and class with extractable info, in document order
#[must_use]
pub fn list_all_functions_and_classes(
    tree: &SyntaxTree,
    taxonomy: &LanguageTaxonomy,
) -> Vec<BlockInfo> {
    tree.root()
        .descendants_of_kind(&taxonomy.function_and_class_kinds(), None)
        .iter()
        .filter_map(|node| {
            if taxonomy.is_function_block(node.kind()) {
                taxonomy.extract_function_info(node).map(BlockInfo::Function)
            } else {
                taxonomy.extract_class_info(node).map(BlockInfo::Class)
            }
        })
        .collect()
}

/// Block around a byte offset.
///
/// The nearest enclosing function wins when it has extractable info.
/// Otherwise the nearest enclosing block is reported over whole lines.
#[must_use]
pub fn block_at_offset(
    tree: &SyntaxTree,
    taxonomy: &LanguageTaxonomy,
    offset: usize,
) -> Option<BlockInfo> {
    let cursor = tree.root().named_descendant_for_index(offset);

    if let Some(function) = find_enclosing_function(taxonomy, cursor, offset) {
        if let Some(info) = taxonomy.extract_function_info(&function) {
            return Some(BlockInfo::Function(info));
        }
    }

    find_enclosing_block(taxonomy, cursor, offset)
        .map(|block| BlockInfo::other(&block, Range::whole_lines(&block)))
}

/// First block, in document order, overlapping `range`
#[must_use]
pub fn block_in_range(
    tree: &SyntaxTree,
    taxonomy: &LanguageTaxonomy,
    range: Range,
) -> Option<BlockInfo> {
    let window = (range.start_point(), range.end_point());
    tree.root()
        .descendants_of_kind(taxonomy.block_kinds(), Some(window))
        .first()
        .map(|node| taxonomy.classify(node))
}

/// Outermost error-free container of the node at `range`'s start.
///
/// Walks upward until the next ancestor is the root or has a structural
/// error. An errored start node reports the caller's range instead.
#[must_use]
pub fn error_free_block(tree: &SyntaxTree, range: Range) -> BlockInfo {
    let selected = tree.root().named_descendant_for_position(range.start_point());
    if selected.parent().is_none() {
        return BlockInfo::other(&selected, Range::of_node(&selected));
    }
    if selected.has_error() {
        return BlockInfo::other(&selected, range);
    }

    let mut best = selected;
    while let Some(parent) = best.parent() {
        if parent.has_error() || parent.parent().is_none() {
            break;
        }
        best = parent;
    }
    BlockInfo::other(&best, Range::of_node(&best))
}
