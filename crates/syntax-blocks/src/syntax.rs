//! Owned syntax trees.
//!
//! Tree-sitter trees borrow their nodes from the tree and walk parents through
//! the C library. For caching and sharing across requests we flatten each parse
//! into an arena of named nodes stored in pre-order: a node's descendants are
//! the contiguous index range `id + 1 .. subtree_end`, parents and children are
//! plain indices, and nothing borrows from the parser.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

/// Set of node kinds, as used by the taxonomy tables
pub type KindSet = HashSet<&'static str>;

/// Zero-based row/column position (column counted in bytes)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<tree_sitter::Point> for Point {
    fn from(point: tree_sitter::Point) -> Self {
        Self::new(point.row, point.column)
    }
}

/// Index of a node inside its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: &'static str,
    field: Option<&'static str>,
    start_byte: usize,
    end_byte: usize,
    start: Point,
    end: Point,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    subtree_end: u32,
    has_error: bool,
}

/// A parsed source text together with its flattened named-node tree
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    /// Flatten a tree-sitter tree. Anonymous tokens are dropped; the root is
    /// always kept.
    pub fn from_tree_sitter(tree: &tree_sitter::Tree, source: &str) -> Self {
        let mut nodes: Vec<NodeData> = Vec::new();
        // Named ancestors of the cursor position, with the cursor depth they live at.
        let mut open: Vec<(usize, NodeId)> = Vec::new();
        let mut cursor = tree.walk();
        let mut depth = 0usize;

        loop {
            while let Some(&(open_depth, id)) = open.last() {
                if open_depth < depth {
                    break;
                }
                nodes[id.index()].subtree_end = nodes.len() as u32;
                open.pop();
            }

            let node = cursor.node();
            if node.is_named() || depth == 0 {
                let id = NodeId(nodes.len() as u32);
                let parent = open.last().map(|&(_, parent)| parent);
                nodes.push(NodeData {
                    kind: node.kind(),
                    field: cursor.field_name(),
                    start_byte: node.start_byte(),
                    end_byte: node.end_byte(),
                    start: node.start_position().into(),
                    end: node.end_position().into(),
                    parent,
                    children: Vec::new(),
                    subtree_end: 0,
                    has_error: node.has_error(),
                });
                if let Some(parent) = parent {
                    nodes[parent.index()].children.push(id);
                }
                open.push((depth, id));
            }

            if cursor.goto_first_child() {
                depth += 1;
                continue;
            }

            let mut finished = false;
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    finished = true;
                    break;
                }
                depth -= 1;
            }
            if finished {
                break;
            }
        }

        let total = nodes.len() as u32;
        for (_, id) in open {
            nodes[id.index()].subtree_end = total;
        }

        Self {
            source: source.to_string(),
            nodes,
        }
    }

    /// The text this tree was parsed from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            tree: self,
            id: NodeId(0),
        }
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id }
    }

    /// Number of named nodes (root included)
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when any part of the text failed to parse cleanly
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.root().has_error()
    }
}

/// Borrowed handle to one node of a [`SyntaxTree`]
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> SyntaxNode<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.data().kind
    }

    /// Field name this node occupies in its parent, if any
    #[must_use]
    pub fn field_name(&self) -> Option<&'static str> {
        self.data().field
    }

    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.data().start_byte
    }

    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.data().end_byte
    }

    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }

    #[must_use]
    pub fn start_position(&self) -> Point {
        self.data().start
    }

    #[must_use]
    pub fn end_position(&self) -> Point {
        self.data().end
    }

    /// True if this node or any descendant failed to parse cleanly
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.data().has_error
    }

    /// Inclusive containment: `start <= offset <= end`
    #[must_use]
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start_byte() <= offset && offset <= self.end_byte()
    }

    #[must_use]
    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    pub fn named_children(&self) -> impl DoubleEndedIterator<Item = SyntaxNode<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| tree.node(id))
    }

    #[must_use]
    pub fn named_child_count(&self) -> usize {
        self.data().children.len()
    }

    #[must_use]
    pub fn named_child(&self, index: usize) -> Option<SyntaxNode<'t>> {
        self.data()
            .children
            .get(index)
            .map(|&id| self.tree.node(id))
    }

    #[must_use]
    pub fn child_by_field_name(&self, field: &str) -> Option<SyntaxNode<'t>> {
        self.named_children()
            .find(|child| child.field_name() == Some(field))
    }

    /// Source text covered by this node
    #[must_use]
    pub fn text(&self) -> &'t str {
        self.tree.source.get(self.byte_range()).unwrap_or_default()
    }

    /// All named descendants in document (pre-)order, excluding `self`
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let tree = self.tree;
        let start = self.id.0 + 1;
        let end = self.data().subtree_end;
        (start..end).map(move |index| tree.node(NodeId(index)))
    }

    /// Descendants whose kind is in `kinds`, in document order, independent
    /// of nesting. With a `window`, only nodes overlapping the inclusive
    /// position range `start..=end` are returned.
    #[must_use]
    pub fn descendants_of_kind(
        &self,
        kinds: &KindSet,
        window: Option<(Point, Point)>,
    ) -> Vec<SyntaxNode<'t>> {
        let mut found = Vec::new();
        let end = self.data().subtree_end;
        let mut index = self.id.0 + 1;

        while index < end {
            let node = self.tree.node(NodeId(index));
            if let Some((window_start, window_end)) = window {
                if node.start_position() > window_end {
                    // Later nodes in pre-order start no earlier than this one.
                    break;
                }
                if node.end_position() < window_start {
                    index = node.data().subtree_end;
                    continue;
                }
            }
            if kinds.contains(node.kind()) {
                found.push(node);
            }
            index += 1;
        }

        found
    }

    /// Deepest named descendant spanning byte `offset`
    #[must_use]
    pub fn named_descendant_for_index(&self, offset: usize) -> SyntaxNode<'t> {
        self.descend_while(|child| child.start_byte() <= offset && offset < child.end_byte())
    }

    /// Deepest named descendant spanning `point`
    #[must_use]
    pub fn named_descendant_for_position(&self, point: Point) -> SyntaxNode<'t> {
        self.descend_while(|child| {
            child.start_position() <= point && point < child.end_position()
        })
    }

    fn descend_while(&self, spans: impl Fn(&SyntaxNode<'t>) -> bool) -> SyntaxNode<'t> {
        let mut current = *self;
        while let Some(child) = current.named_children().find(|child| spans(child)) {
            current = child;
        }
        current
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}] - [{}, {}]",
            self.kind(),
            self.start_position().row,
            self.start_position().column,
            self.end_position().row,
            self.end_position().column
        )
    }
}
