use crate::syntax::{Point, SyntaxNode};
use serde::{Deserialize, Serialize};

/// Editor range: 1-based lines and columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Range {
    /// End-column sentinel meaning "to the end of the line"
    pub const END_OF_LINE: usize = usize::MAX;

    #[must_use]
    pub const fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Convert a node's 0-based positions by adding 1 to every component
    #[must_use]
    pub fn of_node(node: &SyntaxNode<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self::new(start.row + 1, start.column + 1, end.row + 1, end.column + 1)
    }

    /// Whole lines spanned by a node, with an unbounded end column
    #[must_use]
    pub fn whole_lines(node: &SyntaxNode<'_>) -> Self {
        Self::new(
            node.start_position().row + 1,
            1,
            node.end_position().row + 1,
            Self::END_OF_LINE,
        )
    }

    #[must_use]
    pub const fn is_end_of_line(&self) -> bool {
        self.end_column == Self::END_OF_LINE
    }

    /// 0-based start position
    #[must_use]
    pub fn start_point(&self) -> Point {
        Point::new(
            self.start_line.saturating_sub(1),
            self.start_column.saturating_sub(1),
        )
    }

    /// 0-based end position; the end-of-line sentinel stays unbounded
    #[must_use]
    pub fn end_point(&self) -> Point {
        let column = if self.is_end_of_line() {
            usize::MAX
        } else {
            self.end_column.saturating_sub(1)
        };
        Point::new(self.end_line.saturating_sub(1), column)
    }
}

/// A named function, method or function-valued binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    /// Empty when the node carries no name
    pub name: String,
    pub parameter_names: Vec<String>,
    pub range: Range,
    pub kind: String,
}

/// A class-like declaration (class, interface, struct, trait, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Empty when the node carries no name
    pub name: String,
    pub range: Range,
    pub kind: String,
}

/// Any other block the taxonomy recognizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherInfo {
    pub range: Range,
    pub kind: String,
}

/// A classified block of source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum BlockInfo {
    Function(FunctionInfo),
    Class(ClassInfo),
    Other(OtherInfo),
}

impl BlockInfo {
    #[must_use]
    pub fn range(&self) -> Range {
        match self {
            Self::Function(info) => info.range,
            Self::Class(info) => info.range,
            Self::Other(info) => info.range,
        }
    }

    /// Node kind the block was classified from
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Function(info) => &info.kind,
            Self::Class(info) => &info.kind,
            Self::Other(info) => &info.kind,
        }
    }

    /// Function or class name; `None` for other blocks
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function(info) => Some(&info.name),
            Self::Class(info) => Some(&info.name),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Class(_) => "class",
            Self::Other(_) => "other",
        }
    }

    pub(crate) fn other(node: &SyntaxNode<'_>, range: Range) -> Self {
        Self::Other(OtherInfo {
            range,
            kind: node.kind().to_string(),
        })
    }
}

/// Text document as seen by the parser front
pub trait TextDocument {
    /// Stable identity of the document
    fn id(&self) -> &str;
    /// Monotonically increasing version
    fn version(&self) -> u64;
    /// Full current text
    fn text(&self) -> &str;

    /// Cache key for this (identity, version) pair
    fn cache_key(&self) -> String {
        format!("{}@{}", self.id(), self.version())
    }
}

/// In-memory [`TextDocument`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: String,
    pub version: u64,
    pub text: String,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, version: u64, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version,
            text: text.into(),
        }
    }

    /// Replace the text and bump the version
    pub fn update(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.version += 1;
    }
}

impl TextDocument for SourceDocument {
    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn text(&self) -> &str {
        &self.text
    }
}
