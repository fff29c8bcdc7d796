//! # Syntax Blocks
//!
//! Syntax-aware classification of source text into code blocks, and recovery
//! of structurally valid text from truncated or streamed code.
//!
//! ## Architecture
//!
//! ```text
//! TextDocument (id, version, text)
//!     │
//!     ├──> ParserService ── one LanguageParser per language
//!     │
//!     ├──> LanguageParser
//!     │    ├─> GrammarLoader (async, loaded once)
//!     │    ├─> tree-sitter parse → SyntaxTree (arena of named nodes)
//!     │    └─> RecencyCache keyed "{id}@{version}"
//!     │
//!     ├──> Taxonomy: which node kinds are blocks, functions, classes
//!     │
//!     ├──> Locator
//!     │    ├─> smallest enclosing block/function at an offset
//!     │    └─> document-wide block and symbol listings
//!     │
//!     └──> Repair
//!          └─> longest valid prefix/suffix of malformed text
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use syntax_blocks::{LanguageParser, Language, SourceDocument};
//!
//! # async fn run() -> syntax_blocks::Result<()> {
//! let parser = LanguageParser::with_builtin_grammar(Language::JavaScript);
//! let document = SourceDocument::new("file:///fib.js", 1, "function fib(n) { return n; }");
//!
//! for block in parser.list_all_functions_and_classes(&document).await? {
//!     println!("{} {:?}", block.category(), block.name());
//! }
//!
//! let repaired = parser.trim_to_valid_suffix("let a = 1;\nlet b = {", None).await?;
//! println!("{repaired}");
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod error;
mod extract;
mod language;
mod loader;
mod locator;
mod outline;
mod parser;
mod repair;
mod service;
mod syntax;
mod taxonomy;
mod types;

pub use cache::RecencyCache;
pub use config::{ParserConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_MIN_BLOCK_COUNT};
pub use error::{BlockError, Result};
pub use language::{BlockCommentStyle, Language};
pub use loader::{BuiltinGrammars, GrammarLoader};
pub use locator::{
    block_at_offset, block_in_range, error_free_block, find_enclosing_block, find_enclosing_function,
    list_all_blocks, list_all_functions_and_classes,
};
pub use outline::{import_paths, type_declarations};
pub use parser::LanguageParser;
pub use repair::{trim_to_valid_prefix, trim_to_valid_suffix};
pub use service::ParserService;
pub use syntax::{KindSet, NodeId, Point, SyntaxNode, SyntaxTree};
pub use taxonomy::{
    extract_class_info, extract_function_info, for_language, is_block, is_class_block,
    is_function_block, lookup, DeclaratorRule, LanguageTaxonomy,
};
pub use types::{BlockInfo, ClassInfo, FunctionInfo, OtherInfo, Range, SourceDocument, TextDocument};
