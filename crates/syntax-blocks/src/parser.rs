//! Per-language parser front.
//!
//! A [`LanguageParser`] owns one grammar, one tree-sitter parser and a
//! recency cache of parsed documents. All queries go through it: documents
//! are parsed (or served from the cache), converted into a [`SyntaxTree`] and
//! handed to the locator, repair and outline functions.
//!
//! Grammar loading is async and happens once. Concurrent first callers of
//! [`LanguageParser::ready`] wait on the same in-flight load. The parser state
//! lives behind a std mutex that is never held across an await point, so a
//! query suspended while the grammar loads never observes half-updated state.

use crate::cache::RecencyCache;
use crate::config::ParserConfig;
use crate::error::{BlockError, Result};
use crate::language::Language;
use crate::loader::{BuiltinGrammars, GrammarLoader};
use crate::locator;
use crate::outline;
use crate::repair;
use crate::syntax::SyntaxTree;
use crate::taxonomy::{self, LanguageTaxonomy};
use crate::types::{BlockInfo, Range, TextDocument};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;

pub struct LanguageParser {
    language: Language,
    taxonomy: &'static LanguageTaxonomy,
    config: ParserConfig,
    loader: Arc<dyn GrammarLoader>,
    grammar: OnceCell<tree_sitter::Language>,
    state: Mutex<ParserState>,
}

struct ParserState {
    parser: Option<tree_sitter::Parser>,
    trees: RecencyCache<String, Arc<SyntaxTree>>,
    disposed: bool,
}

impl ParserState {
    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            return Err(BlockError::Disposed);
        }
        Ok(())
    }

    fn parse(&mut self, language: Language, text: &str) -> Result<SyntaxTree> {
        self.ensure_live()?;
        let parser = self
            .parser
            .as_mut()
            .ok_or_else(|| BlockError::grammar(format!("{language} grammar not attached")))?;

        match parser.parse(text, None) {
            Some(tree) => Ok(SyntaxTree::from_tree_sitter(&tree, text)),
            None => {
                log::warn!("{language} parser produced no tree ({} bytes)", text.len());
                Err(BlockError::parse_failed(language.as_str()))
            }
        }
    }
}

impl LanguageParser {
    pub fn new(language: Language, config: ParserConfig, loader: Arc<dyn GrammarLoader>) -> Self {
        let trees = RecencyCache::new(config.cache_capacity, config.cache_ratio);
        Self {
            language,
            taxonomy: taxonomy::for_language(language),
            config,
            loader,
            grammar: OnceCell::new(),
            state: Mutex::new(ParserState {
                parser: None,
                trees,
                disposed: false,
            }),
        }
    }

    /// Parser with default config and the compiled-in grammar
    pub fn with_builtin_grammar(language: Language) -> Self {
        Self::new(language, ParserConfig::default(), Arc::new(BuiltinGrammars))
    }

    /// Parser for an editor language id
    pub fn for_id(
        language_id: &str,
        config: ParserConfig,
        loader: Arc<dyn GrammarLoader>,
    ) -> Result<Self> {
        let language = Language::from_id(language_id)
            .ok_or_else(|| BlockError::unsupported_language(language_id))?;
        Ok(Self::new(language, config, loader))
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn taxonomy(&self) -> &'static LanguageTaxonomy {
        self.taxonomy
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.lock_state().disposed
    }

    /// Number of parsed documents currently cached
    #[must_use]
    pub fn cached_trees(&self) -> usize {
        self.lock_state().trees.len()
    }

    /// Load the grammar (once) and attach it to the parser
    pub async fn ready(&self) -> Result<()> {
        self.lock_state().ensure_live()?;

        let grammar = self
            .grammar
            .get_or_try_init(|| async {
                log::info!("Loading {} grammar", self.language);
                self.loader.load(self.language).await
            })
            .await?;

        let mut state = self.lock_state();
        state.ensure_live()?;
        if state.parser.is_none() {
            let mut parser = tree_sitter::Parser::new();
            parser
                .set_language(grammar)
                .map_err(|e| BlockError::grammar(format!("{}: {e}", self.language)))?;
            state.parser = Some(parser);
        }
        Ok(())
    }

    /// Parse a document, reusing the cached tree for an unchanged version
    pub async fn parse_document<D>(&self, document: &D) -> Result<Arc<SyntaxTree>>
    where
        D: TextDocument + Sync + ?Sized,
    {
        self.ready().await?;

        let key = document.cache_key();
        let mut state = self.lock_state();
        state.ensure_live()?;

        if let Some(tree) = state.trees.get(&key) {
            log::debug!("parse cache hit: {key}");
            return Ok(Arc::clone(tree));
        }

        log::debug!("parse cache miss: {key}");
        let tree = Arc::new(state.parse(self.language, document.text())?);
        state.trees.set(key, Arc::clone(&tree));
        Ok(tree)
    }

    /// Parse text without touching the cache
    pub async fn parse_text(&self, text: &str) -> Result<SyntaxTree> {
        self.ready().await?;
        self.lock_state().parse(self.language, text)
    }

    pub async fn list_all_blocks<D>(&self, document: &D) -> Result<Vec<BlockInfo>>
    where
        D: TextDocument + Sync + ?Sized,
    {
        let tree = self.parse_document(document).await?;
        Ok(locator::list_all_blocks(&tree, self.taxonomy))
    }

    pub async fn list_all_functions_and_classes<D>(&self, document: &D) -> Result<Vec<BlockInfo>>
    where
        D: TextDocument + Sync + ?Sized,
    {
        let tree = self.parse_document(document).await?;
        Ok(locator::list_all_functions_and_classes(&tree, self.taxonomy))
    }

    /// Smallest function (or, failing that, block) around a byte offset
    pub async fn find_block_at_offset<D>(&self, document: &D, offset: usize) -> Result<Option<BlockInfo>>
    where
        D: TextDocument + Sync + ?Sized,
    {
        let tree = self.parse_document(document).await?;
        Ok(locator::block_at_offset(&tree, self.taxonomy, offset))
    }

    pub async fn find_block_in_range<D>(&self, document: &D, range: Range) -> Result<Option<BlockInfo>>
    where
        D: TextDocument + Sync + ?Sized,
    {
        let tree = self.parse_document(document).await?;
        Ok(locator::block_in_range(&tree, self.taxonomy, range))
    }

    pub async fn find_error_free_block(&self, text: &str, range: Range) -> Result<BlockInfo> {
        let tree = self.parse_text(text).await?;
        Ok(locator::error_free_block(&tree, range))
    }

    /// Longest leading part of `text` ending on a complete top-level block.
    /// `None` uses the configured block floor.
    pub async fn trim_to_valid_suffix(&self, text: &str, min_block_count: Option<usize>) -> Result<String> {
        let tree = self.parse_text(text).await?;
        let floor = min_block_count.unwrap_or(self.config.min_block_count);
        Ok(repair::trim_to_valid_suffix(&tree, floor))
    }

    /// Longest trailing part of `text` starting on a complete top-level block
    pub async fn trim_to_valid_prefix(&self, text: &str, min_block_count: Option<usize>) -> Result<String> {
        let tree = self.parse_text(text).await?;
        let floor = min_block_count.unwrap_or(self.config.min_block_count);
        Ok(repair::trim_to_valid_prefix(&tree, floor))
    }

    pub async fn import_paths(&self, text: &str) -> Result<Vec<String>> {
        if !self.language.is_javascript_family() {
            return Ok(Vec::new());
        }
        let tree = self.parse_text(text).await?;
        Ok(outline::import_paths(&tree))
    }

    pub async fn type_declarations(&self, text: &str) -> Result<Vec<String>> {
        if !matches!(self.language, Language::TypeScript | Language::TypeScriptReact) {
            return Ok(Vec::new());
        }
        let tree = self.parse_text(text).await?;
        Ok(outline::type_declarations(&tree))
    }

    /// Release the parser and cached trees. Later calls fail with
    /// [`BlockError::Disposed`].
    pub fn dispose(&self) {
        let mut state = self.lock_state();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.parser = None;
        state.trees.clear();
        log::info!("Disposed {} parser", self.language);
    }

    fn lock_state(&self) -> MutexGuard<'_, ParserState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LanguageParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageParser")
            .field("language", &self.language)
            .field("config", &self.config)
            .field("grammar_loaded", &self.grammar.initialized())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceDocument;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingLoader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GrammarLoader for CountingLoader {
        async fn load(&self, language: Language) -> Result<tree_sitter::Language> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(language.tree_sitter_language())
        }
    }

    #[derive(Default)]
    struct FailingLoader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GrammarLoader for FailingLoader {
        async fn load(&self, language: Language) -> Result<tree_sitter::Language> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(BlockError::grammar(format!("no grammar for {language}")))
        }
    }

    #[tokio::test]
    async fn concurrent_ready_loads_grammar_once() {
        let loader = Arc::new(CountingLoader::default());
        let parser = LanguageParser::new(Language::JavaScript, ParserConfig::default(), loader.clone());

        let (a, b, c, d) = tokio::join!(parser.ready(), parser.ready(), parser.ready(), parser.ready());
        assert!(a.is_ok() && b.is_ok() && c.is_ok() && d.is_ok());
        parser.ready().await.unwrap();

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_memoized() {
        let loader = Arc::new(FailingLoader::default());
        let parser = LanguageParser::new(Language::Python, ParserConfig::default(), loader.clone());

        assert!(matches!(parser.ready().await, Err(BlockError::Grammar(_))));
        assert!(matches!(parser.ready().await, Err(BlockError::Grammar(_))));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn same_version_is_served_from_cache() {
        let parser = LanguageParser::with_builtin_grammar(Language::JavaScript);
        let mut document = SourceDocument::new("file:///a.js", 1, "function a() {}");

        let first = parser.parse_document(&document).await.unwrap();
        let again = parser.parse_document(&document).await.unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        document.update("function b() {}");
        let updated = parser.parse_document(&document).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &updated));
        assert_eq!(updated.source(), "function b() {}");
        assert_eq!(parser.cached_trees(), 2);
    }

    #[tokio::test]
    async fn cache_capacity_bounds_parsed_trees() {
        let config = ParserConfig {
            cache_capacity: 2,
            ..Default::default()
        };
        let parser = LanguageParser::new(Language::JavaScript, config, Arc::new(BuiltinGrammars));
        for version in 0..5 {
            let document = SourceDocument::new("doc", version, format!("let v = {version};"));
            parser.parse_document(&document).await.unwrap();
        }
        assert_eq!(parser.cached_trees(), 2);
    }

    #[tokio::test]
    async fn disposed_parser_fails_fast() {
        let parser = LanguageParser::with_builtin_grammar(Language::TypeScript);
        let document = SourceDocument::new("doc", 1, "let x = 1;");
        parser.parse_document(&document).await.unwrap();

        parser.dispose();
        parser.dispose();
        assert!(parser.is_disposed());
        assert_eq!(parser.cached_trees(), 0);
        assert!(matches!(parser.ready().await, Err(BlockError::Disposed)));
        assert!(matches!(
            parser.parse_document(&document).await,
            Err(BlockError::Disposed)
        ));
        assert!(matches!(
            parser.trim_to_valid_suffix("let y = 2;", None).await,
            Err(BlockError::Disposed)
        ));
    }

    #[tokio::test]
    async fn unknown_language_id_is_rejected() {
        let result = LanguageParser::for_id("cobol", ParserConfig::default(), Arc::new(BuiltinGrammars));
        assert!(matches!(result, Err(BlockError::UnsupportedLanguage(id)) if id == "cobol"));
    }

    #[tokio::test]
    async fn fib_reports_single_function() {
        let parser = LanguageParser::with_builtin_grammar(Language::JavaScript);
        let document = SourceDocument::new(
            "fib.js",
            1,
            "function fib(n){ if(n===0){return 0;} if(n===1){return 1;} return fib(n-1)+fib(n-2); }",
        );
        let symbols = parser.list_all_functions_and_classes(&document).await.unwrap();
        assert_eq!(symbols.len(), 1);
        match &symbols[0] {
            BlockInfo::Function(info) => {
                assert_eq!(info.name, "fib");
                assert_eq!(info.parameter_names, vec!["n".to_string()]);
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn trim_uses_configured_floor_by_default() {
        let config = ParserConfig {
            min_block_count: 2,
            ..Default::default()
        };
        let parser = LanguageParser::new(Language::JavaScript, config, Arc::new(BuiltinGrammars));
        let text = "a();\nb();\nc();\nd();";
        assert_eq!(parser.trim_to_valid_suffix(text, None).await.unwrap(), "a();\nb();\nc();");
        assert_eq!(parser.trim_to_valid_prefix(text, Some(20)).await.unwrap(), "b();\nc();\nd();");
    }

    #[tokio::test]
    async fn outline_queries_are_gated_by_language() {
        let python = LanguageParser::with_builtin_grammar(Language::Python);
        assert!(python.import_paths("import os\n").await.unwrap().is_empty());
        assert!(python.type_declarations("x = 1\n").await.unwrap().is_empty());

        let javascript = LanguageParser::with_builtin_grammar(Language::JavaScript);
        assert!(javascript.type_declarations("let x = 1;").await.unwrap().is_empty());
        assert_eq!(
            javascript.import_paths("import a from './a';").await.unwrap(),
            vec!["./a".to_string()]
        );
    }
}
