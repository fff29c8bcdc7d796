use crate::config::ParserConfig;
use crate::error::Result;
use crate::language::Language;
use crate::loader::{BuiltinGrammars, GrammarLoader};
use crate::parser::LanguageParser;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Hands out one shared [`LanguageParser`] per language
pub struct ParserService {
    config: ParserConfig,
    loader: Arc<dyn GrammarLoader>,
    parsers: Mutex<HashMap<Language, Arc<LanguageParser>>>,
}

impl ParserService {
    /// Create a service; `config` is validated once here
    pub fn new(config: ParserConfig, loader: Arc<dyn GrammarLoader>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            loader,
            parsers: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_builtin_grammars(config: ParserConfig) -> Result<Self> {
        Self::new(config, Arc::new(BuiltinGrammars))
    }

    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parser for an editor language id, created on first request.
    /// Unknown ids yield `None`.
    pub fn create_parser(&self, language_id: &str) -> Option<Arc<LanguageParser>> {
        Language::from_id(language_id).map(|language| self.parser(language))
    }

    pub fn parser(&self, language: Language) -> Arc<LanguageParser> {
        let mut parsers = self.lock_parsers();
        let parser = parsers.entry(language).or_insert_with(|| {
            log::debug!("Creating {language} parser");
            Arc::new(LanguageParser::new(
                language,
                self.config.clone(),
                Arc::clone(&self.loader),
            ))
        });
        Arc::clone(parser)
    }

    /// Dispose and forget the parser for `language_id`, returning whether one existed
    pub fn remove_parser(&self, language_id: &str) -> bool {
        let Some(language) = Language::from_id(language_id) else {
            return false;
        };
        match self.lock_parsers().remove(&language) {
            Some(parser) => {
                parser.dispose();
                true
            }
            None => false,
        }
    }

    /// Languages with a live parser
    pub fn active_languages(&self) -> Vec<Language> {
        let mut languages: Vec<_> = self.lock_parsers().keys().copied().collect();
        languages.sort_by_key(|language| language.as_str());
        languages
    }

    /// Dispose every parser. The service stays usable and creates fresh
    /// parsers on demand.
    pub fn dispose(&self) {
        let drained: Vec<_> = self.lock_parsers().drain().map(|(_, parser)| parser).collect();
        for parser in drained {
            parser.dispose();
        }
    }

    fn lock_parsers(&self) -> MutexGuard<'_, HashMap<Language, Arc<LanguageParser>>> {
        self.parsers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ParserService {
    fn default() -> Self {
        Self {
            config: ParserConfig::default(),
            loader: Arc::new(BuiltinGrammars),
            parsers: Mutex::new(HashMap::new()),
        }
    }
}

impl std::fmt::Debug for ParserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserService")
            .field("config", &self.config)
            .field("languages", &self.active_languages())
            .finish_non_exhaustive()
    }
}
