use crate::error::Result;
use crate::language::Language;
use async_trait::async_trait;

/// Source of grammar data for a language.
///
/// Loading may be slow (reading a wasm blob, fetching from disk), so it is
/// async. Each [`crate::LanguageParser`] calls it at most once per successful
/// initialization.
#[async_trait]
pub trait GrammarLoader: Send + Sync {
    async fn load(&self, language: Language) -> Result<tree_sitter::Language>;
}

/// Grammars compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinGrammars;

#[async_trait]
impl GrammarLoader for BuiltinGrammars {
    async fn load(&self, language: Language) -> Result<tree_sitter::Language> {
        Ok(language.tree_sitter_language())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_grammars_attach_to_parser() {
        for language in Language::ALL {
            let grammar = BuiltinGrammars.load(language).await.unwrap();
            let mut parser = tree_sitter::Parser::new();
            assert!(parser.set_language(&grammar).is_ok(), "{language}");
        }
    }
}
