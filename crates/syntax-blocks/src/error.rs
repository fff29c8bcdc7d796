use thiserror::Error;

/// Result type for block analysis operations
pub type Result<T> = std::result::Result<T, BlockError>;

/// Errors surfaced to callers.
///
/// Structural parse errors are not represented here: they are data carried by
/// the tree (see [`crate::SyntaxNode::has_error`]). Missing taxonomy entries are
/// not errors either; queries simply come back empty.
#[derive(Error, Debug)]
pub enum BlockError {
    /// The parser engine produced no tree at all
    #[error("Parser failed to produce a syntax tree for {0}")]
    ParseFailed(String),

    /// Unsupported language id
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Grammar could not be loaded or attached to the parser
    #[error("Grammar error: {0}")]
    Grammar(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The parser was used after `dispose`
    #[error("Parser has been disposed")]
    Disposed,

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be decoded
    #[error("Config decode error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BlockError {
    /// Create a parse failure for a language
    pub fn parse_failed(language: impl Into<String>) -> Self {
        Self::ParseFailed(language.into())
    }

    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create a grammar error
    pub fn grammar(msg: impl Into<String>) -> Self {
        Self::Grammar(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
