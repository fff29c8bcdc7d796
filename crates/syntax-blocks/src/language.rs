use serde::{Deserialize, Serialize};
use std::path::Path;

/// Language with a compiled-in grammar and a block taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    #[serde(rename = "jsx")]
    JavaScriptReact,
    TypeScript,
    #[serde(rename = "tsx")]
    TypeScriptReact,
    Python,
    Rust,
    Go,
    Java,
}

/// Delimiters used when emitting a block comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCommentStyle {
    pub start: &'static str,
    pub end: &'static str,
    pub line_prefix: &'static str,
}

const C_STYLE_BLOCK_COMMENT: BlockCommentStyle = BlockCommentStyle {
    start: "/**",
    end: " */",
    line_prefix: " * ",
};

impl Language {
    pub const ALL: [Language; 8] = [
        Language::JavaScript,
        Language::JavaScriptReact,
        Language::TypeScript,
        Language::TypeScriptReact,
        Language::Python,
        Language::Rust,
        Language::Go,
        Language::Java,
    ];

    /// Resolve an editor language id (`typescriptreact`, `golang`, ...)
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "javascript" | "js" => Some(Language::JavaScript),
            "javascriptreact" | "jsx" => Some(Language::JavaScriptReact),
            "typescript" | "ts" => Some(Language::TypeScript),
            "typescriptreact" | "tsx" => Some(Language::TypeScriptReact),
            "python" => Some(Language::Python),
            "rust" => Some(Language::Rust),
            "go" | "golang" => Some(Language::Go),
            "java" => Some(Language::Java),
            _ => None,
        }
    }

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Language::JavaScript),
            "jsx" => Some(Language::JavaScriptReact),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::TypeScriptReact),
            "py" | "pyw" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "go" => Some(Language::Go),
            "java" => Some(Language::Java),
            _ => None,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::JavaScriptReact => "jsx",
            Language::TypeScript => "typescript",
            Language::TypeScriptReact => "tsx",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
        }
    }

    /// Whether the grammar belongs to the JavaScript family (shares ESM imports)
    pub fn is_javascript_family(self) -> bool {
        matches!(
            self,
            Language::JavaScript
                | Language::JavaScriptReact
                | Language::TypeScript
                | Language::TypeScriptReact
        )
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            // The JavaScript grammar parses JSX natively.
            Language::JavaScript | Language::JavaScriptReact => {
                tree_sitter_javascript::LANGUAGE.into()
            }
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::TypeScriptReact => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }

    /// Prefix used for single-line comments
    pub fn line_comment_prefix(self) -> &'static str {
        match self {
            Language::Python => "# ",
            _ => "// ",
        }
    }

    /// Delimiters used for block comments
    pub fn block_comment_style(self) -> BlockCommentStyle {
        match self {
            Language::Python => BlockCommentStyle {
                start: "'''",
                end: "'''",
                line_prefix: "",
            },
            _ => C_STYLE_BLOCK_COMMENT,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(Language::from_id("typescriptreact"), Some(Language::TypeScriptReact));
        assert_eq!(Language::from_id("tsx"), Some(Language::TypeScriptReact));
        assert_eq!(Language::from_id("golang"), Some(Language::Go));
        assert_eq!(Language::from_id("Python"), Some(Language::Python));
        assert_eq!(Language::from_id("cobol"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/main.rs"), Some(Language::Rust));
        assert_eq!(Language::from_path("app/view.tsx"), Some(Language::TypeScriptReact));
        assert_eq!(Language::from_path("index.MJS"), Some(Language::JavaScript));
        assert_eq!(Language::from_path("no_extension"), None);
    }

    #[test]
    fn test_id_round_trip() {
        for language in Language::ALL {
            assert_eq!(Language::from_id(language.as_str()), Some(language));
        }
    }

    #[test]
    fn test_grammars_attach_to_parser() {
        for language in Language::ALL {
            let mut parser = tree_sitter::Parser::new();
            assert!(
                parser.set_language(&language.tree_sitter_language()).is_ok(),
                "grammar for {language} failed to load"
            );
        }
    }

    #[test]
    fn test_comment_styles() {
        assert_eq!(Language::Python.line_comment_prefix(), "# ");
        assert_eq!(Language::Go.line_comment_prefix(), "// ");
        assert_eq!(Language::Python.block_comment_style().start, "'''");
        assert_eq!(Language::TypeScript.block_comment_style().line_prefix, " * ");
    }
}
