//! Per-language classification of node kinds into blocks, functions and
//! classes.
//!
//! Every table is static data; the registry hands out one immutable
//! [`LanguageTaxonomy`] per [`Language`] for the lifetime of the process.
//! Lookups by language id treat an unknown id as "no capability": predicates
//! answer `false` and extractors answer `None`.

use crate::extract;
use crate::language::Language;
use crate::syntax::{KindSet, SyntaxNode};
use crate::types::{BlockInfo, ClassInfo, FunctionInfo, Range};
use once_cell::sync::Lazy;

/// Where an anonymous function literal may pick up a name from
#[derive(Debug, Clone, Copy)]
pub struct DeclaratorRule {
    /// Node kinds binding a name to a value (`variable_declarator`)
    pub declarator_kinds: &'static [&'static str],
    /// Statements a declarator must sit in for the binding to count
    pub declaration_kinds: &'static [&'static str],
}

/// Immutable block taxonomy of one language
#[derive(Debug, Clone)]
pub struct LanguageTaxonomy {
    language: Language,
    blocks: KindSet,
    functions: KindSet,
    classes: KindSet,
    anonymous_functions: KindSet,
    declarator: Option<DeclaratorRule>,
}

impl LanguageTaxonomy {
    fn new(
        language: Language,
        blocks: &[&'static str],
        functions: &[&'static str],
        classes: &[&'static str],
        anonymous_functions: &[&'static str],
        declarator: Option<DeclaratorRule>,
    ) -> Self {
        Self {
            language,
            blocks: blocks.iter().copied().collect(),
            functions: functions.iter().copied().collect(),
            classes: classes.iter().copied().collect(),
            anonymous_functions: anonymous_functions.iter().copied().collect(),
            declarator,
        }
    }

    /// Same taxonomy for a markup dialect: base blocks plus `markup` kinds,
    /// everything else unchanged.
    fn with_markup(&self, language: Language, markup: &[&'static str]) -> Self {
        let mut derived = self.clone();
        derived.language = language;
        derived.blocks.extend(markup.iter().copied());
        derived
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn is_block(&self, kind: &str) -> bool {
        self.blocks.contains(kind)
    }

    #[must_use]
    pub fn is_function_block(&self, kind: &str) -> bool {
        self.functions.contains(kind)
    }

    #[must_use]
    pub fn is_class_block(&self, kind: &str) -> bool {
        self.classes.contains(kind)
    }

    /// Function kinds that never carry a name of their own
    #[must_use]
    pub fn is_anonymous_function(&self, kind: &str) -> bool {
        self.anonymous_functions.contains(kind)
    }

    #[must_use]
    pub fn block_kinds(&self) -> &KindSet {
        &self.blocks
    }

    #[must_use]
    pub fn function_kinds(&self) -> &KindSet {
        &self.functions
    }

    #[must_use]
    pub fn class_kinds(&self) -> &KindSet {
        &self.classes
    }

    /// Union of function and class kinds
    #[must_use]
    pub fn function_and_class_kinds(&self) -> KindSet {
        self.functions.union(&self.classes).copied().collect()
    }

    #[must_use]
    pub fn declarator_rule(&self) -> Option<&DeclaratorRule> {
        self.declarator.as_ref()
    }

    #[must_use]
    pub fn extract_function_info(&self, node: &SyntaxNode<'_>) -> Option<FunctionInfo> {
        if !self.is_function_block(node.kind()) {
            return None;
        }
        extract::function_info(self, node)
    }

    #[must_use]
    pub fn extract_class_info(&self, node: &SyntaxNode<'_>) -> Option<ClassInfo> {
        if !self.is_class_block(node.kind()) {
            return None;
        }
        Some(extract::class_info(node))
    }

    /// Classify a node already known to be interesting. Function kinds whose
    /// extractor finds nothing fall back to a generic block.
    #[must_use]
    pub fn classify(&self, node: &SyntaxNode<'_>) -> BlockInfo {
        if let Some(info) = self.extract_function_info(node) {
            return BlockInfo::Function(info);
        }
        if let Some(info) = self.extract_class_info(node) {
            return BlockInfo::Class(info);
        }
        BlockInfo::other(node, Range::of_node(node))
    }
}

const JAVASCRIPT_BLOCKS: &[&str] = &[
    "function",
    "function_declaration",
    "function_expression",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "class_declaration",
    "method_definition",
    "if_statement",
    "switch_case",
    "while_statement",
    "do_statement",
    "for_statement",
    "for_in_statement",
    "try_statement",
    "catch_clause",
    "block",
    "export_statement",
    "lexical_declaration",
];

const JAVASCRIPT_FUNCTIONS: &[&str] = &[
    "function",
    "function_declaration",
    "function_expression",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
];

const JAVASCRIPT_ANONYMOUS_FUNCTIONS: &[&str] = &[
    "function",
    "function_expression",
    "generator_function",
    "arrow_function",
];

const JAVASCRIPT_CLASSES: &[&str] = &["class_declaration"];

const JAVASCRIPT_DECLARATORS: DeclaratorRule = DeclaratorRule {
    declarator_kinds: &["variable_declarator"],
    declaration_kinds: &[
        "lexical_declaration",
        "variable_declaration",
        "export_statement",
    ],
};

const TYPESCRIPT_BLOCKS: &[&str] = &[
    "function",
    "function_declaration",
    "function_expression",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "class_declaration",
    "abstract_class_declaration",
    "interface_declaration",
    "method_definition",
    "method_signature",
    "enum_declaration",
    "type_alias_declaration",
    "lexical_declaration",
    "if_statement",
    "switch_case",
    "while_statement",
    "do_statement",
    "for_statement",
    "for_in_statement",
    "for_of_statement",
    "try_statement",
    "catch_clause",
    "block",
    "module",
    "public_field_definition",
    "private_field_definition",
    "export_statement",
];

const TYPESCRIPT_CLASSES: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "interface_declaration",
];

const MARKUP_BLOCKS: &[&str] = &[
    "jsx_element",
    "jsx_self_closing_element",
    "jsx_expression",
    "jsx_fragment",
];

const PYTHON_BLOCKS: &[&str] = &[
    "function_definition",
    "class_definition",
    "compound_statement",
    "if_statement",
    "elif_clause",
    "else_clause",
    "for_statement",
    "while_statement",
    "try_statement",
    "except_clause",
    "with_statement",
    "decorated_definition",
];

const RUST_BLOCKS: &[&str] = &[
    "function_item",
    "function_signature_item",
    "closure_expression",
    "impl_item",
    "trait_item",
    "struct_item",
    "enum_item",
    "union_item",
    "mod_item",
    "macro_definition",
    "const_item",
    "static_item",
    "if_expression",
    "match_expression",
    "match_arm",
    "for_expression",
    "while_expression",
    "loop_expression",
    "unsafe_block",
    "async_block",
];

const RUST_CLASSES: &[&str] = &["struct_item", "enum_item", "union_item", "trait_item"];

const GO_BLOCKS: &[&str] = &[
    "function_declaration",
    "method_declaration",
    "func_literal",
    "type_declaration",
    "type_spec",
    "if_statement",
    "for_statement",
    "expression_switch_statement",
    "type_switch_statement",
    "select_statement",
    "expression_case",
    "type_case",
    "communication_case",
    "default_case",
];

const JAVA_BLOCKS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
    "method_declaration",
    "constructor_declaration",
    "lambda_expression",
    "static_initializer",
    "if_statement",
    "for_statement",
    "enhanced_for_statement",
    "while_statement",
    "do_statement",
    "try_statement",
    "try_with_resources_statement",
    "catch_clause",
    "finally_clause",
    "switch_expression",
    "switch_block_statement_group",
    "synchronized_statement",
];

const JAVA_CLASSES: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

const JAVA_DECLARATORS: DeclaratorRule = DeclaratorRule {
    declarator_kinds: &["variable_declarator"],
    declaration_kinds: &["local_variable_declaration", "field_declaration"],
};

static JAVASCRIPT: Lazy<LanguageTaxonomy> = Lazy::new(|| {
    LanguageTaxonomy::new(
        Language::JavaScript,
        JAVASCRIPT_BLOCKS,
        JAVASCRIPT_FUNCTIONS,
        JAVASCRIPT_CLASSES,
        JAVASCRIPT_ANONYMOUS_FUNCTIONS,
        Some(JAVASCRIPT_DECLARATORS),
    )
});

static JAVASCRIPT_REACT: Lazy<LanguageTaxonomy> =
    Lazy::new(|| JAVASCRIPT.with_markup(Language::JavaScriptReact, MARKUP_BLOCKS));

static TYPESCRIPT: Lazy<LanguageTaxonomy> = Lazy::new(|| {
    LanguageTaxonomy::new(
        Language::TypeScript,
        TYPESCRIPT_BLOCKS,
        JAVASCRIPT_FUNCTIONS,
        TYPESCRIPT_CLASSES,
        JAVASCRIPT_ANONYMOUS_FUNCTIONS,
        Some(JAVASCRIPT_DECLARATORS),
    )
});

static TYPESCRIPT_REACT: Lazy<LanguageTaxonomy> =
    Lazy::new(|| TYPESCRIPT.with_markup(Language::TypeScriptReact, MARKUP_BLOCKS));

static PYTHON: Lazy<LanguageTaxonomy> = Lazy::new(|| {
    LanguageTaxonomy::new(
        Language::Python,
        PYTHON_BLOCKS,
        &["function_definition"],
        &["class_definition"],
        &[],
        None,
    )
});

static RUST: Lazy<LanguageTaxonomy> = Lazy::new(|| {
    LanguageTaxonomy::new(
        Language::Rust,
        RUST_BLOCKS,
        &["function_item", "function_signature_item"],
        RUST_CLASSES,
        &[],
        None,
    )
});

static GO: Lazy<LanguageTaxonomy> = Lazy::new(|| {
    LanguageTaxonomy::new(
        Language::Go,
        GO_BLOCKS,
        &["function_declaration", "method_declaration", "func_literal"],
        &["type_spec"],
        &["func_literal"],
        None,
    )
});

static JAVA: Lazy<LanguageTaxonomy> = Lazy::new(|| {
    LanguageTaxonomy::new(
        Language::Java,
        JAVA_BLOCKS,
        &[
            "method_declaration",
            "constructor_declaration",
            "lambda_expression",
        ],
        JAVA_CLASSES,
        &["lambda_expression"],
        Some(JAVA_DECLARATORS),
    )
});

/// Taxonomy of a supported language
#[must_use]
pub fn for_language(language: Language) -> &'static LanguageTaxonomy {
    match language {
        Language::JavaScript => &JAVASCRIPT,
        Language::JavaScriptReact => &JAVASCRIPT_REACT,
        Language::TypeScript => &TYPESCRIPT,
        Language::TypeScriptReact => &TYPESCRIPT_REACT,
        Language::Python => &PYTHON,
        Language::Rust => &RUST,
        Language::Go => &GO,
        Language::Java => &JAVA,
    }
}

/// Taxonomy registered for an editor language id
#[must_use]
pub fn lookup(language_id: &str) -> Option<&'static LanguageTaxonomy> {
    Language::from_id(language_id).map(for_language)
}

#[must_use]
pub fn is_block(language_id: &str, kind: &str) -> bool {
    lookup(language_id).is_some_and(|taxonomy| taxonomy.is_block(kind))
}

#[must_use]
pub fn is_function_block(language_id: &str, kind: &str) -> bool {
    lookup(language_id).is_some_and(|taxonomy| taxonomy.is_function_block(kind))
}

#[must_use]
pub fn is_class_block(language_id: &str, kind: &str) -> bool {
    lookup(language_id).is_some_and(|taxonomy| taxonomy.is_class_block(kind))
}

#[must_use]
pub fn extract_function_info(language_id: &str, node: &SyntaxNode<'_>) -> Option<FunctionInfo> {
    lookup(language_id).and_then(|taxonomy| taxonomy.extract_function_info(node))
}

#[must_use]
pub fn extract_class_info(language_id: &str, node: &SyntaxNode<'_>) -> Option<ClassInfo> {
    lookup(language_id).and_then(|taxonomy| taxonomy.extract_class_info(node))
}
