//! Top-level outline queries used to build prompt context: module imports
//! and exported type shapes.

use crate::syntax::{SyntaxNode, SyntaxTree};

const TYPE_DECLARATION_KINDS: &[&str] = &["interface_declaration", "type_alias_declaration"];

/// Module specifiers of top-level `import` statements, quotes stripped
#[must_use]
pub fn import_paths(tree: &SyntaxTree) -> Vec<String> {
    tree.root()
        .named_children()
        .filter(|node| node.kind() == "import_statement")
        .filter_map(|node| node.child_by_field_name("source"))
        .map(|source| unquote(source.text()).to_string())
        .collect()
}

/// Source text of top-level interfaces and type aliases. Exported ones are
/// reported without the `export` keyword.
#[must_use]
pub fn type_declarations(tree: &SyntaxTree) -> Vec<String> {
    tree.root()
        .named_children()
        .filter_map(|node| {
            if node.kind() == "export_statement" {
                node.child_by_field_name("declaration")
            } else {
                Some(node)
            }
        })
        .filter(is_type_declaration)
        .map(|node| node.text().to_string())
        .collect()
}

fn is_type_declaration(node: &SyntaxNode<'_>) -> bool {
    TYPE_DECLARATION_KINDS.contains(&node.kind())
}

fn unquote(literal: &str) -> &str {
    literal.trim_matches(|c| matches!(c, '"' | '\'' | '`'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use pretty_assertions::assert_eq;

    fn parse(language: Language, source: &str) -> SyntaxTree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        SyntaxTree::from_tree_sitter(&tree, source)
    }

    #[test]
    fn collects_top_level_imports_only() {
        let source = "import React from \"react\";\nimport { a } from './a';\nimport './side-effect';\nfunction f() { return import('./lazy'); }\n";
        let tree = parse(Language::JavaScript, source);
        assert_eq!(
            import_paths(&tree),
            vec![
                "react".to_string(),
                "./a".to_string(),
                "./side-effect".to_string()
            ]
        );
    }

    #[test]
    fn collects_interfaces_and_aliases_with_and_without_export() {
        let source = "interface A { x: number }\nexport type B = A | null;\nexport function f() {}\nclass C {}\n";
        let tree = parse(Language::TypeScript, source);
        assert_eq!(
            type_declarations(&tree),
            vec![
                "interface A { x: number }".to_string(),
                "type B = A | null;".to_string()
            ]
        );
    }

    #[test]
    fn tsx_type_declarations() {
        let source = "type Props = { title: string };\nexport const View = (p: Props) => <h1>{p.title}</h1>;\n";
        let tree = parse(Language::TypeScriptReact, source);
        assert_eq!(
            type_declarations(&tree),
            vec!["type Props = { title: string };".to_string()]
        );
    }
}
