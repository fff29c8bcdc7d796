//! Name and signature extraction shared by every language taxonomy.

use crate::syntax::SyntaxNode;
use crate::taxonomy::LanguageTaxonomy;
use crate::types::{ClassInfo, FunctionInfo, Range};

/// Leaf kinds that name a parameter
const IDENTIFIER_KINDS: &[&str] = &["identifier", "shorthand_property_identifier_pattern", "self"];

pub(crate) fn function_info(
    taxonomy: &LanguageTaxonomy,
    node: &SyntaxNode<'_>,
) -> Option<FunctionInfo> {
    if node.child_by_field_name("name").is_none() && taxonomy.is_anonymous_function(node.kind()) {
        return bound_function_info(taxonomy, node);
    }

    Some(FunctionInfo {
        name: field_text(node, "name"),
        parameter_names: parameter_names(node),
        range: Range::of_node(node),
        kind: node.kind().to_string(),
    })
}

/// `const f = () => {}`: the literal is named by its declarator and reported
/// over the whole declaration statement. Any other placement yields nothing.
fn bound_function_info(
    taxonomy: &LanguageTaxonomy,
    literal: &SyntaxNode<'_>,
) -> Option<FunctionInfo> {
    let rule = taxonomy.declarator_rule()?;
    let declarator = literal.parent()?;
    if !rule.declarator_kinds.contains(&declarator.kind()) {
        return None;
    }
    let declaration = declarator.parent()?;
    if !rule.declaration_kinds.contains(&declaration.kind()) {
        return None;
    }

    Some(FunctionInfo {
        name: field_text(&declarator, "name"),
        parameter_names: parameter_names(literal),
        range: Range::of_node(&declaration),
        kind: literal.kind().to_string(),
    })
}

pub(crate) fn class_info(node: &SyntaxNode<'_>) -> ClassInfo {
    ClassInfo {
        name: field_text(node, "name"),
        range: Range::of_node(node),
        kind: node.kind().to_string(),
    }
}

fn field_text(node: &SyntaxNode<'_>, field: &str) -> String {
    node.child_by_field_name(field)
        .map(|child| child.text().to_string())
        .unwrap_or_default()
}

/// First identifier leaf of each parameter, in declaration order. Parameters
/// without one (separators such as Python's bare `*`) are skipped.
fn parameter_names(function: &SyntaxNode<'_>) -> Vec<String> {
    if let Some(single) = function.child_by_field_name("parameter") {
        return first_identifier(&single).into_iter().collect();
    }

    let Some(list) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };
    if is_identifier_leaf(&list) {
        return vec![list.text().to_string()];
    }

    list.named_children()
        .filter(|param| !param.kind().contains("comment"))
        .filter_map(|param| first_identifier(&param))
        .collect()
}

fn first_identifier(node: &SyntaxNode<'_>) -> Option<String> {
    if is_identifier_leaf(node) {
        return Some(node.text().to_string());
    }
    node.descendants()
        .find(is_identifier_leaf)
        .map(|leaf| leaf.text().to_string())
}

fn is_identifier_leaf(node: &SyntaxNode<'_>) -> bool {
    node.named_child_count() == 0 && IDENTIFIER_KINDS.contains(&node.kind())
}
